// SPDX-License-Identifier: MPL-2.0

use tracing_subscriber::EnvFilter;

/// Installs a global subscriber that prints to standard output.
///
/// Verbosity is taken from `RUST_LOG`. Decode and access traces are emitted at `DEBUG` by drives
/// created with `verbose` set, and track crossings at `TRACE`.
pub fn init() {
    tracing_subscriber::fmt()
        // Set the environment variable `RUST_LOG` to one of `TRACE`, `DEBUG`, `INFO`, `WARN`, or
        // `ERROR`. Reading from the environment saves us from writing additional code to parse
        // verbosity flags.
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(true)
        .with_level(true)
        // The target is mostly just noise.
        .with_target(false)
        // Simulated time is what matters, not wall-clock time.
        .without_time()
        .init();
}
