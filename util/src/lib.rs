// SPDX-License-Identifier: MPL-2.0

use std::fmt;

/// The number of bytes in a decimal gigabyte, which is what drive vendors mean by "GB".
pub const BYTES_PER_GB: f64 = 1_000_000_000.0;

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Writes a titled table of key/value rows with the values aligned into a single column.
///
/// ```text
/// HDD:
///   surfaces:       4
///   rpm:            7200
/// ```
pub fn dump_table(
    w: &mut impl fmt::Write,
    title: &str,
    rows: &[(&str, String)],
) -> fmt::Result {
    // Keys are followed by a colon, and then at least one space.
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + 2;

    writeln!(w, "{}:", title)?;
    for (key, value) in rows {
        writeln!(w, "  {:<width$}{}", format!("{}:", key), value, width = width)?;
    }

    Ok(())
}
