// SPDX-License-Identifier: MPL-2.0

//! Observers for what a drive is doing.
//!
//! Probes see every decode and every access but cannot influence either.

use crate::{Access, Position};

pub trait Probe: Send {
    /// Called after `addr` has been decoded.
    ///
    /// `remaining` is the number of blocks from `pos` to the end of its track.
    fn on_decode(&self, _addr: u64, _block: u64, _pos: Position, _remaining: u64) {}

    /// Called after an access has completed and the head has moved.
    fn on_access(&self, _access: &Access) {}
}

/// Ignores everything.
impl Probe for () {}

/// Reports to the `tracing` subscriber at the `DEBUG` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceProbe;

impl Probe for TraceProbe {
    fn on_decode(&self, addr: u64, block: u64, pos: Position, remaining: u64) {
        tracing::debug!(
            "decode({:#x}): block {}, {}, {} left on track",
            addr,
            block,
            pos,
            remaining,
        );
    }

    fn on_access(&self, access: &Access) {
        tracing::debug!(
            "{}: {} at {:.6}s (seek {:.6}s, wait {:.6}s, transfer {:.6}s), head now on track {}",
            access.op,
            access.start,
            access.done,
            access.seek,
            access.wait,
            access.transfer,
            access.head,
        );
    }
}
