// SPDX-License-Identifier: MPL-2.0

//! Seek, rotation, and transfer costs.
//!
//! All durations are in seconds.

use std::fmt;

use crate::{Error, Geometry, Position};

/// The kind of access being timed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Op {
    Read,
    Write,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

/// The outcome of [`Geometry::transfer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transfer {
    pub duration: f64,
    /// The track the head is over once the last sector has passed under it.
    pub head: u32,
}

impl Geometry {
    /// The time taken to move the head from one track to another.
    pub fn seek_time(&self, from: u32, to: u32) -> f64 {
        if from == to {
            return 0.0;
        }

        f64::from(from.abs_diff(to)) * self.seek_per_track() + self.seek_overhead()
    }

    /// The average wait for a sector to come around, which is half of a revolution.
    pub fn rotational_wait(&self) -> f64 {
        0.5 * 60.0 / f64::from(self.rpm())
    }

    /// The time a single sector on the given track takes to pass under the head.
    pub fn sector_time(&self, track: u32) -> f64 {
        60.0 / (f64::from(self.rpm()) * f64::from(self.sectors_on_track(track)))
    }

    fn access_time_per_sector(&self, op: Op, track: u32) -> f64 {
        match op {
            // Writes currently cost exactly as much as reads.
            Op::Read | Op::Write => self.sector_time(track),
        }
    }

    /// Times a sequential run of `sectors` blocks beginning at `start`.
    ///
    /// The head is assumed to already be over `start`. Every track boundary the run crosses
    /// costs a seek to the next track plus a fresh rotational wait, even though the seek
    /// distance is a single track.
    pub fn transfer(&self, op: Op, start: Position, sectors: u64) -> Result<Transfer, Error> {
        if !self.contains(start) {
            return Err(Error::InvalidPosition(start));
        }

        let mut pos = start;
        let mut left = sectors;
        let mut duration = 0.0;
        loop {
            let here = left.min(self.remaining_on_track(pos));
            duration += here as f64 * self.access_time_per_sector(op, pos.track);
            left -= here;

            if left == 0 {
                break;
            }

            let next = pos.track + 1;
            if next >= self.tracks_per_surface() {
                let size = u64::from(self.sector_size());
                return Err(Error::OutOfRange {
                    addr: self.block_index(start)? * size,
                    len: sectors * size,
                    capacity: self.capacity_bytes(),
                });
            }

            tracing::trace!("{}: crossing from track {} to {}", op, pos.track, next);
            duration += self.seek_time(pos.track, next) + self.rotational_wait();
            pos = Position { track: next, sector: 0, surface: 0 };
        }

        Ok(Transfer { duration, head: pos.track })
    }
}
