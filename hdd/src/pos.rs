// SPDX-License-Identifier: MPL-2.0

use std::fmt;

use crate::{Error, Geometry};

/// A physical location on the disk.
///
/// Positions order the same way blocks are laid out: by track, then by sector slot, and finally
/// by surface.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Position {
    pub track: u32,
    /// The sector slot, which is shared by every surface at the same angle.
    pub sector: u32,
    pub surface: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface {} track {} sector {}", self.surface, self.track, self.sector)
    }
}

impl Geometry {
    /// Whether the given position exists on this disk.
    pub fn contains(&self, pos: Position) -> bool {
        pos.surface < self.surfaces()
            && pos.track < self.tracks_per_surface()
            && pos.sector < self.sectors_on_track(pos.track)
    }

    /// Translates a byte address into the position of the sector containing it.
    ///
    /// Blocks are numbered track-major. Within a track, each sector slot holds one block per
    /// surface, with the surface varying fastest.
    pub fn decode(&self, addr: u64) -> Result<Position, Error> {
        let block = addr / u64::from(self.sector_size());
        if block >= self.capacity_sectors() {
            return Err(Error::OutOfRange {
                addr,
                len: 0,
                capacity: self.capacity_bytes(),
            });
        }

        // The first track whose running total reaches `block + 1`.
        let track = self.track_ends().partition_point(|&end| end <= block) as u32;

        let surfaces = u64::from(self.surfaces());
        let offset = block - self.track_start(track);

        Ok(Position {
            track,
            sector: (offset / surfaces) as u32,
            surface: (offset % surfaces) as u32,
        })
    }

    /// The inverse of [`Self::decode`], sans the byte offset within the sector.
    pub fn block_index(&self, pos: Position) -> Result<u64, Error> {
        if !self.contains(pos) {
            return Err(Error::InvalidPosition(pos));
        }

        Ok(self.track_start(pos.track)
            + u64::from(pos.sector) * u64::from(self.surfaces())
            + u64::from(pos.surface))
    }

    /// The number of blocks from `pos`, inclusive, to the end of its track.
    ///
    /// `pos` must be a position on this disk.
    pub fn remaining_on_track(&self, pos: Position) -> u64 {
        let surfaces = u64::from(self.surfaces());
        let sectors_after = u64::from(self.sectors_on_track(pos.track) - (pos.sector + 1));

        sectors_after * surfaces + (surfaces - u64::from(pos.surface))
    }

    /// Every position on the disk, in block order.
    pub fn positions(&self) -> impl '_ + Iterator<Item = Position> {
        (0..self.tracks_per_surface()).flat_map(move |track| {
            (0..self.sectors_on_track(track)).flat_map(move |sector| {
                (0..self.surfaces()).map(move |surface| Position { track, sector, surface })
            })
        })
    }
}
