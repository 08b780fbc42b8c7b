// SPDX-License-Identifier: MPL-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The parameters a drive is built from.
///
/// Times are in seconds. `rpm` is in revolutions per minute and `sector_size` is in bytes.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Params {
    pub surfaces: u32,
    pub tracks_per_surface: u32,
    pub sectors_innermost_track: u32,
    pub sectors_outermost_track: u32,
    pub rpm: u32,
    pub sector_size: u32,
    /// The fixed cost of any seek that actually moves the head.
    pub seek_overhead: f64,
    /// The cost of moving the head by a single track.
    pub seek_per_track: f64,
    /// Whether decodes and accesses should be traced.
    #[serde(default)]
    pub verbose: bool,
}

/// The reason a set of [`Params`] was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeometryError {
    /// The outermost track must hold more sectors than the innermost one.
    OuterNotLarger,
    /// At least two tracks are needed for the sector gradient to exist.
    TooFewTracks,
    ZeroRpm,
    ZeroSectorSize,
    ZeroSurfaces,
    /// Some track would hold no sectors, and so would take infinitely long to read.
    EmptyTrack,
    /// A seek cost is negative, infinite, or NaN.
    InvalidSeekCost,
    /// The capacity in bytes does not fit in a `u64`.
    TooLarge,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::OuterNotLarger => "outermost track should contain more sectors than innermost",
            Self::TooFewTracks => "at least two tracks per surface are required",
            Self::ZeroRpm => "rpm must be nonzero",
            Self::ZeroSectorSize => "sector size must be nonzero",
            Self::ZeroSurfaces => "at least one surface is required",
            Self::EmptyTrack => "innermost track must contain at least one sector",
            Self::InvalidSeekCost => "seek costs must be finite and non-negative",
            Self::TooLarge => "capacity in bytes does not fit in 64 bits",
        };

        f.write_str(reason)
    }
}

impl Params {
    fn validate(&self) -> Result<(), GeometryError> {
        if self.surfaces == 0 {
            return Err(GeometryError::ZeroSurfaces);
        }
        if self.tracks_per_surface < 2 {
            return Err(GeometryError::TooFewTracks);
        }
        if self.sectors_outermost_track <= self.sectors_innermost_track {
            return Err(GeometryError::OuterNotLarger);
        }
        if self.sectors_innermost_track == 0 {
            return Err(GeometryError::EmptyTrack);
        }
        if self.rpm == 0 {
            return Err(GeometryError::ZeroRpm);
        }
        if self.sector_size == 0 {
            return Err(GeometryError::ZeroSectorSize);
        }
        for cost in [self.seek_overhead, self.seek_per_track] {
            if !cost.is_finite() || cost < 0.0 {
                return Err(GeometryError::InvalidSeekCost);
            }
        }

        Ok(())
    }
}

impl Geometry {
    pub fn new(params: Params) -> Result<Self, Error> {
        params.validate()?;

        let mut geom = Self { params, track_ends: Vec::new() };
        let surfaces = u64::from(geom.params.surfaces);
        let mut end = 0u64;
        let mut track_ends = Vec::with_capacity(geom.params.tracks_per_surface as usize);
        for track in 0..geom.params.tracks_per_surface {
            end = u64::from(geom.sectors_on_track(track))
                .checked_mul(surfaces)
                .and_then(|blocks| end.checked_add(blocks))
                .ok_or(GeometryError::TooLarge)?;
            track_ends.push(end);
        }

        // Byte addresses must fit in a `u64` too.
        end.checked_mul(u64::from(geom.params.sector_size))
            .ok_or(GeometryError::TooLarge)?;
        geom.track_ends = track_ends;

        Ok(geom)
    }
}

/// The physical layout of a zoned-bit-recording disk.
///
/// Sector counts grow linearly from the innermost track (track 0) to the outermost one.
#[derive(Clone, Debug)]
pub struct Geometry {
    params: Params,
    /// The number of blocks, across all surfaces, on tracks `0..=t`.
    track_ends: Vec<u64>,
}

impl Geometry {
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn surfaces(&self) -> u32 {
        self.params.surfaces
    }

    pub fn tracks_per_surface(&self) -> u32 {
        self.params.tracks_per_surface
    }

    pub fn rpm(&self) -> u32 {
        self.params.rpm
    }

    pub fn sector_size(&self) -> u32 {
        self.params.sector_size
    }

    pub fn seek_overhead(&self) -> f64 {
        self.params.seek_overhead
    }

    pub fn seek_per_track(&self) -> f64 {
        self.params.seek_per_track
    }

    /// The number of sectors gained per track moving outward.
    pub fn sector_gradient(&self) -> f64 {
        f64::from(self.sector_spread()) / f64::from(self.params.tracks_per_surface - 1)
    }

    fn sector_spread(&self) -> u32 {
        self.params.sectors_outermost_track - self.params.sectors_innermost_track
    }

    /// The number of sectors one surface holds on the given track.
    ///
    /// This is `floor(innermost + gradient * track)`, evaluated exactly in integers so that the
    /// outermost track always comes out at precisely the configured count.
    pub fn sectors_on_track(&self, track: u32) -> u32 {
        let step = u64::from(self.sector_spread()) * u64::from(track)
            / u64::from(self.params.tracks_per_surface - 1);

        self.params.sectors_innermost_track + step as u32
    }

    /// The index of the first block on the given track.
    ///
    /// This is the number of blocks on all tracks before it, so any track past the outermost one
    /// starts at the capacity of the disk.
    pub fn track_start(&self, track: u32) -> u64 {
        match track {
            0 => 0,
            _ => self
                .track_ends
                .get(track as usize - 1)
                .copied()
                .unwrap_or_else(|| self.capacity_sectors()),
        }
    }

    pub(crate) fn track_ends(&self) -> &[u64] {
        &self.track_ends
    }

    /// The total number of sectors on the disk.
    pub fn capacity_sectors(&self) -> u64 {
        // There are always at least two tracks.
        self.track_ends[self.track_ends.len() - 1]
    }

    /// The total number of bytes on the disk.
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_sectors() * u64::from(self.params.sector_size)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        platter_util::dump_table(
            f,
            "HDD",
            &[
                ("surfaces", self.params.surfaces.to_string()),
                ("tracks/surface", self.params.tracks_per_surface.to_string()),
                ("sect on innermost track", self.params.sectors_innermost_track.to_string()),
                ("sect on outermost track", self.params.sectors_outermost_track.to_string()),
                ("rpm", self.params.rpm.to_string()),
                ("sector size", self.params.sector_size.to_string()),
                ("number of sectors total", self.capacity_sectors().to_string()),
                (
                    "capacity (GB)",
                    format!("{:.3}", platter_util::bytes_to_gb(self.capacity_bytes())),
                ),
            ],
        )
    }
}
