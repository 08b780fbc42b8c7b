// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An access-time model of a rotating disk with zoned bit recording.
//!
//! Outer tracks hold more sectors than inner ones, with the count growing linearly across the
//! surface. [`Hdd`] turns a byte address and a size into the time the request takes to complete,
//! accounting for seeks, rotational latency, and the per-sector transfer rate of each track the
//! request touches.

mod geometry;
mod pos;
pub mod probe;
pub mod timing;

use std::fmt;

use derivative::Derivative;

pub use geometry::{Geometry, GeometryError, Params};
pub use pos::Position;
pub use probe::{Probe, TraceProbe};
pub use timing::{Op, Transfer};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The drive parameters are physically inconsistent.
    InvalidGeometry(GeometryError),
    /// A request reaches outside of the disk.
    ///
    /// `len` is zero when only the address itself was checked.
    OutOfRange { addr: u64, len: u64, capacity: u64 },
    /// A position does not exist on the disk.
    InvalidPosition(Position),
}

impl From<GeometryError> for Error {
    fn from(e: GeometryError) -> Self {
        Self::InvalidGeometry(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry(e) => write!(f, "invalid geometry: {}", e),
            Self::OutOfRange { addr, len, capacity } => write!(
                f,
                "{:#x} bytes at {:#x} do not fit in a disk of {:#x} bytes",
                len,
                addr,
                capacity,
            ),
            Self::InvalidPosition(pos) => write!(f, "no such position: {}", pos),
        }
    }
}

impl std::error::Error for Error {}

/// A timed access, broken down into its parts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Access {
    pub op: Op,
    /// Where the request began.
    pub start: Position,
    pub seek: f64,
    pub wait: f64,
    pub transfer: f64,
    /// The track the head was left over.
    pub head: u32,
    /// The timestamp at which the access completed.
    pub done: f64,
}

impl Access {
    pub fn elapsed(&self) -> f64 {
        self.seek + self.wait + self.transfer
    }
}

impl Hdd {
    /// Creates a new [`Hdd`] with its head over the innermost track.
    ///
    /// Accesses are traced if `params.verbose` is set.
    pub fn new(params: Params) -> Result<Self, Error> {
        if params.verbose {
            Self::with_probe(params, TraceProbe)
        } else {
            Self::with_probe(params, ())
        }
    }

    pub fn with_probe(params: Params, probe: impl 'static + Probe) -> Result<Self, Error> {
        let geom = Geometry::new(params)?;
        tracing::info!("{}", geom);

        Ok(Self { geom, head: 0, probe: Box::new(probe) })
    }
}

/// A hard disk drive.
///
/// The only state that changes over the life of a drive is the track the head is over.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Hdd {
    geom: Geometry,
    head: u32,
    #[derivative(Debug = "ignore")]
    probe: Box<dyn Probe>,
}

impl Hdd {
    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    /// The track the head is currently over.
    pub fn head(&self) -> u32 {
        self.head
    }

    pub fn decode(&self, addr: u64) -> Result<Position, Error> {
        let pos = self.geom.decode(addr)?;
        self.probe.on_decode(
            addr,
            addr / u64::from(self.geom.sector_size()),
            pos,
            self.geom.remaining_on_track(pos),
        );

        Ok(pos)
    }

    /// Reads `size` bytes from `addr`, starting at time `ts`, and returns when the read completes.
    pub fn read(&mut self, ts: f64, addr: u64, size: u64) -> Result<f64, Error> {
        self.access(Op::Read, ts, addr, size).map(|it| it.done)
    }

    /// Writes `size` bytes to `addr`, starting at time `ts`, and returns when the write completes.
    pub fn write(&mut self, ts: f64, addr: u64, size: u64) -> Result<f64, Error> {
        self.access(Op::Write, ts, addr, size).map(|it| it.done)
    }

    /// Times an access of `size` bytes at `addr` and moves the head to wherever it ends.
    ///
    /// Only whole sectors are transferred; a trailing partial sector is ignored. The head does
    /// not move if the request is rejected.
    pub fn access(&mut self, op: Op, ts: f64, addr: u64, size: u64) -> Result<Access, Error> {
        let start = self.decode(addr)?;

        let sectors = size / u64::from(self.geom.sector_size());
        let first = self.geom.block_index(start)?;
        match first.checked_add(sectors) {
            Some(end) if end <= self.geom.capacity_sectors() => {}
            _ => {
                return Err(Error::OutOfRange {
                    addr,
                    len: size,
                    capacity: self.geom.capacity_bytes(),
                });
            }
        }

        let seek = self.geom.seek_time(self.head, start.track);
        let wait = self.geom.rotational_wait();
        let xfer = self.geom.transfer(op, start, sectors)?;

        let access = Access {
            op,
            start,
            seek,
            wait,
            transfer: xfer.duration,
            head: xfer.head,
            done: ts + seek + wait + xfer.duration,
        };
        self.head = xfer.head;
        self.probe.on_access(&access);

        Ok(access)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn params() -> Params {
        Params {
            surfaces: 1,
            tracks_per_surface: 2,
            sectors_innermost_track: 10,
            sectors_outermost_track: 20,
            rpm: 6000,
            sector_size: 512,
            seek_overhead: 0.0,
            seek_per_track: 0.0,
            verbose: false,
        }
    }

    fn seeking_params() -> Params {
        Params { seek_overhead: 0.002, seek_per_track: 0.001, ..params() }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn read_one_sector() {
        let mut hdd = Hdd::new(params()).unwrap();

        assert_close(hdd.read(0.0, 0, 512).unwrap(), 0.006);
        assert_eq!(hdd.head(), 0);
    }

    #[test]
    fn timestamps_accumulate() {
        let mut hdd = Hdd::new(params()).unwrap();

        assert_close(hdd.read(1.5, 0, 512).unwrap(), 1.506);
    }

    #[test]
    fn partial_sectors_are_truncated() {
        let mut hdd = Hdd::new(params()).unwrap();

        assert_close(hdd.read(0.0, 0, 1023).unwrap(), 0.006);
        // Nothing but the rotational wait.
        assert_close(hdd.read(0.0, 0, 100).unwrap(), 0.005);
    }

    #[test]
    fn seek_then_read() {
        let mut hdd = Hdd::new(seeking_params()).unwrap();

        // Track 1 is a single track away, and its sectors take half as long.
        let done = hdd.read(0.0, 10 * 512, 2 * 512).unwrap();
        assert_close(done, 0.003 + 0.005 + 2.0 * 0.0005);
        assert_eq!(hdd.head(), 1);

        // Going back costs the same seek.
        let done = hdd.read(done, 0, 512).unwrap();
        assert_close(done, 0.009 + 0.003 + 0.005 + 0.001);
        assert_eq!(hdd.head(), 0);
    }

    #[test]
    fn read_across_tracks_moves_head() {
        let mut hdd = Hdd::new(seeking_params()).unwrap();

        let access = hdd.access(Op::Read, 0.0, 8 * 512, 4 * 512).unwrap();
        assert_eq!(access.start, Position { track: 0, sector: 8, surface: 0 });
        assert_close(access.seek, 0.0);
        assert_close(access.wait, 0.005);
        assert_close(access.transfer, 0.002 + 0.003 + 0.005 + 0.001);
        assert_close(access.elapsed(), 0.016);
        assert_eq!(access.head, 1);
        assert_eq!(hdd.head(), 1);
    }

    #[test]
    fn write_matches_read() {
        let mut reader = Hdd::new(seeking_params()).unwrap();
        let mut writer = Hdd::new(seeking_params()).unwrap();

        for (addr, size) in [(8 * 512, 4 * 512), (0, 512), (12 * 512, 18 * 512)] {
            assert_eq!(
                reader.read(0.25, addr, size).unwrap(),
                writer.write(0.25, addr, size).unwrap(),
            );
            assert_eq!(reader.head(), writer.head());
        }
    }

    #[test]
    fn rejected_requests_leave_head_alone() {
        let mut hdd = Hdd::new(seeking_params()).unwrap();
        hdd.read(0.0, 15 * 512, 512).unwrap();
        assert_eq!(hdd.head(), 1);

        assert_eq!(
            hdd.read(0.0, 30 * 512, 512),
            Err(Error::OutOfRange { addr: 30 * 512, len: 0, capacity: 30 * 512 }),
        );
        assert_eq!(
            hdd.write(0.0, 0, 31 * 512),
            Err(Error::OutOfRange { addr: 0, len: 31 * 512, capacity: 30 * 512 }),
        );
        assert!(hdd.read(0.0, 29 * 512, u64::MAX).is_err());
        assert_eq!(hdd.head(), 1);
    }

    #[test]
    fn whole_disk() {
        let mut hdd = Hdd::new(params()).unwrap();

        assert_close(hdd.read(0.0, 0, 30 * 512).unwrap(), 0.005 + 0.01 + 0.005 + 0.01);
        assert_eq!(hdd.head(), 1);
    }

    #[test]
    fn bad_geometry_fails() {
        let params = Params { sectors_outermost_track: 10, ..params() };

        assert_eq!(
            Hdd::new(params).unwrap_err(),
            Error::InvalidGeometry(GeometryError::OuterNotLarger),
        );
    }

    #[test]
    fn verbose_drive_still_times() {
        let mut hdd = Hdd::new(Params { verbose: true, ..params() }).unwrap();

        assert_close(hdd.read(0.0, 0, 512).unwrap(), 0.006);
    }

    #[derive(Default)]
    struct Recorder {
        decodes: Arc<Mutex<Vec<(u64, u64, Position, u64)>>>,
        accesses: Arc<Mutex<Vec<Access>>>,
    }

    impl Probe for Recorder {
        fn on_decode(&self, addr: u64, block: u64, pos: Position, remaining: u64) {
            self.decodes.lock().unwrap().push((addr, block, pos, remaining));
        }

        fn on_access(&self, access: &Access) {
            self.accesses.lock().unwrap().push(*access);
        }
    }

    #[test]
    fn probe_sees_everything() {
        let recorder = Recorder::default();
        let decodes = Arc::clone(&recorder.decodes);
        let accesses = Arc::clone(&recorder.accesses);
        let mut hdd = Hdd::with_probe(params(), recorder).unwrap();

        let pos = hdd.decode(9 * 512 + 7).unwrap();
        hdd.write(0.0, 0, 512).unwrap();
        let _ = hdd.read(0.0, 40 * 512, 512);

        let decodes = decodes.lock().unwrap();
        assert_eq!(
            *decodes,
            [(9 * 512 + 7, 9, pos, 1), (0, 0, Position::default(), 10)],
        );

        let accesses = accesses.lock().unwrap();
        assert_eq!(accesses.len(), 1);
        assert_eq!(accesses[0].op, Op::Write);
        assert_close(accesses[0].done, 0.006);
    }

    #[test]
    fn debug_skips_probe() {
        let hdd = Hdd::new(params()).unwrap();
        let dbg = format!("{:?}", hdd);

        assert!(dbg.starts_with("Hdd {"));
        assert!(!dbg.contains("probe"));
    }
}
