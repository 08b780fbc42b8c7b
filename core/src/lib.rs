// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage timing models for performance simulators.
//!
//! A simulator hands each request to a [`Storage`] device along with the current simulated time,
//! and receives the time at which the request completes.

pub mod config;
pub mod log;

pub use config::Config;
pub use platter_hdd::{self as hdd, Hdd};

/// A device that can time reads and writes.
///
/// Requests must be issued in simulated-time order; devices carry state, such as head position,
/// from one request to the next.
pub trait Storage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads `size` bytes at `addr`, beginning at time `ts`, and returns the completion time.
    fn read(&mut self, ts: f64, addr: u64, size: u64) -> Result<f64, Self::Error>;

    /// Writes `size` bytes at `addr`, beginning at time `ts`, and returns the completion time.
    fn write(&mut self, ts: f64, addr: u64, size: u64) -> Result<f64, Self::Error>;

    /// The capacity, in bytes, of this device.
    fn capacity(&self) -> u64;
}

impl Storage for Hdd {
    type Error = hdd::Error;

    fn read(&mut self, ts: f64, addr: u64, size: u64) -> Result<f64, Self::Error> {
        Hdd::read(self, ts, addr, size)
    }

    fn write(&mut self, ts: f64, addr: u64, size: u64) -> Result<f64, Self::Error> {
        Hdd::write(self, ts, addr, size)
    }

    fn capacity(&self) -> u64 {
        self.geometry().capacity_bytes()
    }
}
