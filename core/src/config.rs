// SPDX-License-Identifier: MPL-2.0

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use platter_hdd::{Hdd, Params};

/// Everything needed to set up a simulated drive.
///
/// This can be deserialized from whichever format the host simulator keeps its settings in.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Config {
    pub hdd: Params,
}

impl Config {
    pub fn build(&self) -> anyhow::Result<Hdd> {
        Hdd::new(self.hdd.clone()).context("Failed to build HDD")
    }
}
