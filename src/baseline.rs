//! SGP30 baseline calibration: the validated 6-byte value and its on-disk persistence.
//!
//! The sensor reports the baseline as (CO₂ word, TVOC word) but expects it back as
//! (TVOC word, CO₂ word). [`Baseline`] always holds the read order, which is also the file
//! format.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::BaselineConfig;
use crate::crc;
use crate::error::BaselineError;
use crate::frame::word;
use crate::time::Clock;

pub const BASELINE_LEN: usize = 6;

/// Command prefix for writing a baseline back to the sensor.
pub(crate) const SET_BASELINE: [u8; 2] = [0x20, 0x1e];

/// Six baseline bytes in read order, each word with a valid CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[u8; 6]", into = "[u8; 6]"))]
pub struct Baseline([u8; BASELINE_LEN]);

impl Baseline {
    pub fn as_bytes(&self) -> &[u8; BASELINE_LEN] {
        &self.0
    }

    pub fn co2_word(&self) -> u16 {
        word(&self.0, 0)
    }

    pub fn tvoc_word(&self) -> u16 {
        word(&self.0, 3)
    }

    /// The groups in write order (TVOC, CO₂).
    pub fn swapped(&self) -> [u8; BASELINE_LEN] {
        let mut out = [0u8; BASELINE_LEN];
        out[..3].copy_from_slice(&self.0[3..]);
        out[3..].copy_from_slice(&self.0[..3]);
        out
    }

    /// Full set-baseline bus write: command followed by the swapped groups.
    pub fn set_command(&self) -> [u8; 2 + BASELINE_LEN] {
        let mut out = [0u8; 2 + BASELINE_LEN];
        out[..2].copy_from_slice(&SET_BASELINE);
        out[2..].copy_from_slice(&self.swapped());
        out
    }
}

impl TryFrom<[u8; BASELINE_LEN]> for Baseline {
    type Error = BaselineError;

    fn try_from(bytes: [u8; BASELINE_LEN]) -> Result<Self, Self::Error> {
        crc::validate_groups(&bytes).map_err(|group| BaselineError::Crc { group })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&[u8]> for Baseline {
    type Error = BaselineError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; BASELINE_LEN] = bytes
            .try_into()
            .map_err(|_| BaselineError::Length(bytes.len()))?;
        Self::try_from(bytes)
    }
}

impl From<Baseline> for [u8; BASELINE_LEN] {
    fn from(baseline: Baseline) -> Self {
        baseline.0
    }
}

impl AsRef<[u8]> for Baseline {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// What was found at a baseline path.
#[derive(Debug)]
pub(crate) enum Stored {
    Missing,
    Found(Result<Baseline, BaselineError>),
}

/// Reads a baseline file. A missing file is not an error.
pub(crate) fn load(path: &Path) -> io::Result<Stored> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Stored::Found(Baseline::try_from(bytes.as_slice()))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Stored::Missing),
        Err(e) => Err(e),
    }
}

/// Writes the baseline in read order, replacing whatever was there.
pub(crate) fn store(path: &Path, baseline: &Baseline) -> io::Result<()> {
    std::fs::write(path, baseline.as_bytes())
}

/// Per-driver autosave bookkeeping.
pub(crate) struct Autosave<C> {
    config: BaselineConfig,
    last_save: Instant,
    clock: C,
}

impl<C: Clock> Autosave<C> {
    /// Starts counting the interval from now.
    pub(crate) fn new(config: BaselineConfig, clock: C) -> Self {
        let last_save = clock.now();
        Self {
            config,
            last_save,
            clock,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.config.path()
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.last_save)
    }

    pub(crate) fn is_due(&self) -> bool {
        self.elapsed() >= self.config.interval
    }

    pub(crate) fn mark_saved(&mut self) {
        self.last_save = self.clock.now();
    }
}
