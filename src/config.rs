use std::path::{Path, PathBuf};
use std::time::Duration;

/// How often the SGP30 baseline is written back when no interval is given.
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Where the SGP30 baseline is persisted and how often it is refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineConfig {
    pub path: PathBuf,
    pub interval: Duration,
}

impl BaselineConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: DEFAULT_SAVE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
