//! Drivers for two I²C air quality sensors, built on `embedded-hal` 1.0:
//!
//! - [`Pmsa003i`]: Plantower PMSA003I particle concentration sensor.
//! - [`Sgp30`]: Sensirion SGP30 CO₂eq/TVOC gas sensor, with optional baseline persistence.
//!
//! ```no_run
//! # fn run<I: embedded_hal::i2c::I2c>(i2c: I) -> Result<(), air_sensors::Error<I::Error>> {
//! use std::time::Duration;
//! use air_sensors::{BaselineConfig, Sgp30, ThreadDelay};
//!
//! let config = BaselineConfig::new(".sgp30_baseline").with_interval(Duration::from_secs(30));
//! let mut sgp30 = Sgp30::from_i2c(i2c, ThreadDelay, Some(config))?;
//! sgp30.start_measurements()?;
//! loop {
//!     std::thread::sleep(Duration::from_secs(1));
//!     let reading = sgp30.read_air_quality()?;
//!     println!("{} ppm, {} ppb", reading.co2_eq_ppm, reading.tvoc_ppb);
//! }
//! # }
//! ```

pub mod baseline;
pub mod bus;
pub mod config;
pub mod crc;
pub mod error;
pub mod frame;
pub mod pmsa003i;
pub mod sgp30;
pub mod time;
mod types;

pub use baseline::Baseline;
pub use bus::{Client, I2cDevice, Transport};
pub use config::BaselineConfig;
pub use error::{BaselineError, Error, FrameFault};
pub use pmsa003i::Pmsa003i;
pub use sgp30::Sgp30;
pub use time::{Clock, SystemClock, ThreadDelay};
pub use types::*;
