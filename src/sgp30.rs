//! Sensirion SGP30 gas sensor.
//!
//! Every reply is made of big-endian words, each followed by a CRC-8 byte.
//!
//! When a [`BaselineConfig`] is given, the driver restores the stored baseline at
//! construction and writes a fresh one back every `interval` from
//! [`read_air_quality`](Sgp30::read_air_quality).
//!
//! After [`start_measurements`](Sgp30::start_measurements) the sensor reports 400 ppm and
//! 0 ppb for about 15 seconds, and expects to be polled once per second.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

use crate::baseline::{self, Autosave, Baseline, Stored, BASELINE_LEN};
use crate::bus::{Client, I2cDevice, Transport};
use crate::config::BaselineConfig;
use crate::crc;
use crate::error::Error;
use crate::frame::word;
use crate::time::{Clock, SystemClock};
use crate::types::{AirQuality, Features, SerialNumber};

/// Fixed I²C address.
pub const ADDRESS: u8 = 0x58;

/// Time the sensor needs between a measure command and its result.
pub const MEASURE_DELAY_MS: u32 = 10;

const GET_SERIAL_ID: [u8; 2] = [0x36, 0x82];
const GET_FEATURE_SET: [u8; 2] = [0x20, 0x2f];
const INIT_AIR_QUALITY: [u8; 2] = [0x20, 0x03];
const MEASURE_AIR_QUALITY: [u8; 2] = [0x20, 0x08];
const GET_BASELINE: [u8; 2] = [0x20, 0x15];

pub struct Sgp30<T, D, C = SystemClock> {
    client: Client<T>,
    delay: D,
    serial: SerialNumber,
    autosave: Option<Autosave<C>>,
}

impl<I2C: I2c, D: DelayNs> Sgp30<I2cDevice<I2C>, D> {
    /// Opens the sensor at [`ADDRESS`] on `i2c`.
    pub fn from_i2c(
        i2c: I2C,
        delay: D,
        calibration: Option<BaselineConfig>,
    ) -> Result<Self, Error<I2C::Error>> {
        Self::new(I2cDevice::new(i2c, ADDRESS), delay, calibration)
    }
}

impl<T: Transport, D: DelayNs> Sgp30<T, D> {
    pub fn new(
        transport: T,
        delay: D,
        calibration: Option<BaselineConfig>,
    ) -> Result<Self, Error<T::Error>> {
        Self::with_clock(transport, delay, SystemClock, calibration)
    }
}

impl<T: Transport, D: DelayNs, C: Clock> Sgp30<T, D, C> {
    /// Identifies the sensor by reading its serial number, then restores the baseline
    /// stored at `calibration.path` if there is one.
    ///
    /// A missing baseline file is fine. A file that exists but does not hold a valid
    /// baseline fails construction.
    pub fn with_clock(
        transport: T,
        delay: D,
        clock: C,
        calibration: Option<BaselineConfig>,
    ) -> Result<Self, Error<T::Error>> {
        let mut client = Client::new(transport);
        let serial = read_serial_number(&mut client)?;
        debug!("sgp30: serial number {}", serial);

        let mut sensor = Self {
            client,
            delay,
            serial,
            autosave: None,
        };

        if let Some(config) = calibration {
            let autosave = Autosave::new(config, clock);
            sensor.restore(autosave.path())?;
            sensor.autosave = Some(autosave);
        }

        Ok(sensor)
    }

    fn restore(&mut self, path: &std::path::Path) -> Result<(), Error<T::Error>> {
        match baseline::load(path).map_err(Error::Storage)? {
            Stored::Missing => {
                debug!("sgp30: no baseline at {}", path.display());
                Ok(())
            }
            Stored::Found(Err(e)) => {
                warn!("sgp30: baseline at {} is unusable: {}", path.display(), e);
                Err(e.into())
            }
            Stored::Found(Ok(stored)) => {
                self.set_baseline(&stored)?;
                info!("sgp30: restored baseline from {}", path.display());
                Ok(())
            }
        }
    }

    /// Serial number read when the driver was created.
    pub fn serial_number(&self) -> SerialNumber {
        self.serial
    }

    /// Reads the serial number from the sensor again.
    pub fn get_serial_number(&mut self) -> Result<SerialNumber, Error<T::Error>> {
        read_serial_number(&mut self.client)
    }

    pub fn get_features(&mut self) -> Result<Features, Error<T::Error>> {
        let mut data = [0u8; 3];
        self.client.immediate(&GET_FEATURE_SET, &mut data)?;
        check_crc::<T::Error>(&data)?;
        Ok(Features {
            product_type: data[0],
            product_version: data[1],
        })
    }

    /// Starts the on-chip air quality algorithm. Safe to send more than once.
    pub fn start_measurements(&mut self) -> Result<(), Error<T::Error>> {
        self.client.immediate(&INIT_AIR_QUALITY, &mut [])
    }

    /// Triggers a measurement and returns CO₂eq and TVOC.
    ///
    /// The sensor has to be measuring already. When the autosave interval has elapsed, the
    /// current baseline is read and written to the configured file. Failing to read it is
    /// returned as an error. Failing to write the file is logged. Either way the save stays
    /// due and is tried again on the next call.
    pub fn read_air_quality(&mut self) -> Result<AirQuality, Error<T::Error>> {
        let mut data = [0u8; 6];
        self.client.delayed(
            &mut self.delay,
            MEASURE_DELAY_MS,
            &MEASURE_AIR_QUALITY,
            &mut data,
        )?;
        check_crc::<T::Error>(&data)?;
        let reading = AirQuality {
            co2_eq_ppm: word(&data, 0),
            tvoc_ppb: word(&data, 3),
        };
        debug!("sgp30: {:?}", reading);

        if self.autosave.as_ref().is_some_and(Autosave::is_due) {
            self.autosave_baseline()?;
        }

        Ok(reading)
    }

    fn autosave_baseline(&mut self) -> Result<(), Error<T::Error>> {
        let current = self.read_baseline()?;
        let Some(autosave) = self.autosave.as_mut() else {
            return Ok(());
        };
        match baseline::store(autosave.path(), &current) {
            Ok(()) => {
                autosave.mark_saved();
                info!("sgp30: saved baseline to {}", autosave.path().display());
            }
            Err(e) => warn!(
                "sgp30: could not save baseline to {}: {}",
                autosave.path().display(),
                e
            ),
        }
        Ok(())
    }

    /// Reads the baseline now and writes it to the configured file.
    ///
    /// Returns `Ok(None)` when no file is configured.
    pub fn save_baseline(&mut self) -> Result<Option<Baseline>, Error<T::Error>> {
        if self.autosave.is_none() {
            return Ok(None);
        }
        let current = self.read_baseline()?;
        if let Some(autosave) = self.autosave.as_mut() {
            baseline::store(autosave.path(), &current).map_err(Error::Storage)?;
            autosave.mark_saved();
        }
        Ok(Some(current))
    }

    /// Current baseline, in the order the sensor reports it (CO₂, TVOC).
    pub fn read_baseline(&mut self) -> Result<Baseline, Error<T::Error>> {
        let mut data = [0u8; BASELINE_LEN];
        self.client.immediate(&GET_BASELINE, &mut data)?;
        check_crc::<T::Error>(&data)?;
        Ok(Baseline::try_from(&data[..])?)
    }

    /// Starts measurements, then writes `baseline` back.
    ///
    /// The sensor only accepts a baseline while measuring.
    pub fn set_baseline(&mut self, baseline: &Baseline) -> Result<(), Error<T::Error>> {
        self.start_measurements()?;
        self.client.immediate(&baseline.set_command(), &mut [])
    }

    /// Like [`set_baseline`](Self::set_baseline) for raw bytes, such as a saved file.
    pub fn set_baseline_bytes(&mut self, bytes: &[u8]) -> Result<(), Error<T::Error>> {
        let baseline = Baseline::try_from(bytes)?;
        self.set_baseline(&baseline)
    }

    pub fn release(self) -> T {
        self.client.release()
    }
}

fn read_serial_number<T: Transport>(
    client: &mut Client<T>,
) -> Result<SerialNumber, Error<T::Error>> {
    let mut data = [0u8; 9];
    client.immediate(&GET_SERIAL_ID, &mut data)?;
    check_crc::<T::Error>(&data)?;
    Ok(SerialNumber::from_words([
        word(&data, 0),
        word(&data, 3),
        word(&data, 6),
    ]))
}

fn check_crc<E: core::fmt::Debug>(reply: &[u8]) -> Result<(), Error<E>> {
    crc::validate_groups(reply).map_err(|group| {
        warn!("sgp30: CRC-8 failed on word {} of {:02x?}", group, reply);
        Error::CrcMismatch { group }
    })
}
