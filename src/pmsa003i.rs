//! Plantower PMSA003I particle concentration sensor.
//!
//! The sensor streams a fresh 32-byte frame continuously, so every reading is a plain
//! read with no command.

use log::{debug, warn};

use crate::bus::{Client, I2cDevice, Transport};
use crate::error::{Error, FrameFault};
use crate::frame::{verify_checksum, word};
use crate::types::Pmsa003iData;

/// Fixed I²C address.
pub const ADDRESS: u8 = 0x12;

pub const FRAME_LEN: usize = 32;

const START_MARKER: u16 = 0x424d;
/// Value of the length field: everything after it.
const PAYLOAD_LEN: u16 = FRAME_LEN as u16 - 4;

const LENGTH_OFFSET: usize = 0x02;
const VERSION_OFFSET: usize = 0x1c;
const ERROR_OFFSET: usize = 0x1d;

pub struct Pmsa003i<T> {
    client: Client<T>,
}

impl<I2C: embedded_hal::i2c::I2c> Pmsa003i<I2cDevice<I2C>> {
    /// Probes the sensor at [`ADDRESS`] on `i2c`.
    pub fn from_i2c(i2c: I2C) -> Result<Self, Error<I2C::Error>> {
        Self::new(I2cDevice::new(i2c, ADDRESS))
    }
}

impl<T: Transport> Pmsa003i<T> {
    /// Reads and validates one frame; fails if the sensor is absent or the frame is bad.
    pub fn new(transport: T) -> Result<Self, Error<T::Error>> {
        let mut sensor = Self {
            client: Client::new(transport),
        };
        sensor.read_sensor()?;
        Ok(sensor)
    }

    /// Reads a frame and decodes it.
    ///
    /// A bad start word or checksum can be caused by bus noise, so retrying is reasonable.
    pub fn read_sensor(&mut self) -> Result<Pmsa003iData, Error<T::Error>> {
        let mut frame = [0u8; FRAME_LEN];
        self.client.immediate(&[], &mut frame)?;
        let data = decode::<T::Error>(&frame)
            .inspect_err(|e| warn!("pmsa003i: rejected frame: {}", e))?;
        debug!("pmsa003i: {:?}", data);
        Ok(data)
    }

    pub fn release(self) -> T {
        self.client.release()
    }
}

/// Validates a raw frame and extracts the measurement.
pub fn decode<E: core::fmt::Debug>(frame: &[u8; FRAME_LEN]) -> Result<Pmsa003iData, Error<E>> {
    let marker = word(frame, 0);
    if marker != START_MARKER {
        return Err(FrameFault::StartMarker(marker).into());
    }
    verify_checksum::<E>(frame)?;
    let length = word(frame, LENGTH_OFFSET);
    if length != PAYLOAD_LEN {
        return Err(FrameFault::Length(length).into());
    }
    if frame[ERROR_OFFSET] != 0x00 {
        return Err(FrameFault::DeviceError(frame[ERROR_OFFSET]).into());
    }

    Ok(Pmsa003iData {
        cf_pm1_0: word(frame, 0x04),
        cf_pm2_5: word(frame, 0x06),
        cf_pm10: word(frame, 0x08),
        env_pm1_0: word(frame, 0x0a),
        env_pm2_5: word(frame, 0x0c),
        env_pm10: word(frame, 0x0e),
        count_0_3: word(frame, 0x10),
        count_0_5: word(frame, 0x12),
        count_1_0: word(frame, 0x14),
        count_2_5: word(frame, 0x16),
        count_5_0: word(frame, 0x18),
        count_10: word(frame, 0x1a),
        version: frame[VERSION_OFFSET],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::tests::{DeadBus, Nack};
    use crate::frame::checksum;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const GOOD_FRAME: [u8; FRAME_LEN] = [
        0x42, 0x4d, 0x00, 0x1c, 0x00, 0x00, 0x00, 0x01, //
        0x00, 0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x05, //
        0x00, 0x7e, 0x00, 0x2a, 0x00, 0x0f, 0x00, 0x09, //
        0x00, 0x03, 0x00, 0x03, 0x97, 0x00, 0x02, 0x14,
    ];

    fn bad_checksum_frame() -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = 0x42;
        frame[1] = 0x4d;
        frame
    }

    /// Rewrites the trailing checksum after editing a frame.
    fn reseal(frame: &mut [u8; FRAME_LEN]) {
        let sum = checksum(frame);
        frame[30..].copy_from_slice(&sum.to_be_bytes());
    }

    fn read(frame: [u8; FRAME_LEN]) -> I2cTransaction {
        I2cTransaction::read(ADDRESS, frame.to_vec())
    }

    fn expected_data() -> Pmsa003iData {
        Pmsa003iData {
            cf_pm1_0: 0,
            cf_pm2_5: 1,
            cf_pm10: 5,
            env_pm1_0: 0,
            env_pm2_5: 1,
            env_pm10: 5,
            count_0_3: 126,
            count_0_5: 42,
            count_1_0: 15,
            count_2_5: 9,
            count_5_0: 3,
            count_10: 3,
            version: 151,
        }
    }

    #[test]
    fn decodes_reference_frame() {
        let data = decode::<()>(&GOOD_FRAME).unwrap();
        assert_eq!(data, expected_data());
        assert_eq!(GOOD_FRAME[ERROR_OFFSET], 0);
    }

    #[test]
    fn zero_frame_has_bad_start() {
        assert!(matches!(
            decode::<()>(&[0u8; FRAME_LEN]),
            Err(Error::MalformedFrame(FrameFault::StartMarker(0)))
        ));
    }

    #[test]
    fn zero_checksum_word() {
        assert!(matches!(
            decode::<()>(&bad_checksum_frame()),
            Err(Error::ChecksumMismatch { expected: 0, .. })
        ));
    }

    #[test]
    fn wrong_length_field() {
        let mut frame = GOOD_FRAME;
        frame[3] = 0x1a;
        reseal(&mut frame);
        assert!(matches!(
            decode::<()>(&frame),
            Err(Error::MalformedFrame(FrameFault::Length(0x1a)))
        ));
    }

    #[test]
    fn device_error_code() {
        let mut frame = GOOD_FRAME;
        frame[ERROR_OFFSET] = 0x03;
        reseal(&mut frame);
        let err = decode::<()>(&frame).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedFrame(FrameFault::DeviceError(0x03))
        ));
        assert_eq!(
            err.to_string(),
            "malformed frame: sensor reported error code 0x03"
        );
    }

    #[test]
    fn new_fails_without_sensor() {
        assert!(matches!(
            Pmsa003i::new(DeadBus),
            Err(Error::Transport(Nack))
        ));
    }

    #[test]
    fn new_rejects_bad_frame() {
        let mut i2c = I2cMock::new(&[read([0u8; FRAME_LEN])]);
        let result = Pmsa003i::from_i2c(i2c.clone());
        assert!(matches!(
            result,
            Err(Error::MalformedFrame(FrameFault::StartMarker(_)))
        ));
        i2c.done();
    }

    #[test]
    fn new_accepts_good_frame() {
        let mut i2c = I2cMock::new(&[read(GOOD_FRAME)]);
        let sensor = Pmsa003i::from_i2c(i2c.clone()).unwrap();
        sensor.release().release();
        i2c.done();
    }

    #[test]
    fn read_sensor() {
        let mut i2c = I2cMock::new(&[read(GOOD_FRAME), read(GOOD_FRAME)]);
        let mut sensor = Pmsa003i::from_i2c(i2c.clone()).unwrap();
        assert_eq!(sensor.read_sensor().unwrap(), expected_data());
        i2c.done();
    }

    #[test]
    fn read_errors_leave_sensor_usable() {
        let expectations = [
            read(GOOD_FRAME),
            read([0u8; FRAME_LEN]),
            read(bad_checksum_frame()),
            read(GOOD_FRAME),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut sensor = Pmsa003i::from_i2c(i2c.clone()).unwrap();

        let err = sensor.read_sensor().unwrap_err();
        assert!(err.to_string().contains("bad start word"));
        let err = sensor.read_sensor().unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
        assert_eq!(sensor.read_sensor().unwrap(), expected_data());

        i2c.done();
    }
}
