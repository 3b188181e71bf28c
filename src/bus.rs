//! Request/response exchanges with a single device on the bus.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::debug;

use crate::error::Error;

/// A device at a fixed bus address that can write some bytes and then read some bytes.
pub trait Transport {
    type Error: Debug;

    /// Writes `write` (possibly nothing), then fills `read` (possibly nothing).
    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;
}

/// [`Transport`] over an `embedded-hal` I²C bus at a fixed 7-bit address.
pub struct I2cDevice<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cDevice<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Transport for I2cDevice<I2C> {
    type Error = I2C::Error;

    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        match (write.is_empty(), read.is_empty()) {
            (false, false) => self.i2c.write_read(self.address, write, read),
            (false, true) => self.i2c.write(self.address, write),
            (true, false) => self.i2c.read(self.address, read),
            (true, true) => Ok(()),
        }
    }
}

/// Issues transactions against a [`Transport`].
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Write and read in one bus operation.
    pub fn immediate(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Error<T::Error>> {
        debug!("tx {:02x?}, rx {} bytes", write, read.len());
        self.transport.transact(write, read).map_err(Error::Transport)
    }

    /// Sends `write`, blocks for `delay_ms`, then reads the reply with an empty write.
    ///
    /// Used when the device needs time to produce a result after the command.
    pub fn delayed<D: DelayNs>(
        &mut self,
        delay: &mut D,
        delay_ms: u32,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Error<T::Error>> {
        self.immediate(write, &mut [])?;
        delay.delay_ms(delay_ms);
        self.immediate(&[], read)
    }

    pub fn release(self) -> T {
        self.transport
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    /// Delay that records how long it was asked to wait instead of sleeping.
    #[derive(Default)]
    pub(crate) struct RecordingDelay {
        pub(crate) total_ns: u64,
        pub(crate) calls: usize,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
            self.calls += 1;
        }
    }

    /// Transport whose every exchange fails.
    pub(crate) struct DeadBus;

    #[derive(Debug, PartialEq)]
    pub(crate) struct Nack;

    impl Transport for DeadBus {
        type Error = Nack;

        fn transact(&mut self, _write: &[u8], _read: &mut [u8]) -> Result<(), Nack> {
            Err(Nack)
        }
    }

    #[test]
    fn picks_operation_by_shape() {
        let expectations = [
            I2cTransaction::write_read(0x58, vec![0x20, 0x2f], vec![0x00, 0x22, 0x65]),
            I2cTransaction::write(0x58, vec![0x20, 0x03]),
            I2cTransaction::read(0x58, vec![0x01, 0x02]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut device = I2cDevice::new(i2c.clone(), 0x58);

        let mut features = [0u8; 3];
        device.transact(&[0x20, 0x2f], &mut features).unwrap();
        assert_eq!(features, [0x00, 0x22, 0x65]);

        device.transact(&[0x20, 0x03], &mut []).unwrap();

        let mut buf = [0u8; 2];
        device.transact(&[], &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02]);

        // Nothing to do, nothing on the bus.
        device.transact(&[], &mut []).unwrap();

        i2c.done();
    }

    #[test]
    fn delayed_splits_command_and_reply() {
        let expectations = [
            I2cTransaction::write(0x58, vec![0x20, 0x08]),
            I2cTransaction::read(0x58, vec![0x01, 0x9e, 0x53, 0x00, 0x0d, 0xcd]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut client = Client::new(I2cDevice::new(i2c.clone(), 0x58));
        let mut delay = RecordingDelay::default();

        let mut reply = [0u8; 6];
        client
            .delayed(&mut delay, 10, &[0x20, 0x08], &mut reply)
            .unwrap();
        assert_eq!(reply, [0x01, 0x9e, 0x53, 0x00, 0x0d, 0xcd]);
        assert_eq!(delay.total_ns, 10_000_000);

        i2c.done();
    }

    #[test]
    fn delayed_stops_when_command_fails() {
        let mut client = Client::new(DeadBus);
        let mut delay = RecordingDelay::default();

        let result = client.delayed(&mut delay, 10, &[0x20, 0x08], &mut [0u8; 6]);
        assert!(matches!(result, Err(Error::Transport(Nack))));
        assert_eq!(delay.calls, 0);
    }
}
