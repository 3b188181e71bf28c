use core::fmt::Debug;

/// Errors returned by the drivers, generic over the transport error `E`.
///
/// Frame, checksum and CRC failures can be caused by bus noise or a busy sensor, so the driver
/// stays usable after any of them.
#[derive(Debug, thiserror::Error)]
pub enum Error<E = ()>
where
    E: Debug,
{
    /// The underlying bus exchange failed.
    #[error("bus transport error: {0:?}")]
    Transport(E),

    /// The particle frame is structurally wrong or the sensor flagged an error.
    #[error("malformed frame: {0}")]
    MalformedFrame(FrameFault),

    /// The additive frame checksum does not match.
    #[error("checksum mismatch: frame says {expected:#06x}, calculated {calculated:#06x}")]
    ChecksumMismatch { expected: u16, calculated: u16 },

    /// A 3-byte CRC-8 group in a reply failed, counting from zero.
    #[error("CRC-8 mismatch in word {group}")]
    CrcMismatch { group: usize },

    /// Baseline bytes handed to the sensor or restored from storage are unusable.
    #[error("invalid baseline: {0}")]
    InvalidBaseline(BaselineError),

    /// Reading or writing the baseline file failed.
    #[error("baseline storage: {0}")]
    Storage(#[source] std::io::Error),
}

/// Why a particle frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameFault {
    #[error("bad start word {0:#06x}")]
    StartMarker(u16),
    #[error("bad frame length {0}")]
    Length(u16),
    #[error("sensor reported error code {0:#04x}")]
    DeviceError(u8),
}

/// Why a baseline blob was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BaselineError {
    #[error("expected 6 bytes, got {0}")]
    Length(usize),
    #[error("CRC-8 mismatch in word {group}")]
    Crc { group: usize },
}

impl<E: Debug> From<BaselineError> for Error<E> {
    fn from(e: BaselineError) -> Self {
        Error::InvalidBaseline(e)
    }
}

impl<E: Debug> From<FrameFault> for Error<E> {
    fn from(e: FrameFault) -> Self {
        Error::MalformedFrame(e)
    }
}
