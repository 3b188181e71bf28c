//! Big-endian word extraction and the additive frame checksum.

use crate::error::Error;

/// Reads the big-endian word starting at `offset`.
///
/// # Panics
///
/// Panics if `offset + 1` is outside `data`.
#[inline]
pub fn word(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

/// Wrapping 16-bit sum of every byte except the trailing checksum word.
pub fn checksum(frame: &[u8]) -> u16 {
    frame[..frame.len().saturating_sub(2)]
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Whether the trailing word of `frame` matches [`checksum`].
pub fn checksum_ok(frame: &[u8]) -> bool {
    frame.len() >= 2 && word(frame, frame.len() - 2) == checksum(frame)
}

/// Like [`checksum_ok`], reporting both values on mismatch.
///
/// # Panics
///
/// Panics if `frame` is shorter than two bytes.
pub fn verify_checksum<E>(frame: &[u8]) -> Result<(), Error<E>>
where
    E: core::fmt::Debug,
{
    let expected = word(frame, frame.len() - 2);
    let calculated = checksum(frame);
    if expected == calculated {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            expected,
            calculated,
        })
    }
}
