//! CRC-8 used by Sensirion sensors: polynomial 0x31, init 0xFF, no reflection, no final XOR.

/// Bytes per CRC group on the wire: one big-endian data word followed by its CRC.
pub const GROUP_LEN: usize = 3;

/// CRC-8 of `data`.
#[inline]
pub fn crc8(data: &[u8]) -> u8 {
    sensirion_i2c::crc8::calculate(data)
}

/// Running the CRC over a whole `{hi, lo, crc}` group leaves a zero residue when it is intact.
#[inline]
pub fn group_ok(group: &[u8]) -> bool {
    crc8(group) == 0x00
}

/// Checks every 3-byte group in `reply`, returning the index of the first bad one.
///
/// A trailing partial group is reported as bad.
pub fn validate_groups(reply: &[u8]) -> Result<(), usize> {
    for (group, chunk) in reply.chunks(GROUP_LEN).enumerate() {
        if chunk.len() != GROUP_LEN || !group_ok(chunk) {
            return Err(group);
        }
    }
    Ok(())
}
