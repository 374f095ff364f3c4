//! 16-bit frame checksum.
//!
//! A byte-at-a-time CRC-16 (the reflected CCITT polynomial computed without a
//! table). Both the serializer and the receiver fold type, length and then
//! the payload bytes, in that order, starting from [`INITIAL_CRC`].

/// Seed for every frame checksum.
pub const INITIAL_CRC: u16 = 0xFFFF;

/// Fold one byte into a running checksum.
#[inline]
pub const fn update_crc(byte: u8, crc: u16) -> u16 {
    let mut b = byte ^ (crc & 0x00FF) as u8;
    b ^= b << 4;
    ((b as u16) << 8 | (crc >> 8)) ^ (b >> 4) as u16 ^ (b as u16) << 3
}

/// Checksum of a frame: type, length, then every payload byte.
pub fn frame_checksum(packet_type: u8, length: u8, payload: &[u8]) -> u16 {
    let mut crc = Crc::new();
    crc.update(packet_type);
    crc.update(length);
    crc.update_slice(payload);
    crc.value()
}

/// Running checksum accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc(u16);

impl Crc {
    /// Start a new accumulator at [`INITIAL_CRC`].
    pub const fn new() -> Self {
        Self(INITIAL_CRC)
    }

    pub fn update(&mut self, byte: u8) {
        self.0 = update_crc(byte, self.0);
    }

    pub fn update_slice(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Current accumulator value.
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl Default for Crc {
    fn default() -> Self {
        Self::new()
    }
}
