use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::crc::frame_checksum;
use crate::error::{FrameError, Result};

/// Frame header: start marker (1) + type (1) + length (1) + checksum (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Start-of-packet marker.
pub const SOP: u8 = 0xA1;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Largest complete frame on the wire.
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Frame header as it appears on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Start marker, always [`SOP`] for a received frame.
    pub sop: u8,
    /// Application-defined packet type.
    pub packet_type: u8,
    /// Payload length in bytes, at most [`MAX_PAYLOAD_SIZE`].
    pub length: u8,
    /// Checksum over type, length and payload.
    pub crc: u16,
}

impl Header {
    /// The header in wire order (checksum little-endian).
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let [crc_lo, crc_hi] = self.crc.to_le_bytes();
        [self.sop, self.packet_type, self.length, crc_lo, crc_hi]
    }
}

/// A framed packet with its payload held in fixed-capacity storage.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: Header,
    pub(crate) payload: [u8; MAX_PAYLOAD_SIZE],
}

impl Packet {
    /// Build a packet and compute its checksum.
    pub fn new(packet_type: u8, payload: &[u8]) -> Result<Self> {
        let length = checked_length(payload)?;
        let mut packet = Self::default();
        packet.header = Header {
            sop: SOP,
            packet_type,
            length,
            crc: frame_checksum(packet_type, length, payload),
        };
        packet.payload[..payload.len()].copy_from_slice(payload);
        Ok(packet)
    }

    pub fn packet_type(&self) -> u8 {
        self.header.packet_type
    }

    /// The `length` meaningful payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..usize::from(self.header.length)]
    }

    /// The total wire size of this packet (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + usize::from(self.header.length)
    }

    /// Whether the stored checksum matches the type, length and payload.
    pub fn checksum_matches(&self) -> bool {
        frame_checksum(self.header.packet_type, self.header.length, self.payload())
            == self.header.crc
    }

    /// Serialize into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        put_frame(self.header.packet_type, self.payload(), &mut dst);
        dst.freeze()
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self {
            header: Header::default(),
            payload: [0u8; MAX_PAYLOAD_SIZE],
        }
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("header", &self.header)
            .field("payload", &self.payload())
            .finish()
    }
}

/// Serialize a frame into a caller-supplied buffer.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬──────────┬─────────────┬──────────────────┐
/// │ SOP (1B) │ Type (1B)│ Len (1B) │ CRC (2B LE) │ Payload          │
/// │ 0xA1     │          │ 0..=250  │             │ (Len bytes)      │
/// └──────────┴──────────┴──────────┴─────────────┴──────────────────┘
/// ```
///
/// Returns the number of bytes written. On error nothing is written.
pub fn serialize(packet_type: u8, payload: &[u8], dst: &mut [u8]) -> Result<usize> {
    let length = checked_length(payload)?;
    let total = HEADER_SIZE + payload.len();
    if dst.len() < total {
        return Err(FrameError::BufferTooSmall {
            needed: total,
            available: dst.len(),
        });
    }

    let header = Header {
        sop: SOP,
        packet_type,
        length,
        crc: frame_checksum(packet_type, length, payload),
    };
    dst[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
    dst[HEADER_SIZE..total].copy_from_slice(payload);
    Ok(total)
}

/// Append a frame to a growable buffer.
pub fn encode_frame(packet_type: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    checked_length(payload)?;
    put_frame(packet_type, payload, dst);
    Ok(())
}

fn put_frame(packet_type: u8, payload: &[u8], dst: &mut BytesMut) {
    let length = payload.len() as u8;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(SOP);
    dst.put_u8(packet_type);
    dst.put_u8(length);
    dst.put_u16_le(frame_checksum(packet_type, length, payload));
    dst.put_slice(payload);
}

fn checked_length(payload: &[u8]) -> Result<u8> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(payload.len() as u8)
}

/// Configuration for the stream adapters.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Bytes requested from the underlying stream per read. Default: 256.
    pub read_chunk_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Default read size for [`FrameConfig`]: one maximum-size frame, rounded up.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::{update_crc, INITIAL_CRC};

    #[test]
    fn serialize_empty_payload_matches_reference_bytes() {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let written = serialize(1, &[], &mut buf).unwrap();

        let crc = update_crc(0x00, update_crc(0x01, INITIAL_CRC));
        assert_eq!(crc, 0xE960);
        assert_eq!(written, HEADER_SIZE);
        assert_eq!(&buf[..written], &[0xA1, 0x01, 0x00, 0x60, 0xE9]);
    }

    #[test]
    fn serialize_with_payload() {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let written = serialize(9, &[1, 2, 3], &mut buf).unwrap();

        assert_eq!(written, HEADER_SIZE + 3);
        assert_eq!(&buf[..5], &[0xA1, 0x09, 0x03, 0xD6, 0x1F]);
        assert_eq!(&buf[5..8], &[1, 2, 3]);
    }

    #[test]
    fn serialize_max_payload() {
        let payload = [0x5A; MAX_PAYLOAD_SIZE];
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let written = serialize(2, &payload, &mut buf).unwrap();
        assert_eq!(written, MAX_PACKET_SIZE);
        assert_eq!(buf[2], MAX_PAYLOAD_SIZE as u8);
    }

    #[test]
    fn serialize_rejects_oversized_payload() {
        let payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let mut buf = [0xEEu8; MAX_PACKET_SIZE + 1];
        let err = serialize(1, &payload, &mut buf).unwrap_err();

        assert!(matches!(
            err,
            FrameError::PayloadTooLarge {
                size: 251,
                max: MAX_PAYLOAD_SIZE
            }
        ));
        assert!(buf.iter().all(|&b| b == 0xEE), "no partial write");
    }

    #[test]
    fn serialize_rejects_short_destination() {
        let mut buf = [0xEEu8; HEADER_SIZE + 1];
        let err = serialize(1, b"ab", &mut buf).unwrap_err();

        assert!(matches!(
            err,
            FrameError::BufferTooSmall {
                needed: 7,
                available: 6
            }
        ));
        assert!(buf.iter().all(|&b| b == 0xEE), "no partial write");
    }

    #[test]
    fn serialize_rejects_empty_destination() {
        let mut empty: [u8; 0] = [];
        let err = serialize(1, &[], &mut empty).unwrap_err();
        assert!(matches!(err, FrameError::BufferTooSmall { .. }));
    }

    #[test]
    fn encode_frame_matches_serialize() {
        let mut fixed = [0u8; MAX_PACKET_SIZE];
        let written = serialize(6, b"move", &mut fixed).unwrap();

        let mut grown = BytesMut::new();
        encode_frame(6, b"move", &mut grown).unwrap();

        assert_eq!(&fixed[..written], grown.as_ref());
    }

    #[test]
    fn encode_frame_appends() {
        let mut buf = BytesMut::new();
        encode_frame(1, b"first", &mut buf).unwrap();
        encode_frame(2, b"", &mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE * 2 + 5);
        assert_eq!(buf[HEADER_SIZE + 5], SOP);
    }

    #[test]
    fn encode_frame_rejects_oversized_payload() {
        let mut buf = BytesMut::new();
        let err = encode_frame(1, &[0u8; 300], &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn packet_new_computes_checksum() {
        let packet = Packet::new(3, b"hello").unwrap();
        assert_eq!(packet.header.sop, SOP);
        assert_eq!(packet.header.length, 5);
        assert_eq!(packet.payload(), b"hello");
        assert!(packet.checksum_matches());
        assert_eq!(packet.wire_size(), HEADER_SIZE + 5);
    }

    #[test]
    fn packet_to_bytes_matches_serialize() {
        let packet = Packet::new(4, b"abc").unwrap();
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let written = serialize(4, b"abc", &mut buf).unwrap();
        assert_eq!(packet.to_bytes().as_ref(), &buf[..written]);
    }

    #[test]
    fn header_to_bytes_is_little_endian() {
        let header = Header {
            sop: SOP,
            packet_type: 7,
            length: 4,
            crc: 0xBEEF,
        };
        assert_eq!(header.to_bytes(), [0xA1, 7, 4, 0xEF, 0xBE]);
    }

    #[test]
    fn packet_debug_shows_only_meaningful_payload() {
        let packet = Packet::new(1, &[0xAB]).unwrap();
        let text = format!("{packet:?}");
        assert!(text.contains("[171]"));
    }
}
