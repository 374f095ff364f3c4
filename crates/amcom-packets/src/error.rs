use amcom_frame::FrameError;

use crate::packet_type::PacketType;

/// Errors from encoding or decoding typed payloads.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The type byte is not part of the catalogue.
    #[error("unknown packet type {0}")]
    UnknownType(u8),

    /// A fixed-size payload arrived with the wrong length.
    #[error("{packet_type} payload must be {expected} bytes, got {actual}")]
    WrongLength {
        packet_type: PacketType,
        expected: usize,
        actual: usize,
    },

    /// An object-list payload is not a whole number of entries.
    #[error("{packet_type} payload of {actual} bytes is not a multiple of {item} bytes")]
    Misaligned {
        packet_type: PacketType,
        item: usize,
        actual: usize,
    },

    /// An object-list payload holds more entries than the packet allows.
    #[error("{packet_type} carries {count} objects, max {max}")]
    TooManyObjects {
        packet_type: PacketType,
        count: usize,
        max: usize,
    },

    /// A text field does not fit with its terminating NUL.
    #[error("text of {len} bytes exceeds {max} byte limit")]
    TextTooLong { len: usize, max: usize },

    /// Building the frame failed.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub type Result<T> = std::result::Result<T, PacketError>;
