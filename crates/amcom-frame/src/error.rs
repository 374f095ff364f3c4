/// Errors that can occur while serializing frames or moving them over a stream.
///
/// Malformed input on the receiving side is never an error: the receiver
/// drops it and resynchronizes on the next start marker.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit in the one-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The destination buffer cannot hold the whole frame.
    #[error("destination buffer too small ({available} bytes, need {needed})")]
    BufferTooSmall { needed: usize, available: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before another valid frame was received.
    #[error("connection closed (no further frames)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
