//! CRC-checked packet framing and the amcom game packet catalogue.
//!
//! # Crate Structure
//!
//! - [`frame`]: Checksum, serializer and the incremental receiver
//! - [`packets`]: Packet type IDs and typed payload layouts

/// Re-export frame types.
pub mod frame {
    pub use amcom_frame::*;
}

/// Re-export packet catalogue types.
pub mod packets {
    pub use amcom_packets::*;
}
