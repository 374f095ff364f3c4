//! CRC-checked packet framing for byte streams.
//!
//! Every packet is framed with:
//! - A 1-byte start marker (0xA1) for stream synchronization
//! - A 1-byte application-defined packet type
//! - A 1-byte payload length (at most 250)
//! - A 2-byte little-endian CRC-16 over type, length and payload
//!
//! The [`Receiver`] accepts bytes in chunks of any size, drops anything that
//! fails validation, and hands each verified packet to a [`PacketSink`].

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod crc;
pub mod error;
pub mod parser;
pub mod reader;
pub mod receiver;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::AmcomCodec;
pub use codec::{
    encode_frame, serialize, FrameConfig, Header, Packet, HEADER_SIZE, MAX_PACKET_SIZE,
    MAX_PAYLOAD_SIZE, SOP,
};
pub use crc::{frame_checksum, update_crc, Crc, INITIAL_CRC};
pub use error::{FrameError, Result};
pub use parser::{ParseState, Parser, ParserStats};
pub use reader::PacketReader;
pub use receiver::{PacketSink, Receiver};
pub use writer::PacketWriter;
