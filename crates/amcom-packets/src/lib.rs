//! Packet catalogue for the amcom game protocol.
//!
//! Frame validation lives in `amcom-frame`; this crate gives the validated
//! payload bytes their meaning. All multi-byte fields are little-endian and
//! structures are packed.

pub mod dispatch;
pub mod error;
pub mod packet_type;
pub mod payload;

pub use dispatch::{Dispatcher, PayloadHandler};
pub use error::{PacketError, Result};
pub use packet_type::{type_name, PacketType};
pub use payload::{
    object_type, GameOverRequest, GameOverResponse, IdentifyRequest, IdentifyResponse,
    MoveRequest, MoveResponse, NewGameRequest, NewGameResponse, ObjectState, ObjectUpdateRequest,
    Payload, WirePayload, MAX_OBJECT_UPDATES, MAX_PLAYER_MESSAGE_LEN, MAX_PLAYER_NAME_LEN,
    MAX_PLAYER_UPDATES,
};
