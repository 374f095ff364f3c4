//! Packet type IDs.
//!
//! Requests flow from the game server to the player, responses back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PacketError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PacketType {
    NoPacket = 0,
    IdentifyRequest = 1,
    IdentifyResponse = 2,
    NewGameRequest = 3,
    NewGameResponse = 4,
    ObjectUpdateRequest = 5,
    MoveRequest = 6,
    MoveResponse = 7,
    GameOverRequest = 8,
    GameOverResponse = 9,
}

impl PacketType {
    /// Every catalogued type, in ID order.
    pub const ALL: [PacketType; 10] = [
        PacketType::NoPacket,
        PacketType::IdentifyRequest,
        PacketType::IdentifyResponse,
        PacketType::NewGameRequest,
        PacketType::NewGameResponse,
        PacketType::ObjectUpdateRequest,
        PacketType::MoveRequest,
        PacketType::MoveResponse,
        PacketType::GameOverRequest,
        PacketType::GameOverResponse,
    ];

    /// Wire ID.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Human-readable name, e.g. `MOVE.request`.
    pub fn name(self) -> &'static str {
        match self {
            PacketType::NoPacket => "NO_PACKET",
            PacketType::IdentifyRequest => "IDENTIFY.request",
            PacketType::IdentifyResponse => "IDENTIFY.response",
            PacketType::NewGameRequest => "NEW_GAME.request",
            PacketType::NewGameResponse => "NEW_GAME.response",
            PacketType::ObjectUpdateRequest => "OBJECT_UPDATE.request",
            PacketType::MoveRequest => "MOVE.request",
            PacketType::MoveResponse => "MOVE.response",
            PacketType::GameOverRequest => "GAME_OVER.request",
            PacketType::GameOverResponse => "GAME_OVER.response",
        }
    }

    /// The response type that answers this request, if any.
    pub fn response(self) -> Option<PacketType> {
        match self {
            PacketType::IdentifyRequest => Some(PacketType::IdentifyResponse),
            PacketType::NewGameRequest => Some(PacketType::NewGameResponse),
            PacketType::MoveRequest => Some(PacketType::MoveResponse),
            PacketType::GameOverRequest => Some(PacketType::GameOverResponse),
            _ => None,
        }
    }
}

impl TryFrom<u8> for PacketType {
    type Error = PacketError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        PacketType::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(PacketError::UnknownType(id))
    }
}

impl From<PacketType> for u8 {
    fn from(packet_type: PacketType) -> Self {
        packet_type.id()
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns a human-readable name for a raw type byte.
pub fn type_name(id: u8) -> &'static str {
    PacketType::try_from(id)
        .map(PacketType::name)
        .unwrap_or("UNKNOWN")
}
