//! Typed payloads with their packed little-endian layouts.

use amcom_frame::Packet;
use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{PacketError, Result};
use crate::packet_type::PacketType;

/// Player name field size, including the terminating NUL.
pub const MAX_PLAYER_NAME_LEN: usize = 24;
/// Message field size, including the terminating NUL.
pub const MAX_PLAYER_MESSAGE_LEN: usize = 127;
/// Maximum player entries in a GAME_OVER.request.
pub const MAX_PLAYER_UPDATES: usize = 8;
/// Maximum object entries in an OBJECT_UPDATE.request.
pub const MAX_OBJECT_UPDATES: usize = 16;

/// Object kinds carried in [`ObjectState::object_type`].
pub mod object_type {
    pub const PLAYER: u8 = 0;
    pub const FOOD: u8 = 1;
    pub const SPARK: u8 = 2;
    pub const GLUE: u8 = 3;
}

/// A payload with a fixed packet type and wire layout.
pub trait WirePayload: Sized {
    const PACKET_TYPE: PacketType;

    /// Append the packed representation to `dst`.
    fn encode(&self, dst: &mut BytesMut) -> Result<()>;

    /// Parse the packed representation. `src` is exactly the frame payload.
    fn decode(src: &[u8]) -> Result<Self>;

    /// Build a complete frame carrying this payload.
    fn to_packet(&self) -> Result<Packet> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(Packet::new(Self::PACKET_TYPE.id(), &buf)?)
    }
}

fn expect_len(packet_type: PacketType, src: &[u8], expected: usize) -> Result<()> {
    if src.len() != expected {
        return Err(PacketError::WrongLength {
            packet_type,
            expected,
            actual: src.len(),
        });
    }
    Ok(())
}

fn put_text(dst: &mut BytesMut, text: &str, field_len: usize) -> Result<()> {
    let bytes = text.as_bytes();
    if bytes.len() >= field_len {
        return Err(PacketError::TextTooLong {
            len: bytes.len(),
            max: field_len - 1,
        });
    }
    dst.put_slice(bytes);
    dst.put_bytes(0, field_len - bytes.len());
    Ok(())
}

fn get_text(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyRequest {
    pub game_ver_hi: u8,
    pub game_ver_lo: u8,
    pub game_revision: u16,
}

impl IdentifyRequest {
    pub const SIZE: usize = 4;
}

impl WirePayload for IdentifyRequest {
    const PACKET_TYPE: PacketType = PacketType::IdentifyRequest;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u8(self.game_ver_hi);
        dst.put_u8(self.game_ver_lo);
        dst.put_u16_le(self.game_revision);
        Ok(())
    }

    fn decode(mut src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, Self::SIZE)?;
        Ok(Self {
            game_ver_hi: src.get_u8(),
            game_ver_lo: src.get_u8(),
            game_revision: src.get_u16_le(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub player_name: String,
}

impl WirePayload for IdentifyResponse {
    const PACKET_TYPE: PacketType = PacketType::IdentifyResponse;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_text(dst, &self.player_name, MAX_PLAYER_NAME_LEN)
    }

    fn decode(src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, MAX_PLAYER_NAME_LEN)?;
        Ok(Self {
            player_name: get_text(src),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub player_number: u8,
    pub number_of_players: u8,
    pub map_width: f32,
    pub map_height: f32,
}

impl NewGameRequest {
    pub const SIZE: usize = 10;
}

impl WirePayload for NewGameRequest {
    const PACKET_TYPE: PacketType = PacketType::NewGameRequest;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u8(self.player_number);
        dst.put_u8(self.number_of_players);
        dst.put_f32_le(self.map_width);
        dst.put_f32_le(self.map_height);
        Ok(())
    }

    fn decode(mut src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, Self::SIZE)?;
        Ok(Self {
            player_number: src.get_u8(),
            number_of_players: src.get_u8(),
            map_width: src.get_f32_le(),
            map_height: src.get_f32_le(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    pub hello_message: String,
}

impl WirePayload for NewGameResponse {
    const PACKET_TYPE: PacketType = PacketType::NewGameResponse;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_text(dst, &self.hello_message, MAX_PLAYER_MESSAGE_LEN)
    }

    fn decode(src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, MAX_PLAYER_MESSAGE_LEN)?;
        Ok(Self {
            hello_message: get_text(src),
        })
    }
}

/// State of one game object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// One of the [`object_type`] constants.
    pub object_type: u8,
    /// Numbered separately per object type.
    pub object_no: u16,
    pub hp: i8,
    pub x: f32,
    pub y: f32,
}

impl ObjectState {
    pub const SIZE: usize = 12;

    fn put(&self, dst: &mut BytesMut) {
        dst.put_u8(self.object_type);
        dst.put_u16_le(self.object_no);
        dst.put_i8(self.hp);
        dst.put_f32_le(self.x);
        dst.put_f32_le(self.y);
    }

    fn get(src: &mut &[u8]) -> Self {
        Self {
            object_type: src.get_u8(),
            object_no: src.get_u16_le(),
            hp: src.get_i8(),
            x: src.get_f32_le(),
            y: src.get_f32_le(),
        }
    }
}

fn put_objects(
    packet_type: PacketType,
    dst: &mut BytesMut,
    objects: &[ObjectState],
    max: usize,
) -> Result<()> {
    if objects.len() > max {
        return Err(PacketError::TooManyObjects {
            packet_type,
            count: objects.len(),
            max,
        });
    }
    dst.reserve(objects.len() * ObjectState::SIZE);
    for object in objects {
        object.put(dst);
    }
    Ok(())
}

fn get_objects(packet_type: PacketType, mut src: &[u8], max: usize) -> Result<Vec<ObjectState>> {
    if src.len() % ObjectState::SIZE != 0 {
        return Err(PacketError::Misaligned {
            packet_type,
            item: ObjectState::SIZE,
            actual: src.len(),
        });
    }
    let count = src.len() / ObjectState::SIZE;
    if count > max {
        return Err(PacketError::TooManyObjects {
            packet_type,
            count,
            max,
        });
    }
    let mut objects = Vec::with_capacity(count);
    while src.has_remaining() {
        objects.push(ObjectState::get(&mut src));
    }
    Ok(objects)
}

/// Object states; the entry count follows from the frame length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectUpdateRequest {
    pub objects: Vec<ObjectState>,
}

impl WirePayload for ObjectUpdateRequest {
    const PACKET_TYPE: PacketType = PacketType::ObjectUpdateRequest;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_objects(Self::PACKET_TYPE, dst, &self.objects, MAX_OBJECT_UPDATES)
    }

    fn decode(src: &[u8]) -> Result<Self> {
        Ok(Self {
            objects: get_objects(Self::PACKET_TYPE, src, MAX_OBJECT_UPDATES)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub game_time: u32,
}

impl WirePayload for MoveRequest {
    const PACKET_TYPE: PacketType = PacketType::MoveRequest;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_u32_le(self.game_time);
        Ok(())
    }

    fn decode(mut src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, 4)?;
        Ok(Self {
            game_time: src.get_u32_le(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Heading in radians.
    pub angle: f32,
}

impl WirePayload for MoveResponse {
    const PACKET_TYPE: PacketType = PacketType::MoveResponse;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        dst.put_f32_le(self.angle);
        Ok(())
    }

    fn decode(mut src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, 4)?;
        Ok(Self {
            angle: src.get_f32_le(),
        })
    }
}

/// Final player states; the entry count follows from the frame length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameOverRequest {
    pub players: Vec<ObjectState>,
}

impl WirePayload for GameOverRequest {
    const PACKET_TYPE: PacketType = PacketType::GameOverRequest;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_objects(Self::PACKET_TYPE, dst, &self.players, MAX_PLAYER_UPDATES)
    }

    fn decode(src: &[u8]) -> Result<Self> {
        Ok(Self {
            players: get_objects(Self::PACKET_TYPE, src, MAX_PLAYER_UPDATES)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverResponse {
    pub end_message: String,
}

impl WirePayload for GameOverResponse {
    const PACKET_TYPE: PacketType = PacketType::GameOverResponse;

    fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        put_text(dst, &self.end_message, MAX_PLAYER_MESSAGE_LEN)
    }

    fn decode(src: &[u8]) -> Result<Self> {
        expect_len(Self::PACKET_TYPE, src, MAX_PLAYER_MESSAGE_LEN)?;
        Ok(Self {
            end_message: get_text(src),
        })
    }
}

/// Any catalogued payload, tagged by its packet type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Payload {
    NoPacket,
    IdentifyRequest(IdentifyRequest),
    IdentifyResponse(IdentifyResponse),
    NewGameRequest(NewGameRequest),
    NewGameResponse(NewGameResponse),
    ObjectUpdateRequest(ObjectUpdateRequest),
    MoveRequest(MoveRequest),
    MoveResponse(MoveResponse),
    GameOverRequest(GameOverRequest),
    GameOverResponse(GameOverResponse),
}

impl Payload {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Payload::NoPacket => PacketType::NoPacket,
            Payload::IdentifyRequest(_) => PacketType::IdentifyRequest,
            Payload::IdentifyResponse(_) => PacketType::IdentifyResponse,
            Payload::NewGameRequest(_) => PacketType::NewGameRequest,
            Payload::NewGameResponse(_) => PacketType::NewGameResponse,
            Payload::ObjectUpdateRequest(_) => PacketType::ObjectUpdateRequest,
            Payload::MoveRequest(_) => PacketType::MoveRequest,
            Payload::MoveResponse(_) => PacketType::MoveResponse,
            Payload::GameOverRequest(_) => PacketType::GameOverRequest,
            Payload::GameOverResponse(_) => PacketType::GameOverResponse,
        }
    }

    /// Decode the payload bytes of a frame with the given type byte.
    pub fn decode(packet_type: u8, src: &[u8]) -> Result<Self> {
        Ok(match PacketType::try_from(packet_type)? {
            PacketType::NoPacket => {
                expect_len(PacketType::NoPacket, src, 0)?;
                Payload::NoPacket
            }
            PacketType::IdentifyRequest => Payload::IdentifyRequest(WirePayload::decode(src)?),
            PacketType::IdentifyResponse => Payload::IdentifyResponse(WirePayload::decode(src)?),
            PacketType::NewGameRequest => Payload::NewGameRequest(WirePayload::decode(src)?),
            PacketType::NewGameResponse => Payload::NewGameResponse(WirePayload::decode(src)?),
            PacketType::ObjectUpdateRequest => {
                Payload::ObjectUpdateRequest(WirePayload::decode(src)?)
            }
            PacketType::MoveRequest => Payload::MoveRequest(WirePayload::decode(src)?),
            PacketType::MoveResponse => Payload::MoveResponse(WirePayload::decode(src)?),
            PacketType::GameOverRequest => Payload::GameOverRequest(WirePayload::decode(src)?),
            PacketType::GameOverResponse => Payload::GameOverResponse(WirePayload::decode(src)?),
        })
    }

    /// Decode a received frame.
    pub fn from_packet(packet: &Packet) -> Result<Self> {
        Self::decode(packet.packet_type(), packet.payload())
    }

    /// Append the packed payload bytes (no frame header) to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        match self {
            Payload::NoPacket => Ok(()),
            Payload::IdentifyRequest(p) => p.encode(dst),
            Payload::IdentifyResponse(p) => p.encode(dst),
            Payload::NewGameRequest(p) => p.encode(dst),
            Payload::NewGameResponse(p) => p.encode(dst),
            Payload::ObjectUpdateRequest(p) => p.encode(dst),
            Payload::MoveRequest(p) => p.encode(dst),
            Payload::MoveResponse(p) => p.encode(dst),
            Payload::GameOverRequest(p) => p.encode(dst),
            Payload::GameOverResponse(p) => p.encode(dst),
        }
    }

    /// Build a complete frame carrying this payload.
    pub fn to_packet(&self) -> Result<Packet> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(Packet::new(self.packet_type().id(), &buf)?)
    }
}
