//! `tokio-util` codec for use with `FramedRead`/`FramedWrite`.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_frame, Packet};
use crate::error::{FrameError, Result};
use crate::parser::{ParseState, Parser, ParserStats};

/// Frame codec backed by the byte-at-a-time [`Parser`].
///
/// Bytes are consumed from the read buffer as they are parsed, so a partial
/// frame lives in the parser rather than in the buffer.
#[derive(Debug, Default)]
pub struct AmcomCodec {
    parser: Parser,
}

impl AmcomCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }
}

impl Decoder for AmcomCodec {
    type Item = Packet;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let mut consumed = 0usize;
        let mut found = None;
        for &byte in src.iter() {
            consumed += 1;
            if let Some(packet) = self.parser.push(byte) {
                found = Some(packet);
                break;
            }
        }
        src.advance(consumed);
        Ok(found)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        match self.decode(src)? {
            Some(packet) => Ok(Some(packet)),
            None => {
                if self.parser.state() != ParseState::Empty {
                    tracing::debug!(state = ?self.parser.state(), "stream ended mid-frame");
                    self.parser.reset();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<Packet> for AmcomCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<()> {
        encode_frame(item.packet_type(), item.payload(), dst)
    }
}

impl Encoder<(u8, Bytes)> for AmcomCodec {
    type Error = FrameError;

    fn encode(&mut self, (packet_type, payload): (u8, Bytes), dst: &mut BytesMut) -> Result<()> {
        encode_frame(packet_type, &payload, dst)
    }
}
