//! Byte-at-a-time frame parser.
//!
//! The parser owns exactly one in-flight packet buffer and never reports
//! stream errors: frames with an out-of-range length or a checksum mismatch
//! are dropped and the machine waits for the next start marker.

use tracing::{debug, trace};

use crate::codec::{Packet, MAX_PAYLOAD_SIZE, SOP};

/// Parse progress through the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for a start marker.
    #[default]
    Empty,
    GotStart,
    GotType,
    GotLength,
    GotChecksumLo,
    ReceivingPayload,
    /// A frame just completed. Completion is handled inside the same
    /// [`Parser::push`] call, so `state()` never reports this value.
    GotComplete,
}

/// Counters describing what the parser has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Frames that passed the checksum.
    pub packets: u64,
    /// Complete frames dropped for a checksum mismatch.
    pub checksum_failures: u64,
    /// Frames abandoned because the length byte exceeded the maximum.
    pub length_rejects: u64,
    /// Bytes ignored while waiting for a start marker.
    pub skipped_bytes: u64,
}

/// Incremental frame parser.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    state: ParseState,
    payload_counter: usize,
    packet: Packet,
    stats: ParserStats,
}

impl Parser {
    /// A parser in the `Empty` state with a zeroed packet buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one byte. Returns the packet when this byte completes a frame
    /// whose checksum verifies.
    pub fn push(&mut self, byte: u8) -> Option<Packet> {
        let mut complete = false;

        match self.state {
            ParseState::Empty | ParseState::GotComplete => {
                if byte == SOP {
                    self.packet.header.sop = byte;
                    self.state = ParseState::GotStart;
                } else {
                    self.stats.skipped_bytes += 1;
                    self.state = ParseState::Empty;
                }
            }
            ParseState::GotStart => {
                self.packet.header.packet_type = byte;
                self.state = ParseState::GotType;
            }
            ParseState::GotType => {
                if usize::from(byte) <= MAX_PAYLOAD_SIZE {
                    self.packet.header.length = byte;
                    self.payload_counter = 0;
                    self.state = ParseState::GotLength;
                } else {
                    // The offending byte is not re-examined as a start marker.
                    debug!(length = byte, "dropping frame with out-of-range length");
                    self.stats.length_rejects += 1;
                    self.clear();
                }
            }
            ParseState::GotLength => {
                self.packet.header.crc = u16::from(byte);
                self.state = ParseState::GotChecksumLo;
            }
            ParseState::GotChecksumLo => {
                self.packet.header.crc |= u16::from(byte) << 8;
                if self.packet.header.length == 0 {
                    complete = true;
                } else {
                    self.state = ParseState::ReceivingPayload;
                }
            }
            ParseState::ReceivingPayload => {
                self.packet.payload[self.payload_counter] = byte;
                self.payload_counter += 1;
                if self.payload_counter == usize::from(self.packet.header.length) {
                    complete = true;
                }
            }
        }

        if complete {
            return self.finish();
        }
        None
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Abandon any frame in progress. Statistics are kept.
    pub fn reset(&mut self) {
        self.clear();
    }

    fn finish(&mut self) -> Option<Packet> {
        let packet = std::mem::take(&mut self.packet);
        self.clear();

        if packet.checksum_matches() {
            self.stats.packets += 1;
            trace!(
                packet_type = packet.header.packet_type,
                length = packet.header.length,
                "frame complete"
            );
            Some(packet)
        } else {
            self.stats.checksum_failures += 1;
            debug!(
                packet_type = packet.header.packet_type,
                length = packet.header.length,
                received = packet.header.crc,
                "dropping frame with checksum mismatch"
            );
            None
        }
    }

    fn clear(&mut self) {
        self.state = ParseState::Empty;
        self.payload_counter = 0;
        self.packet = Packet::default();
    }
}
