//! Per-connection receiver that hands validated packets to a sink.

use crate::codec::Packet;
use crate::parser::{ParseState, Parser, ParserStats};

/// Consumer of validated packets.
///
/// The sink is the receiver's only observable side effect. It runs
/// synchronously inside [`Receiver::feed`], so long-running work should be
/// handed off elsewhere. The packet reference does not outlive the call.
pub trait PacketSink {
    fn on_packet(&mut self, packet: &Packet);
}

impl<F> PacketSink for F
where
    F: FnMut(&Packet),
{
    fn on_packet(&mut self, packet: &Packet) {
        self(packet)
    }
}

/// Collects copies of every packet.
impl PacketSink for Vec<Packet> {
    fn on_packet(&mut self, packet: &Packet) {
        self.push(packet.clone());
    }
}

/// Incremental receiver: feed it byte chunks of any size and boundary.
///
/// One receiver lives for the duration of a connection. The sink owns
/// whatever application state handling a packet needs.
pub struct Receiver<S> {
    parser: Parser,
    sink: S,
}

impl<S: PacketSink> Receiver<S> {
    /// Create a receiver in the empty state.
    pub fn new(sink: S) -> Self {
        Self {
            parser: Parser::new(),
            sink,
        }
    }

    /// Feed a chunk of bytes. The sink is called once per valid frame
    /// completed within the chunk; an empty chunk does nothing.
    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            if let Some(packet) = self.parser.push(byte) {
                self.sink.on_packet(&packet);
            }
        }
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.parser.state()
    }

    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Abandon any frame in progress.
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the receiver and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
