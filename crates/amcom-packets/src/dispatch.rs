//! Bridges the frame receiver to typed payload handling.

use amcom_frame::{Packet, PacketSink};
use tracing::debug;

use crate::error::PacketError;
use crate::payload::Payload;

/// Application logic that works on decoded payloads.
pub trait PayloadHandler {
    fn on_payload(&mut self, payload: Payload);

    /// Called for frames that passed the checksum but do not decode.
    fn on_undecodable(&mut self, packet: &Packet, err: PacketError) {
        debug!(
            packet_type = packet.packet_type(),
            length = packet.header.length,
            error = %err,
            "ignoring undecodable packet"
        );
    }
}

/// A [`PacketSink`] that decodes each packet and hands it to a
/// [`PayloadHandler`].
#[derive(Debug, Default)]
pub struct Dispatcher<H> {
    handler: H,
}

impl<H: PayloadHandler> Dispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}

impl<H: PayloadHandler> PacketSink for Dispatcher<H> {
    fn on_packet(&mut self, packet: &Packet) {
        match Payload::from_packet(packet) {
            Ok(payload) => self.handler.on_payload(payload),
            Err(err) => self.handler.on_undecodable(packet, err),
        }
    }
}
