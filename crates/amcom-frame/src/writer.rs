use std::io::{ErrorKind, Write};

use crate::codec::{serialize, Packet, MAX_PACKET_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` stream.
pub struct PacketWriter<T> {
    inner: T,
    buf: [u8; MAX_PACKET_SIZE],
}

impl<T: Write> PacketWriter<T> {
    /// Create a new packet writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: [0u8; MAX_PACKET_SIZE],
        }
    }

    /// Write an already-built packet (blocking).
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        self.send(packet.packet_type(), packet.payload())
    }

    /// Serialize and send a payload with the given packet type.
    pub fn send(&mut self, packet_type: u8, payload: &[u8]) -> Result<()> {
        let len = serialize(packet_type, payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < len {
            match self.inner.write(&self.buf[offset..len]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
