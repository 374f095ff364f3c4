use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::codec::{FrameConfig, Packet};
use crate::error::{FrameError, Result};
use crate::parser::{Parser, ParserStats};

/// Reads validated packets from any `Read` stream.
///
/// Handles partial reads and corrupted input internally: callers only ever
/// see packets whose checksum verified.
pub struct PacketReader<T> {
    inner: T,
    parser: Parser,
    pending: VecDeque<Packet>,
    chunk: Vec<u8>,
}

impl<T: Read> PacketReader<T> {
    /// Create a new packet reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new packet reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            parser: Parser::new(),
            pending: VecDeque::new(),
            chunk: vec![0u8; config.read_chunk_size.max(1)],
        }
    }

    /// Read the next valid packet (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached. A
    /// frame cut off by EOF is discarded.
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = self.pending.pop_front() {
                return Ok(packet);
            }

            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            for &byte in &self.chunk[..read] {
                if let Some(packet) = self.parser.push(byte) {
                    self.pending.push_back(packet);
                }
            }
        }
    }

    /// Parser counters for everything read so far.
    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for PacketReader<T> {
    type Item = Result<Packet>;

    /// Yields packets until the stream closes; I/O errors are yielded once.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_packet() {
            Ok(packet) => Some(Ok(packet)),
            Err(FrameError::ConnectionClosed) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use bytes::BytesMut;

    use super::*;
    use crate::codec::{encode_frame, MAX_PAYLOAD_SIZE, SOP};

    fn wire(frames: &[(u8, &[u8])]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for (packet_type, payload) in frames {
            encode_frame(*packet_type, payload, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_packet() {
        let mut reader = PacketReader::new(Cursor::new(wire(&[(1, b"hello")])));
        let packet = reader.read_packet().unwrap();

        assert_eq!(packet.packet_type(), 1);
        assert_eq!(packet.payload(), b"hello");
    }

    #[test]
    fn read_multiple_packets_from_one_chunk() {
        let bytes = wire(&[(1, b"one"), (2, b"two"), (3, b"three")]);
        let mut reader = PacketReader::new(Cursor::new(bytes));

        let p1 = reader.read_packet().unwrap();
        let p2 = reader.read_packet().unwrap();
        let p3 = reader.read_packet().unwrap();

        assert_eq!((p1.packet_type(), p1.payload()), (1, b"one".as_ref()));
        assert_eq!((p2.packet_type(), p2.payload()), (2, b"two".as_ref()));
        assert_eq!((p3.packet_type(), p3.payload()), (3, b"three".as_ref()));
        assert!(matches!(
            reader.read_packet(),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn read_max_payload_with_small_chunks() {
        let payload = vec![0xAB; MAX_PAYLOAD_SIZE];
        let cfg = FrameConfig { read_chunk_size: 7 };
        let mut reader =
            PacketReader::with_config(Cursor::new(wire(&[(9, payload.as_slice())])), cfg);

        let packet = reader.read_packet().unwrap();
        assert_eq!(packet.payload(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&[(4, b"slow")]),
            pos: 0,
        };
        let mut reader = PacketReader::new(byte_reader);

        let packet = reader.read_packet().unwrap();
        assert_eq!(packet.packet_type(), 4);
        assert_eq!(packet.payload(), b"slow");
    }

    #[test]
    fn skips_noise_and_corrupt_frames() {
        let mut bytes = vec![0x00, 0x42, 0x99];
        let mut corrupt = wire(&[(5, b"bad")]);
        corrupt[HEADER_CRC_LO] ^= 0xFF;
        bytes.extend(corrupt);
        bytes.extend(wire(&[(5, b"good")]));

        let mut reader = PacketReader::new(Cursor::new(bytes));
        let packet = reader.read_packet().unwrap();

        assert_eq!(packet.payload(), b"good");
        assert_eq!(reader.stats().checksum_failures, 1);
        assert_eq!(reader.stats().skipped_bytes, 3);
    }

    const HEADER_CRC_LO: usize = 3;

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = PacketReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let partial = vec![SOP, 0x02, 0x10, 0x00, 0x00, b'p', b'a'];
        let mut reader = PacketReader::new(Cursor::new(partial));
        let err = reader.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn iterator_stops_at_eof() {
        let bytes = wire(&[(1, b"a"), (2, b"b")]);
        let types: Vec<u8> = PacketReader::new(Cursor::new(bytes))
            .map(|p| p.unwrap().packet_type())
            .collect();
        assert_eq!(types, vec![1, 2]);
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = WouldBlockThenData {
            state: 0,
            bytes: wire(&[(7, b"ok")]),
            pos: 0,
        };
        let mut framed = PacketReader::new(reader);
        let err = framed.read_packet().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            state: 0,
            bytes: wire(&[(8, b"ok")]),
            pos: 0,
        };
        let mut framed = PacketReader::new(reader);
        let packet = framed.read_packet().unwrap();

        assert_eq!(packet.packet_type(), 8);
        assert_eq!(packet.payload(), b"ok");
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = PacketReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[test]
    #[cfg(unix)]
    fn concurrent_reader_writer_threads() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::PacketWriter::new(left);
        let reader = Arc::new(Mutex::new(PacketReader::new(right)));

        let reader_thread = {
            let reader = Arc::clone(&reader);
            std::thread::spawn(move || {
                for expected in 0..64u8 {
                    let packet = reader.lock().unwrap().read_packet().unwrap();
                    assert_eq!(packet.packet_type(), expected % 5);
                    assert_eq!(packet.payload(), format!("msg-{expected}").as_bytes());
                }
            })
        };

        for i in 0..64u8 {
            writer.send(i % 5, format!("msg-{i}").as_bytes()).unwrap();
        }

        reader_thread.join().unwrap();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct WouldBlockThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for WouldBlockThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            copy_remaining(&self.bytes, &mut self.pos, buf)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            copy_remaining(&self.bytes, &mut self.pos, buf)
        }
    }

    fn copy_remaining(bytes: &[u8], pos: &mut usize, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = (bytes.len() - *pos).min(buf.len());
        buf[..n].copy_from_slice(&bytes[*pos..*pos + n]);
        *pos += n;
        Ok(n)
    }
}
