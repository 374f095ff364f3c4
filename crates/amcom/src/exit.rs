use std::fmt;
use std::io;

use amcom_frame::FrameError;
use amcom_packets::PacketError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const NOT_FOUND: i32 = 66;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn packet_error(context: &str, err: PacketError) -> CliError {
    match err {
        PacketError::Frame(err) => frame_error(context, err),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_payload_is_data_invalid() {
        let err = frame_error(
            "encode failed",
            FrameError::PayloadTooLarge { size: 300, max: 250 },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("encode failed: "));
    }

    #[test]
    fn io_kinds_map_to_codes() {
        let denied = io_error("read", io::Error::from(io::ErrorKind::PermissionDenied));
        let missing = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(denied.code, PERMISSION_DENIED);
        assert_eq!(missing.code, NOT_FOUND);
    }

    #[test]
    fn packet_errors_unwrap_frame_errors() {
        let err = packet_error(
            "encode failed",
            PacketError::Frame(FrameError::ConnectionClosed),
        );
        assert_eq!(err.code, FAILURE);

        let err = packet_error("encode failed", PacketError::UnknownType(77));
        assert_eq!(err.code, DATA_INVALID);
    }
}
