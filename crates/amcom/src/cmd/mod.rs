use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod crc;
pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build one frame from a packet type and payload.
    Encode(EncodeArgs),
    /// Parse frames from a byte stream and print each valid packet.
    Decode(DecodeArgs),
    /// Compute the frame checksum of a byte sequence.
    Crc(CrcArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Crc(args) => crc::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// How `encode` writes the frame to stdout.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FrameEncoding {
    #[default]
    Hex,
    Raw,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Packet type ID (0-255).
    #[arg(long = "type", short = 't', required_unless_present = "json")]
    pub packet_type: Option<u8>,
    /// Payload as hex bytes.
    #[arg(long, conflicts_with_all = ["data", "file", "json"])]
    pub hex: Option<String>,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file", "json"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["hex", "data", "json"])]
    pub file: Option<PathBuf>,
    /// Typed payload as JSON, e.g. {"type":"move_response","payload":{"angle":1.5}}.
    #[arg(long, conflicts_with_all = ["hex", "data", "file", "packet_type"])]
    pub json: Option<String>,
    /// Frame output encoding.
    #[arg(long, value_enum, default_value_t = FrameEncoding::Hex)]
    pub output: FrameEncoding,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input file; stdin when omitted or `-`.
    pub input: Option<PathBuf>,
    /// Treat the input as hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Bytes fed to the receiver per read.
    #[arg(long, default_value = "256", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub chunk_size: usize,
    /// Stop after N packets.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Bytes to fold, as hex.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
