use amcom_frame::Crc;
use serde::Serialize;

use crate::cmd::CrcArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::hex::parse_hex;
use crate::output::OutputFormat;

#[derive(Serialize)]
struct CrcOutput {
    crc: String,
    wire_bytes: [String; 2],
    input_len: usize,
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    let crc = checksum(&bytes);
    let [lo, hi] = crc.to_le_bytes();

    match format {
        OutputFormat::Json => {
            let out = CrcOutput {
                crc: format!("0x{crc:04x}"),
                wire_bytes: [format!("0x{lo:02x}"), format!("0x{hi:02x}")],
                input_len: bytes.len(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("crc=0x{crc:04x} wire=[0x{lo:02x}, 0x{hi:02x}] bytes={}", bytes.len());
        }
        OutputFormat::Raw => println!("{crc:04x}"),
    }
    Ok(SUCCESS)
}

/// Fold `bytes` in order from the frame seed. For a frame, pass type,
/// length and payload.
fn checksum(bytes: &[u8]) -> u16 {
    let mut crc = Crc::new();
    crc.update_slice(bytes);
    crc.value()
}
