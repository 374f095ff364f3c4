use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

use amcom_frame::{FrameConfig, FrameError, Packet, PacketReader};
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::hex::parse_hex;
use crate::output::{print_packet, stats_json, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = open_input(args.input.as_deref(), args.hex)?;
    let config = FrameConfig {
        read_chunk_size: args.chunk_size,
    };
    let mut reader = PacketReader::with_config(input, config);

    let delivered = decode_stream(&mut reader, args.count, |index, packet| {
        print_packet(index, packet, format)
    })?;

    let stats = reader.stats();
    info!(
        delivered,
        checksum_failures = stats.checksum_failures,
        length_rejects = stats.length_rejects,
        skipped_bytes = stats.skipped_bytes,
        stats = %stats_json(&stats),
        "decode finished"
    );
    Ok(SUCCESS)
}

/// Drain `reader`, calling `emit` for each packet until EOF or `limit`.
fn decode_stream<R, F>(
    reader: &mut PacketReader<R>,
    limit: Option<usize>,
    mut emit: F,
) -> CliResult<usize>
where
    R: Read,
    F: FnMut(usize, &Packet),
{
    let mut delivered = 0usize;
    while limit.map_or(true, |limit| delivered < limit) {
        match reader.read_packet() {
            Ok(packet) => {
                emit(delivered, &packet);
                delivered += 1;
            }
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("read failed", err)),
        }
    }
    Ok(delivered)
}

fn open_input(path: Option<&Path>, hex: bool) -> CliResult<Box<dyn Read>> {
    let mut raw: Box<dyn Read> = match path {
        None => Box::new(io::stdin().lock()),
        Some(p) if p == Path::new("-") => Box::new(io::stdin().lock()),
        Some(p) => Box::new(
            File::open(p).map_err(|err| io_error(&format!("failed opening {}", p.display()), err))?,
        ),
    };

    if !hex {
        return Ok(raw);
    }

    let mut text = String::new();
    raw.read_to_string(&mut text)
        .map_err(|err| io_error("failed reading hex input", err))?;
    Ok(Box::new(Cursor::new(parse_hex(&text)?)))
}
