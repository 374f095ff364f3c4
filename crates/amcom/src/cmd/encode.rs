use std::fs;

use amcom_frame::{serialize, MAX_PACKET_SIZE};
use amcom_packets::{type_name, Payload};
use tracing::debug;

use crate::cmd::{EncodeArgs, FrameEncoding};
use crate::exit::{frame_error, io_error, packet_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hex::parse_hex;
use crate::output::print_raw;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let (packet_type, payload) = resolve_payload(&args)?;
    let frame = frame_bytes(packet_type, &payload)?;

    debug!(
        packet_type,
        name = type_name(packet_type),
        length = payload.len(),
        "encoded frame"
    );

    match args.output {
        FrameEncoding::Hex => println!("{}", hex::encode(&frame)),
        FrameEncoding::Raw => print_raw(&frame),
    }
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<(u8, Vec<u8>)> {
    if let Some(json) = &args.json {
        let payload: Payload = serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not a valid payload: {err}")))?;
        let packet = payload
            .to_packet()
            .map_err(|err| packet_error("encode failed", err))?;
        return Ok((packet.packet_type(), packet.payload().to_vec()));
    }

    let packet_type = args
        .packet_type
        .ok_or_else(|| CliError::new(USAGE, "--type is required without --json"))?;

    let payload = if let Some(hex) = &args.hex {
        parse_hex(hex)?
    } else if let Some(data) = &args.data {
        data.as_bytes().to_vec()
    } else if let Some(path) = &args.file {
        fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?
    } else {
        Vec::new()
    };
    Ok((packet_type, payload))
}

fn frame_bytes(packet_type: u8, payload: &[u8]) -> CliResult<Vec<u8>> {
    let mut buf = [0u8; MAX_PACKET_SIZE];
    let written = serialize(packet_type, payload, &mut buf)
        .map_err(|err| frame_error("encode failed", err))?;
    Ok(buf[..written].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::DATA_INVALID;

    fn args() -> EncodeArgs {
        EncodeArgs {
            packet_type: Some(1),
            hex: None,
            data: None,
            file: None,
            json: None,
            output: FrameEncoding::Hex,
        }
    }

    #[test]
    fn empty_payload_frame() {
        let (packet_type, payload) = resolve_payload(&args()).unwrap();
        let frame = frame_bytes(packet_type, &payload).unwrap();
        assert_eq!(hex::encode(&frame), "a1010060e9");
    }

    #[test]
    fn hex_payload() {
        let (_, payload) = resolve_payload(&EncodeArgs {
            hex: Some("01 02 03".into()),
            ..args()
        })
        .unwrap();
        assert_eq!(payload, vec![1, 2, 3]);
    }

    #[test]
    fn json_payload_sets_type() {
        let (packet_type, payload) = resolve_payload(&EncodeArgs {
            packet_type: None,
            json: Some(r#"{"type":"move_request","payload":{"game_time":258}}"#.into()),
            ..args()
        })
        .unwrap();
        assert_eq!(packet_type, 6);
        assert_eq!(payload, vec![2, 1, 0, 0]);
    }

    #[test]
    fn invalid_json_is_usage_error() {
        let err = resolve_payload(&EncodeArgs {
            json: Some("{\"type\":\"nope\"}".into()),
            ..args()
        })
        .unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn oversized_payload_is_data_invalid() {
        let err = frame_bytes(1, &[0u8; 251]).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
