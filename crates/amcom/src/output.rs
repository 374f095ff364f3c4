use std::io::{IsTerminal, Write};

use amcom_frame::{Packet, ParserStats};
use amcom_packets::{type_name, Payload};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;


#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    index: usize,
    packet_type: u8,
    type_name: &'a str,
    length: u8,
    crc: String,
    payload_hex: String,
    decoded: Option<Payload>,
}

pub fn print_packet(index: usize, packet: &Packet, format: OutputFormat) {
    let decoded = Payload::from_packet(packet).ok();
    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                index,
                packet_type: packet.packet_type(),
                type_name: type_name(packet.packet_type()),
                length: packet.header.length,
                crc: format!("0x{:04x}", packet.header.crc),
                payload_hex: hex::encode(packet.payload()),
                decoded,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TYPE", "NAME", "LEN", "CRC", "PAYLOAD"])
                .add_row(vec![
                    index.to_string(),
                    packet.packet_type().to_string(),
                    type_name(packet.packet_type()).to_string(),
                    packet.header.length.to_string(),
                    format!("0x{:04x}", packet.header.crc),
                    payload_preview(packet.payload(), decoded.as_ref()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "#{} type={} ({}) len={} crc=0x{:04x} payload={}",
                index,
                packet.packet_type(),
                type_name(packet.packet_type()),
                packet.header.length,
                packet.header.crc,
                payload_preview(packet.payload(), decoded.as_ref())
            );
        }
        OutputFormat::Raw => {
            print_raw(packet.payload());
        }
    }
}

#[derive(Serialize)]
struct StatsOutput {
    packets: u64,
    checksum_failures: u64,
    length_rejects: u64,
    skipped_bytes: u64,
}

pub fn stats_json(stats: &ParserStats) -> String {
    let out = StatsOutput {
        packets: stats.packets,
        checksum_failures: stats.checksum_failures,
        length_rejects: stats.length_rejects,
        skipped_bytes: stats.skipped_bytes,
    };
    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8], decoded: Option<&Payload>) -> String {
    if let Some(decoded) = decoded {
        if let Ok(json) = serde_json::to_string(decoded) {
            return json;
        }
    }
    if payload.is_empty() {
        return "<empty>".to_string();
    }
    hex::encode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amcom_packets::{MoveRequest, WirePayload};

    #[test]
    fn preview_prefers_decoded_payload() {
        let packet = MoveRequest { game_time: 5 }.to_packet().unwrap();
        let decoded = Payload::from_packet(&packet).ok();
        let preview = payload_preview(packet.payload(), decoded.as_ref());
        assert!(preview.contains("\"game_time\":5"));
    }

    #[test]
    fn preview_falls_back_to_hex() {
        assert_eq!(payload_preview(&[0xDE, 0xAD], None), "dead");
        assert_eq!(payload_preview(&[], None), "<empty>");
    }

    #[test]
    fn stats_render_as_json() {
        let stats = ParserStats {
            packets: 2,
            checksum_failures: 1,
            ..ParserStats::default()
        };
        let json: serde_json::Value = serde_json::from_str(&stats_json(&stats)).unwrap();
        assert_eq!(json["packets"], 2);
        assert_eq!(json["checksum_failures"], 1);
    }
}
