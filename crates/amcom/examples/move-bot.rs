//! Minimal game client: connects to a game server, answers every request
//! and steers towards the nearest food.
//!
//! Run with: cargo run --example move-bot -- 127.0.0.1:2001

use std::f32::consts::TAU;
use std::io::Read;
use std::net::TcpStream;

use amcom::frame::{Packet, PacketWriter, Receiver};
use amcom::packets::{
    object_type, Dispatcher, GameOverResponse, IdentifyResponse, MoveResponse, NewGameResponse,
    ObjectState, Payload, PayloadHandler, WirePayload,
};
use tracing::{info, warn};

const DEFAULT_SERVER: &str = "127.0.0.1:2001";

#[derive(Default)]
struct Bot {
    player_number: u8,
    map: (f32, f32),
    me: Option<(f32, f32)>,
    food: Vec<ObjectState>,
    outbox: Vec<Packet>,
}

impl Bot {
    fn reply<P: WirePayload>(&mut self, payload: P) {
        match payload.to_packet() {
            Ok(packet) => self.outbox.push(packet),
            Err(err) => warn!(error = %err, "failed to build response"),
        }
    }

    fn track(&mut self, objects: &[ObjectState]) {
        for obj in objects {
            match obj.object_type {
                object_type::PLAYER if obj.object_no == u16::from(self.player_number) => {
                    self.me = Some((obj.x, obj.y));
                }
                object_type::FOOD => {
                    self.food.retain(|f| f.object_no != obj.object_no);
                    if obj.hp > 0 {
                        self.food.push(*obj);
                    }
                }
                _ => {}
            }
        }
    }

    fn heading(&self) -> f32 {
        let Some((x, y)) = self.me else {
            return 0.0;
        };
        let target = self
            .food
            .iter()
            .map(|f| (f.x, f.y))
            .min_by(|a, b| dist2(*a, (x, y)).total_cmp(&dist2(*b, (x, y))))
            .unwrap_or((self.map.0 / 2.0, self.map.1 / 2.0));
        (target.1 - y).atan2(target.0 - x).rem_euclid(TAU)
    }
}

fn dist2(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

impl PayloadHandler for Bot {
    fn on_payload(&mut self, payload: Payload) {
        match payload {
            Payload::IdentifyRequest(req) => {
                info!(
                    version = %format!("{}.{}.{}", req.game_ver_hi, req.game_ver_lo, req.game_revision),
                    "identify requested"
                );
                self.reply(IdentifyResponse {
                    player_name: "move-bot".into(),
                });
            }
            Payload::NewGameRequest(req) => {
                info!(
                    player = req.player_number,
                    players = req.number_of_players,
                    width = req.map_width,
                    height = req.map_height,
                    "new game"
                );
                *self = Bot {
                    player_number: req.player_number,
                    map: (req.map_width, req.map_height),
                    outbox: std::mem::take(&mut self.outbox),
                    ..Bot::default()
                };
                self.reply(NewGameResponse {
                    hello_message: "good luck".into(),
                });
            }
            Payload::ObjectUpdateRequest(req) => self.track(&req.objects),
            Payload::MoveRequest(_) => {
                let angle = self.heading();
                self.reply(MoveResponse { angle });
            }
            Payload::GameOverRequest(req) => {
                for p in &req.players {
                    info!(player = p.object_no, hp = p.hp, "final score");
                }
                self.reply(GameOverResponse {
                    end_message: "gg".into(),
                });
            }
            other => warn!(packet_type = %other.packet_type(), "unexpected packet"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let mut stream = TcpStream::connect(&addr)?;
    info!(%addr, "connected");

    let mut writer = PacketWriter::new(stream.try_clone()?);
    let mut receiver = Receiver::new(Dispatcher::new(Bot::default()));
    let mut buf = [0u8; 512];

    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            info!("server closed the connection");
            break;
        }
        receiver.feed(&buf[..n]);

        let outbox = std::mem::take(&mut receiver.sink_mut().handler_mut().outbox);
        for packet in &outbox {
            writer.write_packet(packet)?;
        }
    }

    let stats = receiver.stats();
    info!(
        packets = stats.packets,
        checksum_failures = stats.checksum_failures,
        "session finished"
    );
    Ok(())
}
