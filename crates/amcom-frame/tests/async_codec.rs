#![cfg(feature = "async")]

use amcom_frame::{AmcomCodec, Packet};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{FramedRead, FramedWrite};

#[tokio::test]
async fn framed_roundtrip_over_duplex() {
    let (client, server) = tokio::io::duplex(64);
    let mut writer = FramedWrite::new(client, AmcomCodec::new());
    let mut reader = FramedRead::new(server, AmcomCodec::new());

    let send = tokio::spawn(async move {
        writer
            .send((1u8, Bytes::from_static(b"identify")))
            .await
            .unwrap();
        writer
            .send(Packet::new(6, &42u32.to_le_bytes()).unwrap())
            .await
            .unwrap();
    });

    let first = reader.next().await.unwrap().unwrap();
    let second = reader.next().await.unwrap().unwrap();
    send.await.unwrap();

    assert_eq!(first.packet_type(), 1);
    assert_eq!(first.payload(), b"identify");
    assert_eq!(second.packet_type(), 6);
    assert_eq!(second.payload(), &42u32.to_le_bytes());
    assert!(reader.next().await.is_none());
}

#[tokio::test]
async fn framed_read_skips_corruption() {
    let (mut client, server) = tokio::io::duplex(256);
    let mut reader = FramedRead::new(server, AmcomCodec::new());

    let mut bad = Packet::new(2, b"bad").unwrap().to_bytes().to_vec();
    bad[5] ^= 0x40;
    let good = Packet::new(2, b"good").unwrap().to_bytes();

    client.write_all(&[0x00, 0x13, 0x37]).await.unwrap();
    client.write_all(&bad).await.unwrap();
    client.write_all(&good).await.unwrap();
    drop(client);

    let packet = reader.next().await.unwrap().unwrap();
    assert_eq!(packet.payload(), b"good");
    assert!(reader.next().await.is_none());
    assert_eq!(reader.decoder().stats().checksum_failures, 1);
}
