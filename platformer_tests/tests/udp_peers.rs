//! Full socket-based replication between two peers.

use std::time::Duration;

use platformer_client::GameClient;
use platformer_shared::{config::GameConfig, net::PeerId, render::NullRenderer};
use tokio::net::UdpSocket;

fn config(id: &str) -> GameConfig {
    GameConfig {
        peer_id: Some(id.to_string()),
        bind_addr: "127.0.0.1:0".to_string(),
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn peers_replicate_over_udp() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let mut host = GameClient::bind_udp(&config("host"), Box::new(NullRenderer)).await?;
    let room = host.room_id().expect("host is bound").to_string();

    let mut guest_cfg = config("guest");
    guest_cfg.connect = Some(room);
    let mut guest = GameClient::bind_udp(&guest_cfg, Box::new(NullRenderer)).await?;

    guest.keyboard.key_down("a");
    for _ in 0..60 {
        guest.tick();
        host.tick();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // The host only learns about the guest from its first datagram.
    assert_eq!(host.connection_count(), 1);
    assert_eq!(guest.connection_count(), 1);

    let seen_guest = host
        .peers()
        .get(&PeerId::new("guest"))
        .expect("host received guest state");
    assert!(seen_guest.position.x < 120.0);

    assert!(guest.peers().get(&PeerId::new("host")).is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stray_datagram_is_not_a_peer() -> anyhow::Result<()> {
    let mut host = GameClient::bind_udp(&config("host"), Box::new(NullRenderer)).await?;
    let room = host.room_id().expect("host is bound");

    let stranger = UdpSocket::bind("127.0.0.1:0").await?;
    stranger.send_to(b"\x00not a state message", room).await?;

    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        host.tick();
    }
    assert_eq!(host.connection_count(), 0);
    assert!(host.peers().is_empty());

    // The host never broadcasts back to the stranger.
    let mut buf = [0u8; 1024];
    let heard = tokio::time::timeout(Duration::from_millis(100), stranger.recv_from(&mut buf)).await;
    assert!(heard.is_err());
    Ok(())
}

#[tokio::test]
async fn peer_runs_few_ticks_alone() -> anyhow::Result<()> {
    let mut solo = GameClient::bind_udp(&config("solo"), Box::new(NullRenderer)).await?;
    solo.run_for_ticks(3, 60).await;
    assert_eq!(solo.tick_count(), 3);
    assert!(solo.peers().is_empty());
    Ok(())
}
