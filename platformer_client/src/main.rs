//! Standalone peer binary.
//!
//! Usage:
//!   cargo run -p platformer_client -- [--config peer.json] [--bind 127.0.0.1:0]
//!       [--connect <room id>] [--id <peer id>] [--tick-hz 60]
//!
//! The peer binds a UDP socket (its address is the room id), optionally joins
//! another room, and runs the fixed-tick loop forever.
//!
//! Console commands:
//!   down <key> / up <key> - Press or release a key (a, d, space, w)
//!   tap <key>             - Press a key for a single tick
//!   connect <room id>     - Join another peer
//!   status                - Show local state
//!   peers                 - List known peers
//!   quit                  - Exit

use std::env;
use std::io::{BufRead, Write};

use anyhow::Context;
use platformer_client::{render::TraceRenderer, GameClient, TickSchedule};
use platformer_shared::config::GameConfig;
use tokio::sync::mpsc;
use tracing::{debug, info};

fn parse_args(args: &[String]) -> anyhow::Result<GameConfig> {
    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = &args[i + 1];
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            GameConfig::from_json_str(&text).with_context(|| format!("parse {path}"))?
        }
        _ => GameConfig::default(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" if i + 1 < args.len() => {
                cfg.bind_addr = args[i + 1].clone();
                i += 2;
            }
            "--connect" if i + 1 < args.len() => {
                cfg.connect = Some(args[i + 1].clone());
                i += 2;
            }
            "--id" if i + 1 < args.len() => {
                cfg.peer_id = Some(args[i + 1].clone());
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1]
                    .parse()
                    .with_context(|| format!("parse --tick-hz {}", args[i + 1]))?;
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let cfg = parse_args(&args)?;
    info!(bind = %cfg.bind_addr, tick_hz = cfg.tick_hz, "Starting peer");

    let mut client = GameClient::bind_udp(&cfg, Box::new(TraceRenderer::default()))
        .await
        .context("start peer")?;

    // Set up console input channel.
    let (console_tx, mut console_rx) = mpsc::channel::<String>(32);

    // Spawn stdin reader thread.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("] ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    if let Some(room) = client.room_id() {
        println!("Room ID: {room}. Type 'status' for info, 'quit' to exit.");
        println!();
    }

    let mut schedule = TickSchedule::new(cfg.tick_hz);

    loop {
        // Key events and commands land between ticks.
        while let Ok(line) = console_rx.try_recv() {
            match client.exec_console(&line) {
                Ok(output) => {
                    for line in output {
                        println!("{}", line);
                    }
                }
                Err(e) => {
                    println!("Error: {}", e);
                }
            }
        }
        if client.quit_requested() {
            break;
        }

        let report = client.tick();
        if client.tick_count() % u64::from(cfg.tick_hz.max(1)) == 0 {
            debug!(
                tick = client.tick_count(),
                sent = report.sent,
                events = report.events,
                peers = client.peers().len(),
                position = %client.character().position,
                "Tick"
            );
        }

        schedule.wait().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("platformer")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn flags_override_defaults() -> anyhow::Result<()> {
        let cfg = parse_args(&args(&[
            "--bind",
            "127.0.0.1:4000",
            "--connect",
            "127.0.0.1:4001",
            "--id",
            "alice",
            "--tick-hz",
            "30",
        ]))?;
        assert_eq!(cfg.bind_addr, "127.0.0.1:4000");
        assert_eq!(cfg.connect.as_deref(), Some("127.0.0.1:4001"));
        assert_eq!(cfg.peer_id.as_deref(), Some("alice"));
        assert_eq!(cfg.tick_hz, 30);
        Ok(())
    }

    #[test]
    fn bad_tick_rate_fails() {
        let err = parse_args(&args(&["--tick-hz", "fast"])).unwrap_err();
        assert!(format!("{err:#}").contains("parse --tick-hz fast"));
    }

    #[test]
    fn missing_config_file_fails() {
        assert!(parse_args(&args(&["--config", "/nonexistent/peer.json"])).is_err());
    }
}
