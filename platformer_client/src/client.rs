//! Client implementation.
//!
//! `GameClient` is the single owner of all game state:
//! - The local character and the static scene
//! - The replication channel with its peer table
//! - The queue of transport events waiting for the next tick
//! - Keyboard state fed by the host between ticks
//! - The render backend
//!
//! Each tick runs to completion: sample input, step and resolve the local
//! character, broadcast it, apply queued peer state, paint.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use platformer_shared::{
    config::GameConfig,
    net::PeerId,
    physics::{self, Character},
    render::{render_scene, RenderBackend},
    replication::{PeerTable, ReplicationChannel},
    scene::Scene,
    transport::{udp::UdpTransport, EventRx},
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::input::{parse_key, KeyBindings, KeyboardState};

/// What one tick did on the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub sent: usize,
    pub events: usize,
}

/// Fixed-rate tick deadlines.
///
/// Deadlines advance by a constant interval from the start, so a slow tick
/// is caught up on rather than stretching the schedule.
#[derive(Debug)]
pub struct TickSchedule {
    interval: Duration,
    next: Instant,
}

impl TickSchedule {
    /// A zero rate is treated as 1 Hz.
    pub fn new(tick_hz: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1))),
            next: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps until the next deadline.
    pub async fn wait(&mut self) {
        self.next += self.interval;
        tokio::time::sleep_until(self.next).await;
    }
}

/// High-level peer client.
pub struct GameClient {
    scene: Scene,
    character: Character,
    replication: ReplicationChannel,
    events: EventRx,
    pub keyboard: KeyboardState,
    /// Keys pressed by `tap`, released after the next tick.
    tapped: Vec<String>,
    renderer: Box<dyn RenderBackend>,
    udp: Option<UdpTransport>,
    tick: u64,
    quit: bool,
}

impl GameClient {
    /// Builds a client fed by an existing event queue.
    pub fn new(cfg: &GameConfig, events: EventRx, renderer: Box<dyn RenderBackend>) -> Self {
        let local_id = cfg.resolve_peer_id();
        info!(peer = %local_id, "Local peer id");
        Self {
            scene: cfg.scene(),
            character: cfg.spawn_character(),
            replication: ReplicationChannel::new(local_id),
            events,
            keyboard: KeyboardState::new(KeyBindings::default()),
            tapped: Vec::new(),
            renderer,
            udp: None,
            tick: 0,
            quit: false,
        }
    }

    /// Binds a UDP transport and dials `cfg.connect` if set.
    pub async fn bind_udp(cfg: &GameConfig, renderer: Box<dyn RenderBackend>) -> anyhow::Result<Self> {
        let bind: SocketAddr = cfg.bind_addr.parse().context("parse bind_addr")?;
        let (udp, events) = UdpTransport::bind(bind).await?;
        udp.writable().await?;
        info!(room = %udp.local_addr()?, "Listening; share this room id");

        let mut client = Self::new(cfg, events, renderer);
        client.udp = Some(udp);
        if let Some(remote) = &cfg.connect {
            client.connect(remote)?;
        }
        Ok(client)
    }

    /// Dials a remote room id over UDP.
    pub fn connect(&mut self, remote: &str) -> anyhow::Result<()> {
        let addr: SocketAddr = remote.parse().with_context(|| format!("parse room id {remote}"))?;
        let udp = self.udp.as_ref().context("no UDP transport bound")?;
        udp.connect(addr)
    }

    /// Room id other peers can join, when running over UDP.
    pub fn room_id(&self) -> Option<SocketAddr> {
        self.udp.as_ref().and_then(|u| u.local_addr().ok())
    }

    pub fn local_id(&self) -> &PeerId {
        self.replication.local_id()
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn peers(&self) -> &PeerTable {
        self.replication.peers()
    }

    pub fn connection_count(&self) -> usize {
        self.replication.connection_count()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Advances one tick.
    pub fn tick(&mut self) -> TickReport {
        let keys = self.keyboard.snapshot();
        physics::tick(&mut self.character, keys, &self.scene);

        let sent = self.replication.broadcast(&self.character);
        let events = self.replication.drain(&mut self.events);

        render_scene(
            self.renderer.as_mut(),
            &self.scene,
            self.replication.peers(),
            &self.character,
        );

        for key in self.tapped.drain(..) {
            self.keyboard.key_up(&key);
        }
        self.tick += 1;
        TickReport { sent, events }
    }

    /// Runs a fixed number of ticks at `tick_hz`.
    pub async fn run_for_ticks(&mut self, ticks: u32, tick_hz: u32) {
        let mut schedule = TickSchedule::new(tick_hz);
        for _ in 0..ticks {
            self.tick();
            schedule.wait().await;
        }
    }

    /// Executes a console command.
    pub fn exec_console(&mut self, line: &str) -> anyhow::Result<Vec<String>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        match tokens[0] {
            "down" | "up" | "tap" => {
                if tokens.len() < 2 {
                    return Ok(vec![format!("Usage: {} <key>", tokens[0])]);
                }
                let key = parse_key(tokens[1]);
                match tokens[0] {
                    "down" => self.keyboard.key_down(&key),
                    "up" => self.keyboard.key_up(&key),
                    _ => {
                        // A key already held stays held after the tick.
                        if !self.keyboard.is_held(&key) {
                            self.tapped.push(key.clone());
                        }
                        self.keyboard.key_down(&key);
                    }
                }
                Ok(Vec::new())
            }
            "connect" => {
                if tokens.len() < 2 {
                    return Ok(vec!["Usage: connect <room id>".to_string()]);
                }
                match self.connect(tokens[1]) {
                    Ok(()) => Ok(vec![format!("Connecting to {}", tokens[1])]),
                    Err(e) => Ok(vec![format!("Failed to connect: {e:#}")]),
                }
            }
            "status" => {
                let c = &self.character;
                let mut out = vec![
                    format!("Peer: {}", self.local_id()),
                    format!("Tick: {}", self.tick),
                    format!("Position: {}", c.position),
                    format!("Velocity: {}", c.velocity),
                    format!("Grounded: {} double jump: {}", c.grounded, c.can_double_jump),
                    format!("Peers: {}", self.peers().len()),
                    format!("Connections: {}", self.connection_count()),
                ];
                if let Some(room) = self.room_id() {
                    out.insert(1, format!("Room: {room}"));
                }
                Ok(out)
            }
            "peers" => {
                let mut rows: Vec<_> = self.peers().iter().collect();
                rows.sort_by(|a, b| a.0.cmp(b.0));
                Ok(rows
                    .into_iter()
                    .map(|(id, s)| format!("  {id}: pos={} size={}", s.position, s.size))
                    .collect())
            }
            "quit" | "exit" => {
                info!("Quit requested");
                self.quit = true;
                Ok(Vec::new())
            }
            other => {
                debug!(command = %other, "Unknown console command");
                Ok(vec![format!("Unknown command: {other}")])
            }
        }
    }
}
