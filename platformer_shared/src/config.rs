//! Configuration system.
//!
//! Loads game configuration from JSON strings (file IO left to app).

use serde::{Deserialize, Serialize};

use crate::{
    math::Vec2,
    net::PeerId,
    physics::Character,
    scene::{default_obstacles, Obstacle, Playfield, Scene},
};

/// Root configuration for one peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Local UDP address, e.g. `127.0.0.1:0`.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Room id (remote address) to join on startup.
    #[serde(default)]
    pub connect: Option<String>,
    /// Sender id stamped on outgoing state. Random when absent.
    #[serde(default)]
    pub peer_id: Option<String>,
    /// Fixed tick rate for both simulation and broadcast.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    #[serde(default)]
    pub playfield: Playfield,
    /// Top-left corner the local character spawns at.
    #[serde(default = "default_spawn")]
    pub spawn: Vec2,
    #[serde(default = "default_character_size")]
    pub character_size: Vec2,
    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<Obstacle>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:0".to_string()
}

fn default_tick_hz() -> u32 {
    60
}

fn default_spawn() -> Vec2 {
    Vec2::new(120.0, 0.0)
}

fn default_character_size() -> Vec2 {
    Vec2::new(20.0, 50.0)
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            connect: None,
            peer_id: None,
            tick_hz: default_tick_hz(),
            playfield: Playfield::default(),
            spawn: default_spawn(),
            character_size: default_character_size(),
            obstacles: default_obstacles(),
        }
    }
}

impl GameConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn scene(&self) -> Scene {
        Scene::new(self.playfield, self.obstacles.clone())
    }

    pub fn spawn_character(&self) -> Character {
        Character::new(self.spawn, self.character_size)
    }

    /// The configured peer id, or a fresh random one.
    pub fn resolve_peer_id(&self) -> PeerId {
        self.peer_id
            .as_deref()
            .map(PeerId::new)
            .unwrap_or_else(PeerId::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg.tick_hz, 60);
        assert_eq!(cfg.obstacles.len(), 3);
        assert_eq!(cfg.spawn, Vec2::new(120.0, 0.0));
        assert_eq!(cfg.playfield, Playfield::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = GameConfig::from_json_str(
            r#"{
                "peer_id": "alice",
                "tick_hz": 30,
                "playfield": { "width": 800, "height": 600 },
                "obstacles": [ { "position": { "x": 1, "y": 2 }, "size": { "x": 3, "y": 4 } } ]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.resolve_peer_id(), PeerId::new("alice"));
        assert_eq!(cfg.tick_hz, 30);
        assert_eq!(cfg.scene().playfield.height, 600.0);
        assert_eq!(cfg.scene().obstacles(), &[Obstacle::new(1.0, 2.0, 3.0, 4.0)]);
    }

    #[test]
    fn spawned_character_is_airborne_with_double_jump() {
        let c = GameConfig::default().spawn_character();
        assert!(!c.grounded);
        assert!(c.can_double_jump);
        assert_eq!(c.size, Vec2::new(20.0, 50.0));
    }
}
