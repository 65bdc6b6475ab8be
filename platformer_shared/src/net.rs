//! Wire format for peer state replication.
//!
//! One message shape, sent by every peer to every open connection each tick:
//! `{ "senderId": "...", "character": { "position": {x, y}, "size": {x, y} } }`.
//! No version field, no sequence number. Decoding is permissive: missing
//! character fields fall back to zero.

use std::fmt;

use anyhow::Context;
use bytes::Bytes;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::math::Vec2;

const PEER_ID_LEN: usize = 8;

/// Opaque identifier a peer stamps on its own messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        PeerId(id.into())
    }

    /// Random alphanumeric id, used when none is configured.
    pub fn random() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(PEER_ID_LEN)
            .map(char::from)
            .collect();
        PeerId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The replicated part of a character: where it is and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CharacterSnapshot {
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
}

/// Per-tick state broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMsg {
    pub sender_id: PeerId,
    #[serde(default)]
    pub character: CharacterSnapshot,
}

pub fn encode_to_bytes(msg: &StateMsg) -> anyhow::Result<Bytes> {
    let payload = serde_json::to_vec(msg).context("serialize state")?;
    Ok(Bytes::from(payload))
}

pub fn decode_from_bytes(b: &[u8]) -> anyhow::Result<StateMsg> {
    serde_json::from_slice(b).context("deserialize state")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_uses_sender_id() {
        let msg = StateMsg {
            sender_id: PeerId::new("p1"),
            character: CharacterSnapshot {
                position: Vec2::new(10.0, 20.0),
                size: Vec2::new(20.0, 50.0),
            },
        };
        let bytes = encode_to_bytes(&msg).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["senderId"], "p1");
        assert_eq!(value["character"]["position"]["x"], 10.0);
        assert_eq!(value["character"]["size"]["y"], 50.0);
        assert!(value["character"].get("velocity").is_none());
        assert_eq!(decode_from_bytes(&bytes).unwrap(), msg);
    }

    #[test]
    fn partial_message_decodes_with_defaults() {
        let msg = decode_from_bytes(br#"{"senderId":"p2","character":{"position":{"x":3}}}"#)
            .unwrap();
        assert_eq!(msg.sender_id, PeerId::new("p2"));
        assert_eq!(msg.character.position, Vec2::new(3.0, 0.0));
        assert_eq!(msg.character.size, Vec2::ZERO);

        let msg = decode_from_bytes(br#"{"senderId":"p3","extra":true}"#).unwrap();
        assert_eq!(msg.character, CharacterSnapshot::default());
    }

    #[test]
    fn message_without_sender_is_rejected() {
        assert!(decode_from_bytes(br#"{"character":{}}"#).is_err());
        assert!(decode_from_bytes(b"not json").is_err());
    }

    #[test]
    fn random_ids_are_alphanumeric() {
        let id = PeerId::random();
        assert_eq!(id.as_str().len(), PEER_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
