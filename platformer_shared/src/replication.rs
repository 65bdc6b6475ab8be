//! Replication channel.
//!
//! Broadcasts the local character to every open link once per tick and keeps
//! the last state heard from each peer. Fire-and-forget in both directions:
//! - no acknowledgement, retry, batching or delta compression on send;
//! - inbound state is upserted by `senderId`, last write wins, never merged;
//! - the sender id is not checked against the link it arrived on;
//! - peers are never evicted. A peer that goes quiet stays frozen at its
//!   last known position.

use std::collections::{hash_map::Entry, HashMap};

use tracing::{debug, info, trace};

use crate::{
    net::{decode_from_bytes, encode_to_bytes, CharacterSnapshot, PeerId, StateMsg},
    physics::Character,
    transport::{Connection, EventRx, NetEvent},
};

/// Last received snapshot per remote peer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PeerTable {
    entries: HashMap<PeerId, CharacterSnapshot>,
}

impl PeerTable {
    /// Inserts or overwrites the entry for `id`. Returns true if it was new.
    pub fn upsert(&mut self, id: PeerId, snapshot: CharacterSnapshot) -> bool {
        match self.entries.entry(id) {
            Entry::Occupied(mut e) => {
                e.insert(snapshot);
                false
            }
            Entry::Vacant(e) => {
                e.insert(snapshot);
                true
            }
        }
    }

    pub fn get(&self, id: &PeerId) -> Option<&CharacterSnapshot> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeerId, &CharacterSnapshot)> {
        self.entries.iter()
    }
}

/// Outbound broadcast plus inbound peer table for one local peer.
pub struct ReplicationChannel {
    local_id: PeerId,
    connections: Vec<Box<dyn Connection>>,
    peers: PeerTable,
}

impl ReplicationChannel {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            connections: Vec::new(),
            peers: PeerTable::default(),
        }
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    pub fn peers(&self) -> &PeerTable {
        &self.peers
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn handle_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::Opened(conn) => self.on_opened(conn),
            NetEvent::Data { from, payload } => self.on_data(&from, &payload),
        }
    }

    /// Starts broadcasting to a newly usable link.
    pub fn on_opened(&mut self, conn: Box<dyn Connection>) {
        info!(remote = %conn.remote(), "Connection established");
        self.connections.push(conn);
    }

    /// Upserts the peer table from one inbound payload. Undecodable payloads are dropped.
    pub fn on_data(&mut self, from: &str, payload: &[u8]) {
        let msg = match decode_from_bytes(payload) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(%from, error = %e, "Dropping malformed state");
                return;
            }
        };
        let StateMsg {
            sender_id,
            character,
        } = msg;
        if self.peers.upsert(sender_id.clone(), character) {
            info!(peer = %sender_id, via = %from, "New peer");
        }
    }

    /// Applies every event queued since the last call. Never blocks.
    pub fn drain(&mut self, events: &mut EventRx) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Sends the local character to every open link. Returns how many sends succeeded.
    pub fn broadcast(&self, character: &Character) -> usize {
        let msg = StateMsg {
            sender_id: self.local_id.clone(),
            character: character.snapshot(),
        };
        let payload = match encode_to_bytes(&msg) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "Failed to encode state");
                return 0;
            }
        };

        let mut sent = 0;
        for conn in self.connections.iter().filter(|c| c.is_open()) {
            match conn.send(payload.clone()) {
                Ok(()) => sent += 1,
                Err(e) => trace!(remote = %conn.remote(), error = %e, "Send failed"),
            }
        }
        sent
    }
}
