//! Headless render backend that reports frames through `tracing`.

use platformer_shared::{
    net::{CharacterSnapshot, PeerId},
    physics::Character,
    render::RenderBackend,
    scene::Obstacle,
};
use tracing::trace;

/// Emits one `trace` event per drawn rectangle.
#[derive(Default)]
pub struct TraceRenderer {
    frame: u64,
    peers_drawn: usize,
}

impl TraceRenderer {
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

impl RenderBackend for TraceRenderer {
    fn begin_frame(&mut self) {
        self.peers_drawn = 0;
    }

    fn draw_obstacle(&mut self, obstacle: &Obstacle) {
        trace!(frame = self.frame, position = %obstacle.position, size = %obstacle.size, "obstacle");
    }

    fn draw_peer(&mut self, id: &PeerId, snapshot: &CharacterSnapshot) {
        self.peers_drawn += 1;
        trace!(frame = self.frame, peer = %id, position = %snapshot.position, "peer");
    }

    fn draw_local(&mut self, character: &Character) {
        trace!(
            frame = self.frame,
            position = %character.position,
            grounded = character.grounded,
            "local"
        );
    }

    fn end_frame(&mut self) {
        trace!(frame = self.frame, peers = self.peers_drawn, "frame done");
        self.frame += 1;
    }
}
