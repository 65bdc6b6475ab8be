//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend.
//! A frame paints obstacles, then peers, then the local character on top.

use crate::{
    net::{CharacterSnapshot, PeerId},
    physics::Character,
    replication::PeerTable,
    scene::{Obstacle, Scene},
};

/// A minimal 2D drawing API.
pub trait RenderBackend: Send {
    fn begin_frame(&mut self);
    fn draw_obstacle(&mut self, obstacle: &Obstacle);
    fn draw_peer(&mut self, id: &PeerId, snapshot: &CharacterSnapshot);
    fn draw_local(&mut self, character: &Character);
    fn end_frame(&mut self);
}

/// Paints one frame from read-only views of the game state.
pub fn render_scene(
    backend: &mut dyn RenderBackend,
    scene: &Scene,
    peers: &PeerTable,
    local: &Character,
) {
    backend.begin_frame();
    for obstacle in scene.obstacles() {
        backend.draw_obstacle(obstacle);
    }
    for (id, snapshot) in peers.iter() {
        backend.draw_peer(id, snapshot);
    }
    backend.draw_local(local);
    backend.end_frame();
}

/// A no-op renderer useful for headless tests.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn begin_frame(&mut self) {}
    fn draw_obstacle(&mut self, _obstacle: &Obstacle) {}
    fn draw_peer(&mut self, _id: &PeerId, _snapshot: &CharacterSnapshot) {}
    fn draw_local(&mut self, _character: &Character) {}
    fn end_frame(&mut self) {}
}
