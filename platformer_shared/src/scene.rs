//! Static scene: the playfield bounds and the fixed obstacle set.

use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Vec2};

/// Static rectangle the character collides with. Never mutated after startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

/// Playfield extents. Only `height` takes part in collision (the floor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// The obstacle layout every peer starts with.
pub fn default_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::new(400.0, 500.0, 50.0, 50.0),
        Obstacle::new(600.0, 400.0, 100.0, 50.0),
        Obstacle::new(1000.0, 400.0, 100.0, 200.0),
    ]
}

/// Read-only scene handed to the simulation and the render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub playfield: Playfield,
    obstacles: Vec<Obstacle>,
}

impl Scene {
    pub fn new(playfield: Playfield, obstacles: Vec<Obstacle>) -> Self {
        Self {
            playfield,
            obstacles,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Playfield::default(), default_obstacles())
    }
}
