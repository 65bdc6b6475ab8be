//! Collision resolution against the floor and the static obstacles.
//!
//! Resolution is not minimum-penetration. Each overlapping obstacle picks a
//! side by a fixed priority (top landing, left, right, head bump) and the
//! first match wins. Fast or large characters can be pushed out the wrong
//! side; that is accepted.

use crate::{physics::Character, scene::Obstacle, scene::Scene};

/// How far below an obstacle's top edge the character's feet may be and
/// still count as landing on it.
pub const TOP_LANDING_TOLERANCE: f64 = 20.0;

/// Which side an overlap was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Top,
    Left,
    Right,
    Bottom,
}

/// Removes all penetration between `character` and the scene.
///
/// The floor is checked first, then every obstacle in order. Never fails.
pub fn resolve(character: &mut Character, scene: &Scene) {
    let floor = scene.playfield.height;
    resolve_floor(character, floor);
    for obstacle in scene.obstacles() {
        resolve_obstacle(character, obstacle);
    }
    // A head bump under an obstacle close to the floor can push through it.
    // The floor clamp wins over obstacle clearance.
    resolve_floor(character, floor);
}

/// Clamps the character's feet to the bottom of the playfield.
pub fn resolve_floor(character: &mut Character, floor: f64) -> bool {
    let excess = character.position.y + character.size.y - floor;
    if excess > 0.0 {
        character.position.y -= excess;
        character.land();
        return true;
    }
    false
}

/// Pushes the character out of a single obstacle, if they overlap.
pub fn resolve_obstacle(character: &mut Character, obstacle: &Obstacle) -> Option<Contact> {
    let c = character.bounds();
    let o = obstacle.bounds();
    if !c.overlaps(&o) {
        return None;
    }

    let contact = if c.bottom() < o.top() + TOP_LANDING_TOLERANCE {
        Contact::Top
    } else if c.left() < o.left() {
        Contact::Left
    } else if c.right() > o.right() {
        Contact::Right
    } else if c.top() > o.top() {
        Contact::Bottom
    } else {
        // Feet deeper than the tolerance band, head above the top edge and
        // horizontally inside: no branch above applies, so land on top.
        Contact::Top
    };

    match contact {
        Contact::Top => {
            character.position.y = o.top() - character.size.y;
            character.land();
        }
        Contact::Left => {
            character.position.x -= c.right() - o.left();
        }
        Contact::Right => {
            character.position.x += o.right() - c.left();
        }
        Contact::Bottom => {
            character.position.y += o.bottom() - c.top();
            character.velocity.y = 0.0;
            character.acceleration.y = 0.0;
        }
    }
    Some(contact)
}
