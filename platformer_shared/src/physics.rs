//! Simulation step.
//!
//! Advances the local character by one fixed tick. There is no delta-time:
//! the cadence is whatever the tick scheduler runs at.
//!
//! Horizontal motion is a damped force model, not velocity integration.
//! Acceleration itself decays every tick, which gives exponential decay to
//! rest when no key is held and a soft top speed when one is. The order of
//! operations below is part of the feel and must not be rearranged.

use crate::{
    collision,
    input::HeldKeys,
    math::{Aabb, Vec2},
    net::CharacterSnapshot,
    scene::Scene,
};

pub const FRICTION: f64 = 0.6;
pub const MAX_SPEED: f64 = 16.0;
pub const JUMP_IMPULSE: f64 = -8.0;
pub const GRAVITY: f64 = 0.2;

/// The locally simulated character.
///
/// Velocity, acceleration and the jump flags never leave this process;
/// peers only ever see [`CharacterSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Top-left corner of the bounding box.
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Bounding box extents. Constant for the character's lifetime.
    pub size: Vec2,
    pub grounded: bool,
    pub can_double_jump: bool,
}

impl Character {
    /// Spawns an airborne character at rest.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            size,
            grounded: false,
            can_double_jump: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    /// The replicated subset of this character.
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            position: self.position,
            size: self.size,
        }
    }

    /// Marks the character as resting on a surface.
    pub(crate) fn land(&mut self) {
        self.velocity.y = 0.0;
        self.acceleration.y = 0.0;
        self.grounded = true;
        self.can_double_jump = false;
    }
}

/// Applies one tick of input, damping and gravity. Does not resolve collisions.
pub fn step(character: &mut Character, keys: HeldKeys) {
    let force = keys.horizontal_axis() * MAX_SPEED * FRICTION.powi(3);
    character.acceleration.x += force;
    character.acceleration.x *= FRICTION.powi(2);
    character.velocity.x += character.acceleration.x;
    character.velocity.x *= FRICTION;
    character.position.x += character.velocity.x;

    // A grounded jump wins over a double jump sampled in the same tick.
    if character.grounded && keys.contains(HeldKeys::JUMP_PRIMARY) {
        character.velocity.y = JUMP_IMPULSE;
        character.grounded = false;
        character.can_double_jump = true;
    } else if character.can_double_jump && keys.contains(HeldKeys::JUMP_SECONDARY) {
        character.velocity.y = JUMP_IMPULSE;
        character.can_double_jump = false;
    }

    character.velocity.y += GRAVITY;
    character.position.y += character.velocity.y;
}

/// Full per-tick update: [`step`] followed by collision resolution.
pub fn tick(character: &mut Character, keys: HeldKeys, scene: &Scene) {
    step(character, keys);
    collision::resolve(character, scene);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Playfield, Scene};

    const EPS: f64 = 1e-9;

    fn empty_scene() -> Scene {
        Scene::new(Playfield::default(), Vec::new())
    }

    fn resting_on_floor(scene: &Scene) -> Character {
        let size = Vec2::new(20.0, 50.0);
        let mut c = Character::new(Vec2::new(120.0, scene.playfield.height - size.y), size);
        c.grounded = true;
        c.can_double_jump = false;
        c
    }

    #[test]
    fn horizontal_step_matches_damped_force_model() {
        let mut c = Character::new(Vec2::ZERO, Vec2::new(20.0, 50.0));
        step(&mut c, HeldKeys::RIGHT);

        let force = 16.0 * 0.6_f64.powi(3);
        let acc = force * 0.36;
        let vel = acc * 0.6;
        assert!((c.acceleration.x - acc).abs() < EPS);
        assert!((c.velocity.x - vel).abs() < EPS);
        assert!((c.position.x - vel).abs() < EPS);
    }

    #[test]
    fn horizontal_speed_is_bounded_while_held() {
        let mut c = Character::new(Vec2::ZERO, Vec2::new(20.0, 50.0));
        for _ in 0..500 {
            step(&mut c, HeldKeys::RIGHT);
        }
        // Fixed point of the damped model.
        let force = 16.0 * 0.6_f64.powi(3);
        let acc = 0.36 * force / (1.0 - 0.36);
        let vel = 0.6 * acc / (1.0 - 0.6);
        assert!((c.velocity.x - vel).abs() < 1e-6);
        assert!(c.velocity.x < MAX_SPEED);
    }

    #[test]
    fn released_velocity_decays_monotonically() {
        for held_ticks in [1, 3, 10, 60] {
            let mut c = Character::new(Vec2::ZERO, Vec2::new(20.0, 50.0));
            for _ in 0..held_ticks {
                step(&mut c, HeldKeys::LEFT);
            }
            let mut prev = c.velocity.x.abs();
            assert!(prev > 0.0);
            for _ in 0..100 {
                step(&mut c, HeldKeys::empty());
                let now = c.velocity.x.abs();
                assert!(now <= prev, "speed grew from {prev} to {now}");
                prev = now;
            }
            assert!(prev < 1e-6);
        }
    }

    #[test]
    fn at_rest_on_floor_stays_put() {
        let scene = empty_scene();
        let mut c = resting_on_floor(&scene);
        let before = c.position;

        tick(&mut c, HeldKeys::empty(), &scene);

        assert!(c.grounded);
        assert_eq!(c.velocity, Vec2::ZERO);
        assert_eq!(c.position.x, before.x);
        assert!((c.position.y - before.y).abs() < EPS);
    }

    #[test]
    fn grounded_jump_applies_impulse_and_gravity_same_tick() {
        let scene = empty_scene();
        let mut c = resting_on_floor(&scene);

        tick(&mut c, HeldKeys::JUMP_PRIMARY, &scene);

        assert!((c.velocity.y - (-7.8)).abs() < EPS);
        assert!(!c.grounded);
        assert!(c.can_double_jump);
    }

    #[test]
    fn grounded_jump_takes_priority_over_double_jump() {
        let scene = empty_scene();
        let mut c = resting_on_floor(&scene);
        c.can_double_jump = true;

        step(&mut c, HeldKeys::JUMP_PRIMARY | HeldKeys::JUMP_SECONDARY);

        // The double jump is still available afterwards.
        assert!(c.can_double_jump);
        assert!(!c.grounded);
    }

    #[test]
    fn holding_jump_only_jumps_once_per_grounding() {
        let scene = empty_scene();
        let mut c = resting_on_floor(&scene);

        tick(&mut c, HeldKeys::JUMP_PRIMARY, &scene);
        let mut vy = c.velocity.y;
        for _ in 0..20 {
            tick(&mut c, HeldKeys::JUMP_PRIMARY, &scene);
            assert!((c.velocity.y - (vy + GRAVITY)).abs() < EPS);
            vy = c.velocity.y;
        }
    }

    #[test]
    fn double_jump_is_single_use() {
        let scene = empty_scene();
        let mut c = resting_on_floor(&scene);

        tick(&mut c, HeldKeys::JUMP_PRIMARY, &scene);
        tick(&mut c, HeldKeys::empty(), &scene);
        tick(&mut c, HeldKeys::JUMP_SECONDARY, &scene);
        assert!(!c.can_double_jump);
        assert!((c.velocity.y - (JUMP_IMPULSE + GRAVITY)).abs() < EPS);

        tick(&mut c, HeldKeys::JUMP_SECONDARY, &scene);
        assert!((c.velocity.y - (JUMP_IMPULSE + 2.0 * GRAVITY)).abs() < EPS);
    }

    #[test]
    fn landing_clears_double_jump() {
        let scene = empty_scene();
        let mut c = resting_on_floor(&scene);

        tick(&mut c, HeldKeys::JUMP_PRIMARY, &scene);
        for _ in 0..200 {
            tick(&mut c, HeldKeys::empty(), &scene);
        }
        assert!(c.grounded);
        assert!(!c.can_double_jump);
    }
}
