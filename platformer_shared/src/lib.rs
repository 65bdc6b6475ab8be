//! `platformer_shared`
//!
//! Libraries shared by every peer of the platformer.
//!
//! Design goals:
//! - Deterministic simulation step with no hidden clock.
//! - All state owned by the caller; no globals.
//! - Transports behind a small trait so tests run in-process.
//! - No `unsafe`.

pub mod collision;
pub mod config;
pub mod input;
pub mod math;
pub mod net;
pub mod physics;
pub mod render;
pub mod replication;
pub mod scene;
pub mod transport;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::config::*;
    pub use crate::input::*;
    pub use crate::math::*;
    pub use crate::net::*;
    pub use crate::physics::Character;
    pub use crate::replication::*;
    pub use crate::scene::*;
}
