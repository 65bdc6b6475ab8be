//! `platformer_client`
//!
//! Peer-side systems:
//! - Keyboard state and key bindings
//! - The tick-loop driver that owns all game state
//! - Console commands standing in for the host UI
//! - A headless, tracing-backed render backend

pub mod client;
pub mod input;
pub mod render;

pub use client::{GameClient, TickSchedule};
