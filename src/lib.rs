#![warn(missing_docs)]
//! Free-flight sandbox.
//!
//! Walk a noise-generated heightfield, hop into a buggy and drive it, or hit
//! the noclip key and fly whichever one you are controlling straight through
//! the world. The flight layer in [`noclip`] detaches the controlled entity
//! from the sandbox's movement rules and steers it camera-relative with
//! per-axis accelerating speed.

pub mod math;
pub mod noclip;
pub mod player;
pub mod vehicle;
pub mod world;

use bevy::prelude::*;

/// Application-wide game state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Normal gameplay — walking, driving, flying.
    #[default]
    Running,
    /// Debug overlay active (Tab to toggle).
    Debugging,
}
