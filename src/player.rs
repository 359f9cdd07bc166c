//! First-person player.
//!
//! Mouse look + WASD walking over the heightfield, with gravity and a simple
//! keep-out against the buggy. Carries the [`PhysicsFlags`] the flight layer
//! flips when it takes the player over.

mod entities;
mod systems;

pub use entities::{LookAngles, PhysicsFlags, Player, PlayerCamera, Riding, VerticalVelocity};

use bevy::prelude::*;

use crate::GameState;
use crate::noclip::flight_inactive;

/// Per-plugin configuration for the player.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct PlayerConfig {
    /// Walking speed in world-units per second.
    pub walk_speed: f32,
    /// Downward acceleration in world-units per second squared.
    pub gravity: f32,
    /// Camera height above the player's feet.
    pub eye_height: f32,
    /// Horizontal mouse sensitivity (radians per pixel).
    pub mouse_sensitivity_x: f32,
    /// Vertical mouse sensitivity (radians per pixel).
    pub mouse_sensitivity_y: f32,
    /// Margin from vertical to prevent camera flip (radians).
    pub pitch_margin: f32,
    /// Body capsule radius, used for the vehicle keep-out.
    pub body_radius: f32,
    /// Bloom post-processing intensity on the first-person camera.
    pub bloom_intensity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            gravity: 24.0,
            eye_height: 1.6,
            mouse_sensitivity_x: 0.003,
            mouse_sensitivity_y: 0.002,
            pitch_margin: 0.05,
            body_radius: 0.45,
            bloom_intensity: 0.15,
        }
    }
}

/// First-person player plugin: spawning, mouse look, walking.
pub struct PlayerPlugin(pub PlayerConfig);

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerConfig>()
            .register_type::<Player>()
            .register_type::<PlayerCamera>()
            .register_type::<LookAngles>()
            .register_type::<PhysicsFlags>()
            .register_type::<VerticalVelocity>()
            .register_type::<Riding>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_player)
            .add_systems(
                Update,
                (
                    systems::look.run_if(flight_inactive),
                    systems::walk,
                    systems::sync_camera,
                )
                    .chain()
                    .run_if(in_state(GameState::Running)),
            );
    }
}
