//! The sandbox's drivable buggy.
//!
//! Board with F when standing close, drive with WASD, hop out with F again.
//! The buggy hugs the terrain while its world collision is on and carries the
//! same [`crate::player::PhysicsFlags`] contract as the player, so the flight
//! layer can freeze and fly it.

mod entities;
mod systems;

pub use entities::Vehicle;

use bevy::prelude::*;

use crate::GameState;

/// Per-plugin configuration for the buggy.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct VehicleConfig {
    /// Driving speed in world-units per second.
    pub drive_speed: f32,
    /// Steering rate in radians per second.
    pub steer_rate: f32,
    /// Ride height of the body origin above the terrain.
    pub clearance: f32,
    /// How close the player must stand to board.
    pub mount_radius: f32,
    /// Camera height above the body origin while driving.
    pub seat_height: f32,
    /// Horizontal keep-out radius for the walking player.
    pub footprint_radius: f32,
    /// Where the buggy parks at startup (XZ plane).
    pub spawn_offset: Vec2,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            drive_speed: 14.0,
            steer_rate: 1.8,
            clearance: 0.6,
            mount_radius: 3.0,
            seat_height: 1.4,
            footprint_radius: 1.8,
            spawn_offset: Vec2::new(6.0, -4.0),
        }
    }
}

/// Buggy plugin: spawning, boarding, and driving.
pub struct VehiclePlugin(pub VehicleConfig);

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<VehicleConfig>()
            .register_type::<Vehicle>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_vehicle)
            .add_systems(
                Update,
                (systems::mount, systems::drive, systems::ride_along)
                    .chain()
                    .run_if(in_state(GameState::Running)),
            );
    }
}
