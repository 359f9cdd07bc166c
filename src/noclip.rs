//! Free-flight ("noclip") layer.
//!
//! Toggling flight detaches the controlled entity (the player, or the
//! vehicle they are driving) from the sandbox's movement rules and flies it
//! camera-relative with per-axis accelerating speed. The state machine in
//! [`controller`] only talks to the rest of the app through the seams in
//! [`services`], so the whole flight model is unit-tested against scripted
//! fakes while [`systems`] adapts it onto the ECS.

pub mod controller;
mod entities;
pub mod motion;
pub mod services;
mod systems;

pub use controller::NoClipController;
pub use entities::{FlightCamera, KeyBindings};

use bevy::prelude::*;

use crate::GameState;

/// Movement constants for the flight model.
///
/// Fixed for the lifetime of the controller: the plugin hands a copy to
/// [`NoClipController::new`] at build time.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct NoClipConfig {
    /// Speed every axis starts from and snaps back to on release (units per tick).
    pub base_speed: f32,
    /// Ceiling an axis speed saturates at while continuously driven (units per tick).
    pub max_speed: f32,
    /// Multiplicative per-tick speed growth while an axis stays driven (> 1).
    pub acceleration_factor: f32,
    /// Minimum milliseconds between movement ticks.
    pub min_tick_interval_ms: u32,
    /// Final velocity scaling selected by the held speed modifier.
    pub multipliers: SpeedMultipliers,
    /// Horizontal mouse sensitivity for the flight camera (radians per pixel).
    pub mouse_sensitivity_x: f32,
    /// Vertical mouse sensitivity for the flight camera (radians per pixel).
    pub mouse_sensitivity_y: f32,
    /// Margin from vertical to prevent camera flip (radians).
    pub pitch_margin: f32,
    /// Flight camera height above the flown entity's origin.
    pub camera_height: f32,
}

/// Velocity multipliers for the three speed-modifier states.
#[derive(Clone, Debug, Reflect)]
pub struct SpeedMultipliers {
    /// Applied while the slow modifier is held.
    pub slow: f32,
    /// Applied when no modifier is held.
    pub normal: f32,
    /// Applied while the fast modifier is held.
    pub fast: f32,
}

impl SpeedMultipliers {
    /// Multiplier for the currently-held modifiers. Slow wins when both are held.
    pub fn select(&self, slow_held: bool, fast_held: bool) -> f32 {
        if slow_held {
            self.slow
        } else if fast_held {
            self.fast
        } else {
            self.normal
        }
    }
}

impl Default for NoClipConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            max_speed: 8.0,
            acceleration_factor: 1.025,
            min_tick_interval_ms: 10,
            multipliers: SpeedMultipliers {
                slow: 0.05,
                normal: 0.2,
                fast: 1.0,
            },
            mouse_sensitivity_x: 0.003,
            mouse_sensitivity_y: 0.002,
            pitch_margin: 0.05,
            camera_height: 1.6,
        }
    }
}

/// Run condition: true while free flight is off.
pub fn flight_inactive(controller: Res<NoClipController>) -> bool {
    !controller.is_active()
}

/// Flight layer plugin: toggle handling, per-tick movement, flight camera.
pub struct NoClipPlugin(pub NoClipConfig);

impl Plugin for NoClipPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<NoClipConfig>()
            .register_type::<KeyBindings>()
            .register_type::<FlightCamera>()
            .insert_resource(self.0.clone())
            .insert_resource(NoClipController::new(self.0.clone()))
            .init_resource::<KeyBindings>()
            .add_systems(
                Update,
                (systems::toggle, systems::aim, systems::tick, systems::follow)
                    .chain()
                    .run_if(in_state(GameState::Running)),
            );
    }
}
