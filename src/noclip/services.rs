//! Seams between the flight controller and the host application.
//!
//! The controller never reads keys, queries, or terrain directly: everything
//! flows through these traits, implemented over the ECS in
//! [`super::systems`] and by scripted fakes in the controller tests.

use bevy::prelude::{Entity, Vec3};

/// Logical flight control, decoupled from any physical key binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Flip flight on or off (edge-triggered by the host).
    Toggle,
    /// Move along the camera's forward direction.
    Forward,
    /// Move against the camera's forward direction.
    Backward,
    /// Strafe left of the camera's horizontal facing.
    StrafeLeft,
    /// Strafe right of the camera's horizontal facing.
    StrafeRight,
    /// Climb along the world vertical axis.
    Ascend,
    /// Sink along the world vertical axis.
    Descend,
    /// Hold for the fast speed multiplier.
    Fast,
    /// Hold for the slow speed multiplier.
    Slow,
}

/// What kind of entity is being flown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// The bare player. Gets snapped back to the ground when flight ends.
    Player,
    /// The vehicle the player occupies. Never ground-snapped.
    Vehicle,
}

/// The entity being flown, resolved once per activation and cached until
/// flight ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    /// ECS id of the flown entity.
    pub entity: Entity,
    /// Whether that entity is the player or a vehicle.
    pub kind: TargetKind,
}

/// Held-input lookup for the logical flight controls.
pub trait InputSource {
    /// Whether the given control is currently held.
    fn held(&self, action: Action) -> bool;
}

/// Camera lifecycle and orientation service.
pub trait CameraRig {
    /// Takes over the view for a flight session. `None` means the host could
    /// not provide a camera and the activation must be abandoned.
    fn acquire(&mut self) -> Option<Entity>;
    /// Returns the view to whatever owned it before [`Self::acquire`].
    fn release(&mut self, camera: Entity);
    /// Unit forward vector of the flight camera, if it is readable this frame.
    fn forward(&self, camera: Entity) -> Option<Vec3>;
}

/// Resolution and mutation of the flown entity.
pub trait TargetGateway {
    /// Picks what a fresh activation would fly: the occupied vehicle when
    /// there is one, otherwise the player.
    fn resolve(&self) -> Option<Target>;
    /// Current world position, if readable this frame.
    fn position(&self, target: Target) -> Option<Vec3>;
    /// Writes the world position verbatim, with no offset or alignment correction.
    fn set_position(&mut self, target: Target, position: Vec3);
    /// Freezes or unfreezes the target's own movement simulation.
    fn set_frozen(&mut self, target: Target, frozen: bool);
    /// Enables or disables collision response against the world and against
    /// other entities.
    fn set_collision(&mut self, target: Target, world: bool, entities: bool);
}

/// Terrain height lookup used for the end-of-flight ground snap.
pub trait GroundProbe {
    /// Ground height directly beneath `(x, z)`. `y_hint` is the altitude the
    /// query originates from, for hosts that need a starting point.
    fn ground_height(&self, x: f32, z: f32, y_hint: f32) -> f32;
}
