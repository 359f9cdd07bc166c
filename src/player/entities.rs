use bevy::prelude::*;

/// Marker for the walking player entity. Its `Transform` origin is at foot
/// level, so the terrain height is also the stand height.
#[derive(Component, Reflect)]
pub struct Player;

/// Marker for the player's first-person camera.
#[derive(Component, Reflect)]
pub struct PlayerCamera;

/// Yaw/pitch state for the first-person view.
#[derive(Component, Default, Reflect)]
pub struct LookAngles {
    /// Rotation about the world vertical axis (radians).
    pub yaw: f32,
    /// Rotation about the view's right axis (radians), clamped short of vertical.
    pub pitch: f32,
}

/// Movement switches the flight layer flips while it owns an entity.
///
/// `frozen` parks the entity's own movement systems entirely; the collision
/// flags select which responses apply while moving normally. Present on both
/// the player and the buggy.
#[derive(Component, Clone, Debug, Reflect)]
pub struct PhysicsFlags {
    /// The entity's own movement simulation is suspended.
    pub frozen: bool,
    /// Respond to the terrain (stand on it / hug it).
    pub collide_world: bool,
    /// Respond to other entities.
    pub collide_entities: bool,
}

impl Default for PhysicsFlags {
    fn default() -> Self {
        Self {
            frozen: false,
            collide_world: true,
            collide_entities: true,
        }
    }
}

/// Vertical velocity accumulated by gravity (world-units per second).
#[derive(Component, Default, Reflect)]
pub struct VerticalVelocity(pub f32);

/// Which vehicle the player currently occupies, if any.
#[derive(Component, Default, Reflect)]
pub struct Riding(pub Option<Entity>);
