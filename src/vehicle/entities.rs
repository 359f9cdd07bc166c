use bevy::prelude::*;

/// Marker for the drivable buggy. Its `Transform` origin sits at body centre,
/// one clearance above the ground while driving normally.
#[derive(Component, Reflect)]
pub struct Vehicle;
