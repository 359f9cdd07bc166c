//! Heightfield terrain: noise-sampled elevations, one terrain mesh, a sun.
//!
//! The [`Heightfield`] resource is the ground truth every other module
//! queries for "how high is the ground here": walking, driving, and the
//! flight layer's end-of-flight ground snap all go through it.

mod heightfield;
mod systems;

pub use heightfield::Heightfield;

use bevy::prelude::*;

/// Per-plugin configuration for terrain generation.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct WorldConfig {
    /// Side length of the square terrain patch (world units).
    pub size: f32,
    /// Number of grid cells along each side of the heightfield.
    pub cells: u32,
    /// Seed for the elevation noise generator.
    pub seed: u32,
    /// Number of octaves for elevation noise.
    pub octaves: usize,
    /// Spatial scale divisor for noise sampling.
    pub noise_scale: f64,
    /// Maximum terrain elevation produced by the noise function.
    pub max_height: f32,
    /// Generate a flat slab instead of rolling hills.
    pub flat: bool,
    /// Background clear color.
    pub clear_color: Color,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 240.0,
            cells: 120,
            seed: 42,
            octaves: 4,
            noise_scale: 50.0,
            max_height: 10.0,
            flat: false,
            clear_color: Color::srgb(0.5, 0.65, 0.85),
        }
    }
}

/// Terrain plugin: heightfield sampled at build time, mesh and sun at startup.
pub struct WorldPlugin(pub WorldConfig);

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<WorldConfig>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .insert_resource(Heightfield::from_settings(&self.0))
            .add_systems(Startup, (systems::spawn_terrain, systems::spawn_sun));
    }
}
