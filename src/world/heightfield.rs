use bevy::prelude::*;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::WorldConfig;
use crate::math;

/// Square grid of terrain elevations, `cells + 1` vertices per side, spanning
/// `[-size/2, size/2]` on X and Z.
///
/// Built once from config and never mutated: it is both the source the
/// terrain mesh is built from and the ground-height service everything else
/// queries.
#[derive(Resource)]
pub struct Heightfield {
    size: f32,
    cells: u32,
    heights: Vec<f32>,
}

impl Heightfield {
    /// Samples the configured noise (or a flat slab) into the grid.
    pub fn from_settings(cfg: &WorldConfig) -> Self {
        let fbm: Fbm<Perlin> = Fbm::new(cfg.seed).set_octaves(cfg.octaves);
        let side = cfg.cells + 1;
        let mut heights = Vec::with_capacity((side * side) as usize);
        for iz in 0..side {
            for ix in 0..side {
                if cfg.flat {
                    heights.push(0.0);
                    continue;
                }
                let (x, z) = Self::vertex_pos(cfg.size, cfg.cells, ix, iz);
                let noise_val = fbm.get([
                    f64::from(x) / cfg.noise_scale,
                    f64::from(z) / cfg.noise_scale,
                ]);
                heights.push(math::map_noise_to_range(noise_val, 0.0, cfg.max_height));
            }
        }
        Self {
            size: cfg.size,
            cells: cfg.cells,
            heights,
        }
    }

    /// Minimal constructor for tests: explicit heights on a small grid.
    #[cfg(test)]
    pub fn from_heights(size: f32, cells: u32, heights: Vec<f32>) -> Self {
        assert_eq!(heights.len(), ((cells + 1) * (cells + 1)) as usize);
        Self {
            size,
            cells,
            heights,
        }
    }

    /// Side length of the patch.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Grid cells per side.
    pub fn cells(&self) -> u32 {
        self.cells
    }

    /// World X/Z of grid vertex `(ix, iz)`.
    pub fn vertex_pos(size: f32, cells: u32, ix: u32, iz: u32) -> (f32, f32) {
        let cell = size / cells as f32;
        (
            ix as f32 * cell - size / 2.0,
            iz as f32 * cell - size / 2.0,
        )
    }

    /// Elevation at a grid vertex; indices past the edge clamp to the border.
    pub fn vertex_height(&self, ix: u32, iz: u32) -> f32 {
        let side = self.cells + 1;
        let ix = ix.min(self.cells);
        let iz = iz.min(self.cells);
        self.heights[(iz * side + ix) as usize]
    }

    /// Bilinearly interpolated ground height beneath a world-space point.
    ///
    /// Positions outside the patch clamp to the border elevation, so the
    /// query is total: callers never deal with "no ground here".
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let cell = self.size / self.cells as f32;
        let gx = ((x + self.size / 2.0) / cell).clamp(0.0, self.cells as f32);
        let gz = ((z + self.size / 2.0) / cell).clamp(0.0, self.cells as f32);
        let ix = (gx.floor() as u32).min(self.cells.saturating_sub(1));
        let iz = (gz.floor() as u32).min(self.cells.saturating_sub(1));
        let fx = gx - ix as f32;
        let fz = gz - iz as f32;

        let h00 = self.vertex_height(ix, iz);
        let h10 = self.vertex_height(ix + 1, iz);
        let h01 = self.vertex_height(ix, iz + 1);
        let h11 = self.vertex_height(ix + 1, iz + 1);

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One cell spanning [-1, 1]², corner heights 0/2/4/6.
    fn one_cell() -> Heightfield {
        Heightfield::from_heights(2.0, 1, vec![0.0, 2.0, 4.0, 6.0])
    }

    #[test]
    fn vertex_positions_span_the_patch() {
        let (x0, z0) = Heightfield::vertex_pos(240.0, 120, 0, 0);
        let (x1, z1) = Heightfield::vertex_pos(240.0, 120, 120, 120);
        assert_eq!((x0, z0), (-120.0, -120.0));
        assert_eq!((x1, z1), (120.0, 120.0));
    }

    #[test]
    fn corner_queries_return_exact_vertex_heights() {
        let field = one_cell();
        assert_eq!(field.height_at(-1.0, -1.0), 0.0);
        assert_eq!(field.height_at(1.0, -1.0), 2.0);
        assert_eq!(field.height_at(-1.0, 1.0), 4.0);
        assert_eq!(field.height_at(1.0, 1.0), 6.0);
    }

    #[test]
    fn centre_query_averages_the_corners() {
        let field = one_cell();
        let h = field.height_at(0.0, 0.0);
        assert!((h - 3.0).abs() < 1e-6, "got {h}");
    }

    #[test]
    fn interpolation_is_linear_along_an_edge() {
        let field = one_cell();
        let h = field.height_at(0.0, -1.0);
        assert!((h - 1.0).abs() < 1e-6, "got {h}");
    }

    #[test]
    fn outside_the_patch_clamps_to_the_border() {
        let field = one_cell();
        assert_eq!(field.height_at(-50.0, -50.0), 0.0);
        assert_eq!(field.height_at(50.0, 50.0), 6.0);
    }

    #[test]
    fn flat_config_yields_zero_everywhere() {
        let cfg = WorldConfig {
            cells: 8,
            size: 16.0,
            flat: true,
            ..WorldConfig::default()
        };
        let field = Heightfield::from_settings(&cfg);
        for (x, z) in [(0.0, 0.0), (-8.0, 3.0), (7.5, -7.5), (100.0, 100.0)] {
            assert_eq!(field.height_at(x, z), 0.0, "at ({x}, {z})");
        }
    }

    #[test]
    fn hilly_config_produces_varied_heights() {
        let cfg = WorldConfig {
            cells: 16,
            size: 64.0,
            ..WorldConfig::default()
        };
        let field = Heightfield::from_settings(&cfg);
        let first = field.vertex_height(0, 0);
        let varied = (0..=16).any(|iz| (0..=16).any(|ix| field.vertex_height(ix, iz) != first));
        assert!(varied, "noise terrain should not be a flat slab");
    }

    #[test]
    fn same_seed_reproduces_the_same_terrain() {
        let cfg = WorldConfig {
            cells: 8,
            size: 32.0,
            ..WorldConfig::default()
        };
        let a = Heightfield::from_settings(&cfg);
        let b = Heightfield::from_settings(&cfg);
        assert_eq!(a.heights, b.heights);
    }
}
