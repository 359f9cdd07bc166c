//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec3` inputs, making them straightforward to unit-test.

use bevy::prelude::Vec3;

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Noise generators (e.g. `Fbm<Perlin>`) produce values centred around zero.
/// This linearly rescales to an arbitrary output range.
///
/// # Examples
/// ```
/// # use noclip_sandbox::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 10.0), 10.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0),  4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Clamps a pitch angle so a camera cannot flip past vertical.
///
/// `current` is the existing pitch in radians (from `Quat::to_euler`).
/// `delta` is the desired change. The result is clamped to
/// `(-PI/2 + margin, PI/2 - margin)` and the *effective* delta is returned
/// (i.e. how much to actually rotate).
pub fn clamp_pitch(current: f32, delta: f32, margin: f32) -> f32 {
    let limit = std::f32::consts::FRAC_PI_2 - margin;
    let clamped = (current + delta).clamp(-limit, limit);
    clamped - current
}

/// Horizontal forward vector for a yaw angle (radians), y-up world.
///
/// Yaw 0 faces `-Z`, matching `Quat::from_rotation_y(yaw)` applied to the
/// camera's default facing.
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Horizontal right vector for a yaw angle (radians), y-up world.
pub fn yaw_right(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Pushes `pos` horizontally out of a circular obstacle footprint.
///
/// When `pos` is within `min_dist` of `obstacle` on the XZ plane, it is moved
/// radially outward to exactly `min_dist`; altitude is untouched. A position
/// exactly on the obstacle centre is pushed along `+X` so the result is
/// deterministic.
pub fn push_out_horizontal(pos: Vec3, obstacle: Vec3, min_dist: f32) -> Vec3 {
    let offset = Vec3::new(pos.x - obstacle.x, 0.0, pos.z - obstacle.z);
    let dist = offset.length();
    if dist >= min_dist {
        return pos;
    }
    let dir = if dist > 1e-5 {
        offset / dist
    } else {
        Vec3::X
    };
    let pushed = Vec3::new(obstacle.x, 0.0, obstacle.z) + dir * min_dist;
    Vec3::new(pushed.x, pos.y, pushed.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── map_noise_to_range ──────────────────────────────────────────

    #[test]
    fn noise_min_maps_to_range_min() {
        assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn noise_max_maps_to_range_max() {
        assert_eq!(map_noise_to_range(1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn noise_zero_maps_to_midpoint() {
        let result = map_noise_to_range(0.0, 2.0, 6.0);
        assert!((result - 4.0).abs() < 1e-6);
    }

    // ── clamp_pitch ─────────────────────────────────────────────────

    #[test]
    fn small_delta_passes_through() {
        let delta = clamp_pitch(0.0, 0.1, 0.05);
        assert!((delta - 0.1).abs() < 1e-6);
    }

    #[test]
    fn clamps_at_upper_limit() {
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        // Already near limit, trying to push past
        let delta = clamp_pitch(limit - 0.01, 0.1, 0.05);
        assert!(
            (delta - 0.01).abs() < 1e-4,
            "should clamp to remaining room"
        );
    }

    #[test]
    fn clamps_at_lower_limit() {
        let limit = -(std::f32::consts::FRAC_PI_2 - 0.05);
        let delta = clamp_pitch(limit + 0.01, -0.1, 0.05);
        assert!((delta - (-0.01)).abs() < 1e-4);
    }

    // ── yaw basis vectors ───────────────────────────────────────────

    #[test]
    fn yaw_zero_faces_negative_z() {
        assert!((yaw_forward(0.0) - Vec3::NEG_Z).length() < 1e-6);
        assert!((yaw_right(0.0) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn quarter_turn_left_faces_negative_x() {
        let f = yaw_forward(std::f32::consts::FRAC_PI_2);
        assert!((f - Vec3::NEG_X).length() < 1e-6, "got {f:?}");
    }

    #[test]
    fn right_is_perpendicular_to_forward() {
        for i in 0..8 {
            let yaw = i as f32 * 0.7;
            let dot = yaw_forward(yaw).dot(yaw_right(yaw));
            assert!(dot.abs() < 1e-6, "yaw {yaw}: dot {dot}");
        }
    }

    // ── push_out_horizontal ─────────────────────────────────────────

    #[test]
    fn outside_radius_is_unchanged() {
        let pos = Vec3::new(5.0, 1.0, 0.0);
        let out = push_out_horizontal(pos, Vec3::ZERO, 2.0);
        assert_eq!(out, pos);
    }

    #[test]
    fn inside_radius_is_pushed_to_boundary() {
        let out = push_out_horizontal(Vec3::new(1.0, 0.5, 0.0), Vec3::ZERO, 2.0);
        assert!((out - Vec3::new(2.0, 0.5, 0.0)).length() < 1e-5, "got {out:?}");
    }

    #[test]
    fn push_preserves_altitude() {
        let out = push_out_horizontal(Vec3::new(0.5, 7.0, 0.5), Vec3::ZERO, 3.0);
        assert_eq!(out.y, 7.0);
    }

    #[test]
    fn centred_position_pushes_along_x() {
        let out = push_out_horizontal(Vec3::ZERO, Vec3::ZERO, 2.0);
        assert!((out - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5, "got {out:?}");
    }
}
