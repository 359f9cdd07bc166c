//! Pure flight-movement math: per-axis acceleration and camera-relative
//! displacement composition.
//!
//! Everything here operates on plain values so the speed curve and the
//! direction geometry can be tested without an ECS in sight.

use bevy::prelude::Vec3;

use super::NoClipConfig;
use super::services::{Action, InputSource};

/// Which way an axis is driven on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drive {
    /// Forward / left / up.
    Positive,
    /// Backward / right / down.
    Negative,
}

impl Drive {
    /// Signed contribution of this drive.
    pub fn sign(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// Resolves one axis's opposing inputs into a single drive.
///
/// The positive direction wins when both are held: forward over backward,
/// left over right, up over down.
pub fn resolve_drive(positive: bool, negative: bool) -> Option<Drive> {
    match (positive, negative) {
        (true, _) => Some(Drive::Positive),
        (false, true) => Some(Drive::Negative),
        (false, false) => None,
    }
}

/// Resolved drive for each movement axis on one tick.
#[derive(Clone, Copy, Debug)]
pub struct DriveSet {
    /// Along the camera forward direction.
    pub forward: Option<Drive>,
    /// Along the horizontal strafe basis (positive = left).
    pub strafe: Option<Drive>,
    /// Along the world vertical axis (positive = up).
    pub vertical: Option<Drive>,
}

impl DriveSet {
    /// Reads the held controls and resolves each axis pair.
    pub fn from_input(input: &impl InputSource) -> Self {
        Self {
            forward: resolve_drive(input.held(Action::Forward), input.held(Action::Backward)),
            strafe: resolve_drive(
                input.held(Action::StrafeLeft),
                input.held(Action::StrafeRight),
            ),
            vertical: resolve_drive(input.held(Action::Ascend), input.held(Action::Descend)),
        }
    }
}

/// Per-axis speed scalars plus the tick-throttle timestamp.
///
/// Owned exclusively by the controller; reset to base speeds on every
/// activation and deactivation. While flight is active each axis speed stays
/// in `[base_speed, max_speed]`.
#[derive(Clone, Debug)]
pub struct MovementState {
    /// Speed along the camera forward axis (units per tick).
    pub forward: f32,
    /// Speed along the strafe axis (units per tick).
    pub strafe: f32,
    /// Speed along the vertical axis (units per tick).
    pub vertical: f32,
    /// Milliseconds-since-start timestamp of the last movement tick.
    pub last_update_ms: u64,
}

impl MovementState {
    /// All axes at base speed, throttle timer cleared.
    pub fn at_base(cfg: &NoClipConfig) -> Self {
        Self {
            forward: cfg.base_speed,
            strafe: cfg.base_speed,
            vertical: cfg.base_speed,
            last_update_ms: 0,
        }
    }

    /// Advances every axis speed one tick along the acceleration curve.
    pub fn advance(&mut self, drives: DriveSet, cfg: &NoClipConfig) {
        self.forward = advance_axis(self.forward, drives.forward.is_some(), cfg);
        self.strafe = advance_axis(self.strafe, drives.strafe.is_some(), cfg);
        self.vertical = advance_axis(self.vertical, drives.vertical.is_some(), cfg);
    }
}

/// One tick of the per-axis speed curve.
///
/// Driven: multiplicative growth, clamped at `max_speed`, never overshooting
/// and never decaying while held. Released: an instant snap back to
/// `base_speed`, not a ramp-down.
pub fn advance_axis(speed: f32, driven: bool, cfg: &NoClipConfig) -> f32 {
    if !driven {
        return cfg.base_speed;
    }
    if speed >= cfg.max_speed {
        return speed;
    }
    (speed * cfg.acceleration_factor).min(cfg.max_speed)
}

/// Left-pointing strafe basis: the camera's horizontal forward components
/// rotated 90° about the world vertical axis.
///
/// Unnormalized: its magnitude shrinks as the camera pitches toward
/// vertical, and strafing never changes altitude.
pub fn strafe_basis(forward: Vec3) -> Vec3 {
    Vec3::new(forward.z, 0.0, -forward.x)
}

/// Sums the three axis contributions into a single position delta.
///
/// Forward displacement follows the full 3D camera direction; strafe moves
/// along [`strafe_basis`]; vertical moves purely along world Y regardless of
/// where the camera points.
pub fn compose_delta(
    forward_dir: Vec3,
    drives: DriveSet,
    speeds: &MovementState,
    multiplier: f32,
) -> Vec3 {
    let mut delta = Vec3::ZERO;
    if let Some(drive) = drives.forward {
        delta += forward_dir * speeds.forward * multiplier * drive.sign();
    }
    if let Some(drive) = drives.strafe {
        delta += strafe_basis(forward_dir) * speeds.strafe * multiplier * drive.sign();
    }
    if let Some(drive) = drives.vertical {
        delta.y += speeds.vertical * multiplier * drive.sign();
    }
    delta
}
