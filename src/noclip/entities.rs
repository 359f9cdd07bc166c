use bevy::prelude::*;

use super::services::Action;

/// Marker on the dedicated camera spawned for the duration of one flight
/// session. Exists iff flight is active and acquisition succeeded.
#[derive(Component, Reflect)]
pub struct FlightCamera;

/// Physical key bound to each logical flight control.
///
/// The controller core only ever sees [`Action`]s; rebinding happens here
/// without touching the flight model.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct KeyBindings {
    /// Flips flight on/off (down-edge only).
    pub toggle: KeyCode,
    /// Fly along the camera direction.
    pub forward: KeyCode,
    /// Fly against the camera direction.
    pub backward: KeyCode,
    /// Strafe left.
    pub strafe_left: KeyCode,
    /// Strafe right.
    pub strafe_right: KeyCode,
    /// Climb.
    pub ascend: KeyCode,
    /// Sink.
    pub descend: KeyCode,
    /// Fast speed modifier.
    pub fast: KeyCode,
    /// Slow speed modifier.
    pub slow: KeyCode,
}

impl KeyBindings {
    /// The key currently bound to a logical control.
    pub fn key(&self, action: Action) -> KeyCode {
        match action {
            Action::Toggle => self.toggle,
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::StrafeLeft => self.strafe_left,
            Action::StrafeRight => self.strafe_right,
            Action::Ascend => self.ascend,
            Action::Descend => self.descend,
            Action::Fast => self.fast,
            Action::Slow => self.slow,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle: KeyCode::F2,
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            strafe_left: KeyCode::KeyA,
            strafe_right: KeyCode::KeyD,
            ascend: KeyCode::Space,
            descend: KeyCode::KeyC,
            fast: KeyCode::ShiftLeft,
            slow: KeyCode::AltLeft,
        }
    }
}
