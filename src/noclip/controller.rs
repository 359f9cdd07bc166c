//! The flight activation state machine.
//!
//! Two states, toggle-driven: off, or flying exactly one resolved target
//! with an acquired camera. All host access goes through the
//! [`super::services`] traits, so every transition below is exercised by the
//! scripted fakes in this module's tests.

use bevy::log::info;
use bevy::prelude::{Entity, Resource, Vec3};

use super::NoClipConfig;
use super::motion::{DriveSet, MovementState, compose_delta};
use super::services::{
    Action, CameraRig, GroundProbe, InputSource, Target, TargetGateway, TargetKind,
};

/// Orchestrates free flight: activation, per-tick movement, restoration.
///
/// Constructed once by the plugin and owned by the app as a resource; the
/// embedding application decides its lifetime, nothing here is global.
#[derive(Resource)]
pub struct NoClipController {
    cfg: NoClipConfig,
    active: bool,
    camera: Option<Entity>,
    target: Option<Target>,
    motion: MovementState,
}

impl NoClipController {
    /// Builds an inactive controller around a fixed config.
    pub fn new(cfg: NoClipConfig) -> Self {
        debug_assert!(cfg.base_speed > 0.0);
        debug_assert!(cfg.max_speed > cfg.base_speed);
        debug_assert!(cfg.acceleration_factor > 1.0);
        Self {
            motion: MovementState::at_base(&cfg),
            cfg,
            active: false,
            camera: None,
            target: None,
        }
    }

    /// Whether flight is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The entity being flown, if any.
    pub fn target(&self) -> Option<Target> {
        self.target
    }

    /// Flips the activation state, running the enable or disable transition.
    ///
    /// Enabling can fail (no target, no camera); failure leaves the
    /// controller inactive with nothing mutated, observable only through
    /// [`Self::is_active`].
    pub fn toggle(
        &mut self,
        rig: &mut impl CameraRig,
        gateway: &mut impl TargetGateway,
        ground: &impl GroundProbe,
    ) {
        if self.active {
            self.disable(rig, gateway, ground);
        } else {
            self.enable(rig, gateway);
        }
    }

    /// Forces flight off when the cached target no longer matches what a
    /// fresh resolution would pick (the player entered or left a vehicle
    /// mid-flight). Restoration runs against the *cached* target, since that
    /// is the entity whose state was altered at enable time.
    pub fn guard_target(
        &mut self,
        rig: &mut impl CameraRig,
        gateway: &mut impl TargetGateway,
        ground: &impl GroundProbe,
    ) {
        if !self.active {
            return;
        }
        if gateway.resolve() != self.target {
            info!("noclip: target changed, forcing off");
            self.disable(rig, gateway, ground);
        }
    }

    fn enable(&mut self, rig: &mut impl CameraRig, gateway: &mut impl TargetGateway) {
        let Some(target) = gateway.resolve() else {
            info!("noclip: no controllable target, staying off");
            return;
        };
        let Some(camera) = rig.acquire() else {
            info!("noclip: camera unavailable, staying off");
            return;
        };
        gateway.set_frozen(target, true);
        gateway.set_collision(target, false, false);
        self.motion = MovementState::at_base(&self.cfg);
        self.camera = Some(camera);
        self.target = Some(target);
        self.active = true;
        info!("noclip: on ({:?})", target.kind);
    }

    fn disable(
        &mut self,
        rig: &mut impl CameraRig,
        gateway: &mut impl TargetGateway,
        ground: &impl GroundProbe,
    ) {
        if !self.active {
            return;
        }
        self.active = false;
        let Some(target) = self.target.take() else {
            return;
        };
        gateway.set_frozen(target, false);
        gateway.set_collision(target, true, true);
        if target.kind == TargetKind::Player
            && let Some(pos) = gateway.position(target)
        {
            // The player may have been flown anywhere; park them on the
            // ground under their current spot rather than mid-air.
            let ground_y = ground.ground_height(pos.x, pos.z, pos.y);
            gateway.set_position(target, Vec3::new(pos.x, ground_y, pos.z));
        }
        self.motion = MovementState::at_base(&self.cfg);
        if let Some(camera) = self.camera.take() {
            rig.release(camera);
        }
        info!("noclip: off");
    }

    /// Frame guard: active, camera and target present, and past the tick
    /// throttle. Pure, no side effects.
    pub fn should_tick(&self, now_ms: u64) -> bool {
        self.active
            && self.camera.is_some()
            && self.target.is_some()
            && now_ms.saturating_sub(self.motion.last_update_ms)
                > u64::from(self.cfg.min_tick_interval_ms)
    }

    /// One movement step: read inputs and camera direction, advance the speed
    /// curve, write the new target position. No-op unless
    /// [`Self::should_tick`] passes; a failed camera or position read skips
    /// the frame without touching the speed curve.
    pub fn tick(
        &mut self,
        input: &impl InputSource,
        rig: &impl CameraRig,
        gateway: &mut impl TargetGateway,
        now_ms: u64,
    ) {
        if !self.should_tick(now_ms) {
            return;
        }
        let (Some(camera), Some(target)) = (self.camera, self.target) else {
            return;
        };
        self.motion.last_update_ms = now_ms;

        let Some(forward) = rig.forward(camera) else {
            return;
        };
        let Some(position) = gateway.position(target) else {
            return;
        };

        let drives = DriveSet::from_input(input);
        let multiplier = self
            .cfg
            .multipliers
            .select(input.held(Action::Slow), input.held(Action::Fast));
        let delta = compose_delta(forward, drives, &self.motion, multiplier);
        self.motion.advance(drives, &self.cfg);
        gateway.set_position(target, position + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::{Entity, World};
    use std::cell::Cell;

    // ── scripted service fakes ──────────────────────────────────────

    struct HeldKeys(Vec<Action>);

    impl InputSource for HeldKeys {
        fn held(&self, action: Action) -> bool {
            self.0.contains(&action)
        }
    }

    struct ScriptedRig {
        camera: Entity,
        fail_acquire: bool,
        acquires: u32,
        releases: Vec<Entity>,
        facing: Option<Vec3>,
    }

    impl CameraRig for ScriptedRig {
        fn acquire(&mut self) -> Option<Entity> {
            self.acquires += 1;
            if self.fail_acquire { None } else { Some(self.camera) }
        }

        fn release(&mut self, camera: Entity) {
            self.releases.push(camera);
        }

        fn forward(&self, _camera: Entity) -> Option<Vec3> {
            self.facing
        }
    }

    struct ScriptedWorld {
        target: Option<Target>,
        start: Vec3,
        writes: Vec<Vec3>,
        frozen_calls: Vec<bool>,
        collision_calls: Vec<(bool, bool)>,
        fail_position: bool,
    }

    impl TargetGateway for ScriptedWorld {
        fn resolve(&self) -> Option<Target> {
            self.target
        }

        fn position(&self, _target: Target) -> Option<Vec3> {
            if self.fail_position {
                return None;
            }
            Some(self.writes.last().copied().unwrap_or(self.start))
        }

        fn set_position(&mut self, _target: Target, position: Vec3) {
            self.writes.push(position);
        }

        fn set_frozen(&mut self, _target: Target, frozen: bool) {
            self.frozen_calls.push(frozen);
        }

        fn set_collision(&mut self, _target: Target, world: bool, entities: bool) {
            self.collision_calls.push((world, entities));
        }
    }

    struct FlatGround {
        height: f32,
        queries: Cell<u32>,
    }

    impl GroundProbe for FlatGround {
        fn ground_height(&self, _x: f32, _z: f32, _y_hint: f32) -> f32 {
            self.queries.set(self.queries.get() + 1);
            self.height
        }
    }

    fn test_cfg() -> NoClipConfig {
        NoClipConfig {
            base_speed: 2.0,
            max_speed: 8.0,
            acceleration_factor: 2.0,
            min_tick_interval_ms: 0,
            multipliers: super::super::SpeedMultipliers {
                slow: 0.5,
                normal: 1.0,
                fast: 2.0,
            },
            ..NoClipConfig::default()
        }
    }

    fn fixture(kind: TargetKind) -> (NoClipController, ScriptedRig, ScriptedWorld, FlatGround) {
        let mut world = World::new();
        let camera = world.spawn_empty().id();
        let entity = world.spawn_empty().id();
        let rig = ScriptedRig {
            camera,
            fail_acquire: false,
            acquires: 0,
            releases: vec![],
            facing: Some(Vec3::X),
        };
        let gateway = ScriptedWorld {
            target: Some(Target { entity, kind }),
            start: Vec3::new(10.0, 30.0, -4.0),
            writes: vec![],
            frozen_calls: vec![],
            collision_calls: vec![],
            fail_position: false,
        };
        let ground = FlatGround {
            height: 3.5,
            queries: Cell::new(0),
        };
        (NoClipController::new(test_cfg()), rig, gateway, ground)
    }

    // ── activation ──────────────────────────────────────────────────

    #[test]
    fn enable_freezes_and_fully_disables_collision() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        assert!(nc.is_active());
        assert_eq!(gw.frozen_calls, vec![true]);
        assert_eq!(gw.collision_calls, vec![(false, false)]);
    }

    #[test]
    fn camera_failure_aborts_with_no_entity_mutation() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        rig.fail_acquire = true;
        nc.toggle(&mut rig, &mut gw, &ground);
        assert!(!nc.is_active());
        assert!(gw.frozen_calls.is_empty(), "no freeze on failed enable");
        assert!(gw.collision_calls.is_empty(), "no collision change on failed enable");
    }

    #[test]
    fn missing_target_aborts_before_touching_the_camera() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        gw.target = None;
        nc.toggle(&mut rig, &mut gw, &ground);
        assert!(!nc.is_active());
        assert_eq!(rig.acquires, 0, "camera must not be acquired without a target");
    }

    #[test]
    fn toggle_twice_restores_inactive_state_and_base_speeds() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        nc.tick(&HeldKeys(vec![Action::Forward]), &rig, &mut gw, 1);
        nc.tick(&HeldKeys(vec![Action::Forward]), &rig, &mut gw, 2);
        nc.toggle(&mut rig, &mut gw, &ground);
        assert!(!nc.is_active());
        assert!(nc.target().is_none());
        assert_eq!(nc.motion.forward, 2.0);
        assert_eq!(nc.motion.strafe, 2.0);
        assert_eq!(nc.motion.vertical, 2.0);
        assert_eq!(rig.releases.len(), 1, "camera released exactly once");
    }

    // ── deactivation contract ───────────────────────────────────────

    #[test]
    fn disabling_bare_player_snaps_to_ground_once() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        nc.tick(&HeldKeys(vec![Action::Ascend]), &rig, &mut gw, 1);
        let flown = *gw.writes.last().unwrap();
        nc.toggle(&mut rig, &mut gw, &ground);

        assert_eq!(ground.queries.get(), 1, "exactly one ground query");
        let parked = *gw.writes.last().unwrap();
        assert_eq!(parked.x, flown.x);
        assert_eq!(parked.z, flown.z);
        assert_eq!(parked.y, 3.5, "player parked at the probed ground height");
    }

    #[test]
    fn disabling_vehicle_restores_flags_without_ground_snap() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Vehicle);
        nc.toggle(&mut rig, &mut gw, &ground);
        nc.toggle(&mut rig, &mut gw, &ground);

        assert_eq!(gw.frozen_calls, vec![true, false]);
        assert_eq!(gw.collision_calls, vec![(false, false), (true, true)]);
        assert_eq!(ground.queries.get(), 0, "vehicles are never ground-snapped");
        assert!(gw.writes.is_empty(), "no position write on vehicle disable");
    }

    #[test]
    fn forced_disable_on_occupancy_change_restores_cached_target() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);

        // Player hops into a vehicle mid-flight: resolution now disagrees.
        let mut world = World::new();
        gw.target = Some(Target {
            entity: world.spawn_empty().id(),
            kind: TargetKind::Vehicle,
        });
        nc.guard_target(&mut rig, &mut gw, &ground);

        assert!(!nc.is_active());
        assert_eq!(gw.frozen_calls, vec![true, false]);
        // Restoration ran the player path, ground snap included.
        assert_eq!(ground.queries.get(), 1);
    }

    #[test]
    fn guard_is_a_no_op_while_resolution_matches() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        nc.guard_target(&mut rig, &mut gw, &ground);
        assert!(nc.is_active());
        assert_eq!(ground.queries.get(), 0);
    }

    // ── tick throttle ───────────────────────────────────────────────

    #[test]
    fn tick_respects_the_minimum_interval() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.cfg.min_tick_interval_ms = 10;
        nc.toggle(&mut rig, &mut gw, &ground);
        let keys = HeldKeys(vec![Action::Forward]);

        nc.tick(&keys, &rig, &mut gw, 5);
        assert!(gw.writes.is_empty(), "5 ms since start is inside the throttle");
        nc.tick(&keys, &rig, &mut gw, 11);
        assert_eq!(gw.writes.len(), 1);
        nc.tick(&keys, &rig, &mut gw, 15);
        assert_eq!(gw.writes.len(), 1, "4 ms after a tick is inside the throttle");
        nc.tick(&keys, &rig, &mut gw, 22);
        assert_eq!(gw.writes.len(), 2);
    }

    #[test]
    fn should_tick_is_false_while_inactive() {
        let (nc, _rig, _gw, _ground) = fixture(TargetKind::Player);
        assert!(!nc.should_tick(1_000));
    }

    // ── movement integration ────────────────────────────────────────

    #[test]
    fn held_axis_compounds_speed_each_tick() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        let keys = HeldKeys(vec![Action::Forward]);

        // camera faces +X; speeds 2, 4, 8 (clamped) over three ticks
        for now in 1..=3 {
            nc.tick(&keys, &rig, &mut gw, now);
        }
        let xs: Vec<f32> = gw.writes.iter().map(|w| w.x - gw.start.x).collect();
        assert_eq!(xs, vec![2.0, 6.0, 14.0]);
        assert_eq!(nc.motion.forward, 8.0);
    }

    #[test]
    fn releasing_an_axis_resets_it_to_base_next_tick() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        nc.tick(&HeldKeys(vec![Action::Forward]), &rig, &mut gw, 1);
        nc.tick(&HeldKeys(vec![Action::Forward]), &rig, &mut gw, 2);
        assert_eq!(nc.motion.forward, 8.0);
        nc.tick(&HeldKeys(vec![]), &rig, &mut gw, 3);
        assert_eq!(nc.motion.forward, 2.0, "release snaps straight back to base");
    }

    #[test]
    fn failed_camera_read_skips_the_frame_without_advancing_speed() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        rig.facing = None;
        nc.tick(&HeldKeys(vec![Action::Forward]), &rig, &mut gw, 1);
        assert!(gw.writes.is_empty());
        assert_eq!(nc.motion.forward, 2.0, "speed curve untouched on a skipped frame");
    }

    #[test]
    fn failed_position_read_skips_the_frame() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.toggle(&mut rig, &mut gw, &ground);
        gw.fail_position = true;
        nc.tick(&HeldKeys(vec![Action::Forward]), &rig, &mut gw, 1);
        assert!(gw.writes.is_empty());
    }

    #[test]
    fn sixty_tick_forward_run_matches_reference_sum() {
        let (mut nc, mut rig, mut gw, ground) = fixture(TargetKind::Player);
        nc.cfg.acceleration_factor = 1.025;
        nc.cfg.multipliers.slow = 0.2;
        gw.start = Vec3::ZERO;
        nc.toggle(&mut rig, &mut gw, &ground);

        let keys = HeldKeys(vec![Action::Forward, Action::Slow]);
        for now in 1..=60 {
            nc.tick(&keys, &rig, &mut gw, now);
        }

        let expected: f64 = (0..60)
            .map(|i| (2.0_f64 * 1.025_f64.powi(i)).min(8.0) * 0.2)
            .sum();
        let travelled = f64::from(gw.writes.last().unwrap().x);
        assert!(
            (travelled - expected).abs() < 1e-2,
            "travelled {travelled}, reference {expected}"
        );
    }
}
