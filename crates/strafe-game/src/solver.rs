//! Kinematic solver
//!
//! Per-tick velocity pipeline: wish direction, ground/edge friction, the
//! Quake-style acceleration clamp, wall sliding, step/slope traversal, and
//! gravity. The friction/acceleration core is pure over the kinematic
//! state; the probes take the physics world.

use glam::Vec3;
use rapier3d::parry::shape::{Ball, Capsule, Cylinder};

use strafe_core::{horizontal, surface_angle, MovementParams};
use strafe_physics::{CharacterBody, PhysicsWorld, SurfaceContact};

use crate::input::InputSnapshot;

/// Floor-height differences below this are treated as the same floor and
/// not re-snapped to.
const STEP_SNAP_EPSILON: f32 = 0.01;

/// The kinematic state owned exclusively by the movement controller and
/// mutated once per physics tick.
#[derive(Debug, Clone)]
pub struct KinematicState {
    /// Feet position (lowest point of the capsule).
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Desired horizontal movement direction, unit length or zero.
    pub wish_dir: Vec3,
    /// Result of this tick's ground test.
    pub grounded: bool,
    /// World Y of the last valid ground contact; NaN while airborne.
    pub floor_height: f32,
    /// Capsule height, mutated by the crouch states.
    pub collider_height: f32,
    /// Capsule radius.
    pub collider_radius: f32,
    /// Collision margin used to inflate probe motions.
    pub collider_margin: f32,
    /// State-dependent speed cap (walking vs crouching).
    pub max_ground_speed: f32,
    /// This tick's edge-friction multiplier.
    pub edge_friction: f32,
    /// Ticks left with friction suppressed (set to 1 on landing).
    pub skip_friction_ticks: u8,
}

impl KinematicState {
    pub fn new(params: &MovementParams) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            wish_dir: Vec3::ZERO,
            grounded: false,
            floor_height: f32::NAN,
            collider_height: params.height,
            collider_radius: params.radius,
            collider_margin: params.margin,
            max_ground_speed: params.max_walk_speed,
            edge_friction: 1.0,
            skip_friction_ticks: 0,
        }
    }

    /// Capsule center for the current dimensions.
    pub fn capsule_center(&self) -> Vec3 {
        self.position + Vec3::Y * (self.collider_height / 2.0)
    }

    /// Current horizontal speed.
    pub fn speed_2d(&self) -> f32 {
        horizontal(self.velocity).length()
    }
}

/// Outcome of the step/slope traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// No traversal; inject velocity normally.
    None,
    /// The body was repositioned; velocity injection must be suppressed
    /// this tick so displacement is not double-counted.
    Teleport(Vec3),
    /// A step-up candidate was too steep; lock the vertical axis this
    /// tick to keep from oscillating on and off the ledge.
    LockVertical,
}

/// Ground test shared by both state machines: at least one contact, not
/// moving upward, and some contact surface walkable.
pub fn ground_test(contacts: &[SurfaceContact], vertical_velocity: f32, max_walk_angle: f32) -> bool {
    if contacts.is_empty() || vertical_velocity > 0.0 {
        return false;
    }
    contacts
        .iter()
        .any(|contact| surface_angle(contact.normal, Vec3::Y) < max_walk_angle)
}

/// Whether a step candidate surface is walkable.
pub fn step_surface_walkable(normal: Vec3, params: &MovementParams) -> bool {
    surface_angle(normal, Vec3::Y) < params.max_walk_angle
}

/// Desired horizontal movement direction from the pressed move keys and
/// the flattened camera basis. Zero when no keys are pressed.
pub fn wish_dir(input: &InputSnapshot) -> Vec3 {
    let forward = input.camera_forward;
    let right = input.camera_right;

    let mut wish = Vec3::ZERO;
    if input.move_forward {
        wish += forward;
    }
    if input.move_backward {
        wish -= forward;
    }
    if input.strafe_left {
        wish -= right;
    }
    if input.strafe_right {
        wish += right;
    }
    wish.normalize_or_zero()
}

/// Ground friction. Speeds at or below the stop epsilon are zeroed
/// outright; otherwise deceleration scales with `max(stop_speed, speed)`
/// so low speeds still stop briskly. Suppressed for exactly one tick after
/// landing.
pub fn apply_friction(kin: &mut KinematicState, params: &MovementParams, dt: f32) {
    if kin.skip_friction_ticks > 0 {
        kin.skip_friction_ticks -= 1;
        return;
    }

    let speed = kin.speed_2d();
    if speed <= params.stop_epsilon {
        kin.velocity.x = 0.0;
        kin.velocity.z = 0.0;
        return;
    }

    // stop_speed only scales deceleration at low speeds.
    let control = params.stop_speed.max(speed);
    let dir = horizontal(kin.velocity) / speed;
    let decel = dir * (params.friction * kin.edge_friction * control * dt);

    let new_horizontal = horizontal(kin.velocity) - decel;
    // Deceleration past zero would reverse the velocity; hard-zero instead.
    if new_horizontal.dot(dir) <= 0.0 {
        kin.velocity.x = 0.0;
        kin.velocity.z = 0.0;
    } else {
        kin.velocity.x = new_horizontal.x;
        kin.velocity.z = new_horizontal.z;
    }
}

/// Quake-style acceleration: the current velocity is projected onto the
/// wish direction and only the shortfall up to the speed ceiling is added,
/// capped per tick. Airborne, the ceiling drops to `max_air_speed`, which
/// is what lets turning while airborne add speed (air strafing) without
/// the cap ever reducing it.
pub fn accelerate(kin: &mut KinematicState, params: &MovementParams, dt: f32) {
    let accel = kin.wish_dir * kin.max_ground_speed;
    let mut wish_speed = accel.length().min(params.max_walk_speed);
    if !kin.grounded {
        wish_speed = wish_speed.min(params.max_air_speed);
    }

    let projected = horizontal(kin.velocity).dot(kin.wish_dir);
    // Friction alone may reduce speed; acceleration never does.
    let add_speed = (wish_speed - projected).clamp(0.0, params.max_accel * dt);
    if add_speed > 0.0 {
        kin.velocity += kin.wish_dir * add_speed;
    }
}

/// Constant gravity while airborne.
pub fn apply_gravity(kin: &mut KinematicState, params: &MovementParams, dt: f32) {
    kin.velocity.y -= params.gravity * dt;
}

/// Edge-friction probe: a short ball cast ahead of the feet, downward. If
/// it finds open space where it expects floor, the tick's friction is
/// scaled up so players stop before sliding off the ledge. Only evaluated
/// while grounded.
pub fn edge_friction(
    world: &PhysicsWorld,
    body: &CharacterBody,
    kin: &KinematicState,
    params: &MovementParams,
) -> f32 {
    let dir = if kin.wish_dir != Vec3::ZERO {
        kin.wish_dir
    } else {
        horizontal(kin.velocity).normalize_or_zero()
    };
    if dir == Vec3::ZERO {
        return 1.0;
    }

    let probe = Ball::new(kin.collider_margin);
    let origin = kin.position
        + dir * (kin.collider_radius + 2.0 * kin.collider_margin)
        + Vec3::Y * 0.05;
    let cast = world.cast_shape_motion(
        &probe,
        origin,
        Vec3::NEG_Y * (params.max_step_height + 0.1),
        Some(body),
    );
    if cast.hit() {
        1.0
    } else {
        params.edge_friction_mult
    }
}

/// Wall slide: overlap a cylinder (inflated by the margin, shortened at
/// the bottom by the step height so climbable ledges don't count as walls)
/// and project the velocity onto the plane of every opposing contact.
pub fn wall_slide(
    world: &PhysicsWorld,
    body: &CharacterBody,
    kin: &mut KinematicState,
    params: &MovementParams,
) {
    let height = (kin.collider_height - params.max_step_height)
        .max(2.0 * kin.collider_radius + 0.01);
    let cylinder = Cylinder::new(height / 2.0, kin.collider_radius + kin.collider_margin);
    let center = kin.position + Vec3::Y * (params.max_step_height + height / 2.0);

    for contact in world.intersect_shape(&cylinder, center, Some(body)) {
        let normal = contact.normal;
        if normal.dot(kin.velocity) < 0.0 {
            kin.velocity -= normal * kin.velocity.dot(normal);
        }
    }
}

/// Step/slope traversal: sweep the collider up by the step allowance
/// (clamped by ceilings), forward by the proposed displacement (inflated
/// by the margin), then back down. A surface found above the starting
/// height is a step-up candidate, taken by teleport when walkable; an
/// unobstructed sweep falls back to a downward step probe while grounded.
pub fn attempt_step(
    world: &PhysicsWorld,
    body: &CharacterBody,
    kin: &KinematicState,
    params: &MovementParams,
    dt: f32,
) -> StepOutcome {
    let displacement = horizontal(kin.velocity) * dt;
    let length = displacement.length();
    if length <= f32::EPSILON {
        return StepOutcome::None;
    }
    let motion = displacement + (displacement / length) * kin.collider_margin;

    let shape = Capsule::new_y(
        params.capsule_half_height(kin.collider_height),
        kin.collider_radius,
    );
    let start = kin.capsule_center();

    let up = world.cast_shape_motion(&shape, start, Vec3::Y * params.max_step_height, Some(body));
    let rise = params.max_step_height * up.fraction;

    let raised = start + Vec3::Y * rise;
    let forward = world.cast_shape_motion(&shape, raised, motion, Some(body));
    let forward_end = raised + motion * forward.fraction;

    let down = world.cast_shape_motion(&shape, forward_end, Vec3::NEG_Y * rise, Some(body));

    let Some(down_normal) = down.normal else {
        // Sweep ended unobstructed: no step up. Probe a downward step
        // instead, but never while airborne.
        if !kin.grounded {
            return StepOutcome::None;
        }
        return attempt_step_down(world, body, kin, params, start + motion, &shape);
    };

    let landing = forward_end - Vec3::Y * (rise * down.fraction);
    let new_feet = landing - Vec3::Y * (kin.collider_height / 2.0);
    if new_feet.y - kin.position.y <= STEP_SNAP_EPSILON {
        // Came back down to the starting height: flat ground, no step.
        return StepOutcome::None;
    }

    if step_surface_walkable(down_normal, params) {
        StepOutcome::Teleport(new_feet)
    } else {
        StepOutcome::LockVertical
    }
}

fn attempt_step_down(
    world: &PhysicsWorld,
    body: &CharacterBody,
    kin: &KinematicState,
    params: &MovementParams,
    probe_from: Vec3,
    shape: &Capsule,
) -> StepOutcome {
    let probe = world.cast_shape_motion(
        shape,
        probe_from,
        Vec3::NEG_Y * params.max_step_height,
        Some(body),
    );
    let Some(normal) = probe.normal else {
        return StepOutcome::None;
    };
    if !step_surface_walkable(normal, params) {
        return StepOutcome::None;
    }

    let landing = probe_from - Vec3::Y * (params.max_step_height * probe.fraction);
    let new_feet = landing - Vec3::Y * (kin.collider_height / 2.0);
    // Skip the redundant re-snap when this is the floor we already stand on.
    if !kin.floor_height.is_nan() && (new_feet.y - kin.floor_height).abs() <= STEP_SNAP_EPSILON {
        return StepOutcome::None;
    }
    StepOutcome::Teleport(new_feet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier3d::prelude::{vector, ColliderBuilder, ColliderHandle};

    const DT: f32 = 1.0 / 60.0;

    fn params() -> MovementParams {
        MovementParams::default().resolve()
    }

    fn kin() -> KinematicState {
        KinematicState::new(&params())
    }

    fn contact(normal: Vec3) -> SurfaceContact {
        SurfaceContact {
            normal,
            point: Vec3::ZERO,
            collider: ColliderHandle::invalid(),
        }
    }

    #[test]
    fn test_wish_dir_zero_without_input() {
        let input = InputSnapshot {
            camera_forward: Vec3::NEG_Z,
            camera_right: Vec3::X,
            ..Default::default()
        };
        assert_eq!(wish_dir(&input), Vec3::ZERO);
    }

    #[test]
    fn test_wish_dir_diagonal_is_unit() {
        let input = InputSnapshot {
            move_forward: true,
            strafe_right: true,
            camera_forward: Vec3::NEG_Z,
            camera_right: Vec3::X,
            ..Default::default()
        };
        let wish = wish_dir(&input);
        assert!((wish.length() - 1.0).abs() < 1e-6);
        assert!(wish.x > 0.0 && wish.z < 0.0);
        assert_eq!(wish.y, 0.0);
    }

    #[test]
    fn test_wish_dir_opposed_keys_cancel() {
        let input = InputSnapshot {
            move_forward: true,
            move_backward: true,
            camera_forward: Vec3::NEG_Z,
            camera_right: Vec3::X,
            ..Default::default()
        };
        assert_eq!(wish_dir(&input), Vec3::ZERO);
    }

    #[test]
    fn test_ground_test() {
        let flat = [contact(Vec3::Y)];
        let wall = [contact(Vec3::X)];

        assert!(ground_test(&flat, 0.0, 45.0));
        assert!(ground_test(&flat, -3.0, 45.0));
        // Moving upward is never grounded.
        assert!(!ground_test(&flat, 0.1, 45.0));
        // A wall contact is not ground.
        assert!(!ground_test(&wall, 0.0, 45.0));
        assert!(!ground_test(&[], 0.0, 45.0));
    }

    #[test]
    fn test_friction_reduces_speed() {
        // velocity (5,0,0), friction 4, stop speed 1.1905, dt 1/60:
        // decel = 4 * max(1.1905, 5) / 60 = 0.3333.
        let params = params();
        let mut kin = kin();
        kin.grounded = true;
        kin.velocity = Vec3::new(5.0, 0.0, 0.0);

        apply_friction(&mut kin, &params, DT);
        let speed = kin.speed_2d();
        assert!(speed < 5.0);
        assert!((speed - (5.0 - 4.0 * 5.0 * DT)).abs() < 1e-4);

        // Re-acceleration on the same tick moves speed back toward the cap.
        kin.wish_dir = Vec3::X;
        accelerate(&mut kin, &params, DT);
        assert!(kin.speed_2d() > speed);
        assert!(kin.speed_2d() <= params.max_walk_speed);
    }

    #[test]
    fn test_friction_zeroes_below_stop_epsilon() {
        let params = params();
        let mut kin = kin();
        kin.velocity = Vec3::new(0.04, 0.0, 0.0);
        apply_friction(&mut kin, &params, DT);
        assert_eq!(kin.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_friction_never_reverses_velocity() {
        let params = params();
        let mut kin = kin();
        kin.edge_friction = 100.0; // enormous deceleration
        kin.velocity = Vec3::new(1.0, 0.0, 0.0);
        apply_friction(&mut kin, &params, DT);
        assert_eq!(horizontal(kin.velocity), Vec3::ZERO);
    }

    #[test]
    fn test_friction_skips_landing_tick_exactly_once() {
        let params = params();
        let mut kin = kin();
        kin.velocity = Vec3::new(5.0, 0.0, 0.0);
        kin.skip_friction_ticks = 1;

        apply_friction(&mut kin, &params, DT);
        assert_eq!(kin.velocity.x, 5.0);

        apply_friction(&mut kin, &params, DT);
        assert!(kin.velocity.x < 5.0);
    }

    #[test]
    fn test_friction_preserves_vertical_velocity() {
        let params = params();
        let mut kin = kin();
        kin.velocity = Vec3::new(0.01, -3.0, 0.0);
        apply_friction(&mut kin, &params, DT);
        assert_eq!(kin.velocity, Vec3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn test_accelerate_toward_cap_on_ground() {
        let params = params();
        let mut kin = kin();
        kin.grounded = true;
        kin.wish_dir = Vec3::X;

        accelerate(&mut kin, &params, DT);
        // One tick's worth of max accel: 100 / 60.
        assert!((kin.velocity.x - params.max_accel * DT).abs() < 1e-4);
    }

    #[test]
    fn test_accelerate_never_reduces_speed() {
        let params = params();
        let mut kin = kin();
        kin.grounded = true;
        kin.wish_dir = Vec3::X;
        kin.velocity = Vec3::new(30.0, 0.0, 0.0); // far above the cap

        accelerate(&mut kin, &params, DT);
        assert_eq!(kin.velocity.x, 30.0);
    }

    #[test]
    fn test_air_strafe_clamp() {
        // Airborne with wish orthogonal to velocity: the added speed is
        // capped at max_air_speed, so the resultant never exceeds
        // sqrt(speed^2 + max_air_speed^2).
        let params = params();
        let mut kin = kin();
        kin.grounded = false;
        kin.velocity = Vec3::new(5.0, 0.0, 0.0);
        kin.wish_dir = Vec3::Z;

        accelerate(&mut kin, &params, DT);
        assert!(kin.velocity.z <= params.max_air_speed + 1e-6);
        let bound = (5.0_f32.powi(2) + params.max_air_speed.powi(2)).sqrt();
        assert!(kin.speed_2d() <= bound + 1e-6);
    }

    #[test]
    fn test_air_accel_repeated_gains_speed() {
        // Chained orthogonal wishes keep adding speed: the bunnyhop.
        let params = params();
        let mut kin = kin();
        kin.grounded = false;
        kin.velocity = Vec3::new(5.0, 0.0, 0.0);

        for _ in 0..60 {
            let side = horizontal(kin.velocity)
                .normalize_or_zero()
                .cross(Vec3::Y);
            kin.wish_dir = side;
            accelerate(&mut kin, &params, DT);
        }
        assert!(kin.speed_2d() > 5.0);
    }

    #[test]
    fn test_gravity_integrates() {
        let params = params();
        let mut kin = kin();
        apply_gravity(&mut kin, &params, DT);
        assert!((kin.velocity.y + params.gravity * DT).abs() < 1e-6);
    }

    #[test]
    fn test_step_surface_walkable_gate() {
        let params = params();
        assert!(step_surface_walkable(Vec3::Y, &params));
        // A 50-degree surface normal reads past the walk-angle threshold.
        let steep = Vec3::new(0.0, 50.0_f32.to_radians().cos(), 50.0_f32.to_radians().sin());
        assert!(!step_surface_walkable(steep, &params));
        assert!(!step_surface_walkable(Vec3::X, &params));
    }

    // World-backed probes.

    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        // Floor top at y = 0, spanning x in [-5, 5].
        world.create_static_box(Vec3::new(5.0, 0.5, 5.0), Vec3::new(0.0, -0.5, 0.0));
        world.refresh_queries();
        world
    }

    #[test]
    fn test_step_up_onto_low_ledge() {
        let params = params();
        let mut world = world_with_floor();
        // Ledge top at y = 0.2, near face at x = 0.5.
        world.create_static_box(Vec3::new(1.0, 0.1, 1.0), Vec3::new(1.5, 0.1, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::new(0.4, 0.0, 0.0), 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        kin.position = Vec3::new(0.4, 0.0, 0.0);
        kin.floor_height = 0.0;
        kin.velocity = Vec3::new(12.0, 0.0, 0.0);

        match attempt_step(&world, &body, &kin, &params, DT) {
            StepOutcome::Teleport(feet) => {
                assert!((feet.y - 0.2).abs() < 0.02);
                assert!(feet.x > kin.position.x);
            }
            other => panic!("expected step-up teleport, got {:?}", other),
        }
    }

    #[test]
    fn test_no_step_on_flat_ground() {
        let params = params();
        let mut world = world_with_floor();
        let body = world.spawn_character(Vec3::ZERO, 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        kin.floor_height = 0.0;
        kin.velocity = Vec3::new(5.0, 0.0, 0.0);

        assert_eq!(attempt_step(&world, &body, &kin, &params, DT), StepOutcome::None);
    }

    #[test]
    fn test_tall_wall_is_not_a_step() {
        let params = params();
        let mut world = world_with_floor();
        // Wall front face at x = 0.5, top far above the step allowance.
        world.create_static_box(Vec3::new(1.0, 2.0, 5.0), Vec3::new(1.5, 2.0, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::new(0.05, 0.0, 0.0), 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        kin.position = Vec3::new(0.05, 0.0, 0.0);
        kin.floor_height = 0.0;
        kin.velocity = Vec3::new(12.0, 0.0, 0.0);

        // The sweep comes back down to the starting height beside the
        // wall: no teleport, velocity left for the wall slide to handle.
        assert_eq!(attempt_step(&world, &body, &kin, &params, DT), StepOutcome::None);
    }

    #[test]
    fn test_steep_ramp_locks_vertical_instead_of_teleporting() {
        let params = params();
        let mut world = world_with_floor();
        // A slab tilted 60 degrees from horizontal rising out of the
        // floor just ahead; its surface normal (y = cos 60) is far past
        // the walk-angle threshold. The down cast lands on it above the
        // starting height, so it is a step-up candidate, but it must
        // never be climbed.
        let ramp = ColliderBuilder::cuboid(2.0, 0.1, 2.0)
            .translation(vector![0.5366, -0.05, 0.0])
            .rotation(vector![0.0, 0.0, 60.0_f32.to_radians()])
            .build();
        world.add_static_collider(ramp);
        world.refresh_queries();
        let body = world.spawn_character(Vec3::ZERO, 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        kin.floor_height = 0.0;
        kin.velocity = Vec3::new(12.0, 0.0, 0.0);

        assert_eq!(
            attempt_step(&world, &body, &kin, &params, DT),
            StepOutcome::LockVertical
        );
    }

    #[test]
    fn test_step_down_off_ledge() {
        let params = params();
        let mut world = PhysicsWorld::new();
        // High floor top 0 for x < 0.5, low floor top -0.2 beyond.
        world.create_static_box(Vec3::new(2.5, 0.5, 5.0), Vec3::new(-2.0, -0.5, 0.0));
        world.create_static_box(Vec3::new(5.0, 0.5, 5.0), Vec3::new(5.5, -0.7, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::new(1.2, 0.0, 0.0), 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        // Just walked past the edge: feet still at the old floor height.
        kin.position = Vec3::new(1.2, 0.0, 0.0);
        kin.floor_height = 0.0;
        kin.velocity = Vec3::new(12.0, 0.0, 0.0);

        match attempt_step(&world, &body, &kin, &params, DT) {
            StepOutcome::Teleport(feet) => {
                assert!((feet.y + 0.2).abs() < 0.02);
            }
            other => panic!("expected step-down teleport, got {:?}", other),
        }
    }

    #[test]
    fn test_step_down_skipped_while_airborne() {
        let params = params();
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(2.5, 0.5, 5.0), Vec3::new(-2.0, -0.5, 0.0));
        world.create_static_box(Vec3::new(5.0, 0.5, 5.0), Vec3::new(5.5, -0.7, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::new(1.2, 0.0, 0.0), 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = false;
        kin.position = Vec3::new(1.2, 0.0, 0.0);
        kin.velocity = Vec3::new(12.0, 0.0, 0.0);

        assert_eq!(attempt_step(&world, &body, &kin, &params, DT), StepOutcome::None);
    }

    #[test]
    fn test_step_down_does_not_resnap_same_floor() {
        let params = params();
        let mut world = world_with_floor();
        let body = world.spawn_character(Vec3::ZERO, 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        kin.floor_height = 0.0;
        kin.velocity = Vec3::new(5.0, 0.0, 0.0);

        // The downward probe finds the floor we already stand on; the
        // height matches floor_height, so no redundant teleport.
        assert_eq!(attempt_step(&world, &body, &kin, &params, DT), StepOutcome::None);
    }

    #[test]
    fn test_wall_slide_projects_velocity() {
        let params = params();
        let mut world = world_with_floor();
        // Wall face at x = 0.42, just inside the inflated cylinder radius.
        world.create_static_box(Vec3::new(0.5, 2.0, 5.0), Vec3::new(0.92, 2.0, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::ZERO, 1.8, 0.4);

        let mut kin = kin();
        kin.velocity = Vec3::new(5.0, 0.0, 2.0);
        wall_slide(&world, &body, &mut kin, &params);

        // The X component into the wall is removed; Z is preserved.
        assert!(kin.velocity.x.abs() < 1e-4);
        assert!((kin.velocity.z - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_wall_slide_ignores_receding_contacts() {
        let params = params();
        let mut world = world_with_floor();
        world.create_static_box(Vec3::new(0.5, 2.0, 5.0), Vec3::new(0.92, 2.0, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::ZERO, 1.8, 0.4);

        let mut kin = kin();
        kin.velocity = Vec3::new(-5.0, 0.0, 0.0); // moving away from the wall
        wall_slide(&world, &body, &mut kin, &params);
        assert_eq!(kin.velocity, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_edge_friction_near_ledge() {
        let params = params();
        let mut world = PhysicsWorld::new();
        // Narrow floor: top at y = 0, spanning x in [-0.5, 0.5].
        world.create_static_box(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, -0.5, 0.0));
        world.refresh_queries();
        let body = world.spawn_character(Vec3::ZERO, 1.8, 0.4);

        let mut kin = kin();
        kin.grounded = true;
        kin.wish_dir = Vec3::X;

        // Centered: the probe lands on floor.
        kin.position = Vec3::new(-0.4, 0.0, 0.0);
        assert_eq!(edge_friction(&world, &body, &kin, &params), 1.0);

        // At the ledge: the probe finds open space.
        kin.position = Vec3::new(0.3, 0.0, 0.0);
        assert_eq!(
            edge_friction(&world, &body, &kin, &params),
            params.edge_friction_mult
        );
    }

    #[test]
    fn test_edge_friction_without_direction() {
        let params = params();
        let world = PhysicsWorld::new();
        let body = CharacterBody {
            body: rapier3d::prelude::RigidBodyHandle::invalid(),
            collider: ColliderHandle::invalid(),
        };
        let kin = kin();
        assert_eq!(edge_friction(&world, &body, &kin, &params), 1.0);
    }
}
