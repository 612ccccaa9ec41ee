//! Movement controller
//!
//! Owns the character's kinematic state, both state machines, and the
//! per-tick pipeline: snapshot input, re-derive groundedness from last
//! step's contacts, resolve state transitions, run the velocity solver,
//! and hand the result to the physics body. Runs once per fixed physics
//! tick; the physics step itself happens outside, between ticks.

use glam::Vec3;
use tracing::{debug, trace};

use strafe_core::{ConfigError, Countdown, MovementParams};
use strafe_physics::{CharacterBody, PhysicsWorld};

use crate::camera::CameraRig;
use crate::console::ConsoleToggle;
use crate::hsm::{Hsm, HsmError};
use crate::input::{InputSnapshot, InputState};
use crate::solver::{self, KinematicState, StepOutcome};
use crate::states::{LocomotionState, StanceState};

/// Eye height sits this far below the top of the collider.
const EYE_OFFSET: f32 = 0.1;

/// One-tick movement events, cleared at the top of every tick. Consumers
/// (footstep audio, view bob, tests) read them after the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveEvents {
    /// Transitioned from airborne to grounded this tick.
    pub landed: bool,
    /// A jump fired this tick.
    pub jumped: bool,
    /// A jump's rising phase ended this tick.
    pub jump_apex: bool,
    /// Started falling this tick (from a jump apex or walking off a ledge).
    pub began_falling: bool,
}

impl MoveEvents {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Shared blackboard for both state machines. All per-state data lives
/// here rather than in the state identifiers.
#[derive(Debug, Clone)]
pub struct MoveContext {
    pub params: MovementParams,
    pub kin: KinematicState,
    pub input: InputSnapshot,
    pub events: MoveEvents,
    /// Whether a standing capsule currently fits above the feet.
    pub can_uncrouch: bool,
    /// True on the tick right after a jump fired; blocks autojump refire.
    pub jump_debounce: bool,
    pub jumped_last_tick: bool,
    /// Set when leaving the airborne branch, consumed by ground entry.
    pub left_air: bool,
    /// Set when leaving the rising jump phase, consumed by fall entry.
    pub exited_jump: bool,
    pub crouch_timer: Countdown,
    /// Crouch progress already covered when a transition state was
    /// entered by reversal; zero for a fresh transition.
    pub crouch_base: f32,
    /// Ticks spent in the current stance state.
    pub stance_ticks: u32,
    /// The collider height changed; the physics shape must be rebuilt.
    pub pending_resize: bool,
}

impl MoveContext {
    pub fn new(params: MovementParams) -> Self {
        Self {
            kin: KinematicState::new(&params),
            params,
            input: InputSnapshot::default(),
            events: MoveEvents::default(),
            can_uncrouch: true,
            jump_debounce: false,
            jumped_last_tick: false,
            left_air: false,
            exited_jump: false,
            crouch_timer: Countdown::start(0.0),
            crouch_base: 0.0,
            stance_ticks: 0,
            pending_resize: false,
        }
    }

    /// Total progress of the running crouch transition in [0, 1],
    /// including the portion inherited from a reversal.
    pub fn stance_progress(&self) -> f32 {
        self.crouch_base + (1.0 - self.crouch_base) * self.crouch_timer.progress()
    }
}

/// Read-only view of the controller for debug overlays.
#[derive(Debug, Clone)]
pub struct DebugSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub speed_2d: f32,
    pub grounded: bool,
    /// NaN while airborne.
    pub floor_height: f32,
    pub collider_height: f32,
    pub locomotion: String,
    pub stance: String,
}

/// The character movement controller.
pub struct MovementController {
    ctx: MoveContext,
    locomotion: Hsm<LocomotionState>,
    stance: Hsm<StanceState>,
    body: Option<CharacterBody>,
    draw_debug: bool,
}

impl MovementController {
    /// Validate and resolve the tuning parameters. Derived values (the
    /// acceleration scale) are resolved once here, never per tick.
    pub fn new(params: MovementParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            ctx: MoveContext::new(params.resolve()),
            locomotion: Hsm::new(),
            stance: Hsm::new(),
            body: None,
            draw_debug: false,
        })
    }

    /// Spawn the character with its feet at `feet` and enter the initial
    /// states.
    pub fn spawn(&mut self, world: &mut PhysicsWorld, feet: Vec3) -> Result<(), HsmError> {
        let body = world.spawn_character(feet, self.ctx.params.height, self.ctx.params.radius);
        world.refresh_queries();
        self.ctx.kin.position = feet;
        self.body = Some(body);
        self.locomotion.init(&mut self.ctx, LocomotionState::Ground)?;
        self.stance.init(&mut self.ctx, StanceState::Walk)?;
        debug!(?feet, "character spawned");
        Ok(())
    }

    /// Run one fixed movement tick. Call before stepping the physics
    /// world, so contacts read here come from the previous step.
    pub fn tick(
        &mut self,
        world: &mut PhysicsWorld,
        camera: &mut CameraRig,
        input: &InputState,
        dt: f32,
    ) -> Result<(), HsmError> {
        let Some(body) = self.body else {
            return Err(HsmError::NotInitialized);
        };
        let ctx = &mut self.ctx;

        ctx.input = InputSnapshot::capture(input, camera);
        ctx.events.clear();
        ctx.jump_debounce = ctx.jumped_last_tick;
        ctx.jumped_last_tick = false;

        // The body may have been pushed by the last physics step.
        ctx.kin.position = world.character_feet(&body, ctx.kin.collider_height);

        let contacts = world.body_contacts(&body);
        ctx.kin.grounded =
            solver::ground_test(&contacts, ctx.kin.velocity.y, ctx.params.max_walk_angle);
        ctx.can_uncrouch = Self::probe_uncrouch(world, &body, ctx);

        self.locomotion.process_transitions(ctx)?;
        self.stance.process_transitions(ctx)?;
        self.locomotion.update(ctx, dt);
        self.stance.update(ctx, dt);
        if ctx.events.jumped {
            // The jump must leave the ground branch this tick, not next,
            // or the solver would run one grounded tick with upward
            // velocity.
            ctx.kin.grounded = false;
            self.locomotion.process_transitions(ctx)?;
        }

        if ctx.pending_resize {
            ctx.pending_resize = false;
            world.resize_character(&body, ctx.kin.position, ctx.kin.collider_height, ctx.params.radius);
            world.refresh_queries();
        }
        camera.set_eye_height(ctx.kin.collider_height - EYE_OFFSET);

        ctx.kin.wish_dir = solver::wish_dir(&ctx.input);
        let on_ground = self.locomotion.is_in_state(LocomotionState::Ground);
        if on_ground {
            ctx.kin.edge_friction = solver::edge_friction(world, &body, &ctx.kin, &ctx.params);
            solver::apply_friction(&mut ctx.kin, &ctx.params, dt);
        }
        solver::accelerate(&mut ctx.kin, &ctx.params, dt);
        solver::wall_slide(world, &body, &mut ctx.kin, &ctx.params);
        if !on_ground {
            solver::apply_gravity(&mut ctx.kin, &ctx.params, dt);
        }

        match solver::attempt_step(world, &body, &ctx.kin, &ctx.params, dt) {
            StepOutcome::Teleport(feet) => {
                trace!(from = ?ctx.kin.position, to = ?feet, "step traversal");
                ctx.kin.position = feet;
                if on_ground {
                    ctx.kin.floor_height = feet.y;
                }
                world.set_body_translation(&body, feet, ctx.kin.collider_height);
                // The teleport already covered this tick's displacement;
                // injecting the velocity too would double it.
                world.set_body_velocity(&body, Vec3::ZERO);
            }
            StepOutcome::LockVertical => {
                ctx.kin.velocity.y = 0.0;
                world.set_body_velocity(&body, ctx.kin.velocity);
            }
            StepOutcome::None => {
                world.set_body_velocity(&body, ctx.kin.velocity);
            }
        }
        Ok(())
    }

    /// Whether a full-height capsule fits at the current feet position.
    /// Always true when already standing.
    fn probe_uncrouch(world: &PhysicsWorld, body: &CharacterBody, ctx: &MoveContext) -> bool {
        if ctx.kin.collider_height >= ctx.params.height {
            return true;
        }
        let shape = rapier3d::parry::shape::Capsule::new_y(
            ctx.params.capsule_half_height(ctx.params.height),
            ctx.params.radius,
        );
        // Lifted by the margin so resting ground contact doesn't read as
        // an obstruction.
        let center =
            ctx.kin.position + Vec3::Y * (ctx.params.margin + ctx.params.height / 2.0);
        world.intersect_shape(&shape, center, Some(body)).is_empty()
    }

    pub fn apply_console_toggle(&mut self, toggle: ConsoleToggle, enable: bool) {
        match toggle {
            ConsoleToggle::AutoJump => {
                self.ctx.params.autojump = enable;
                debug!(enable, "autojump toggled");
            }
            ConsoleToggle::DrawDebug => {
                self.draw_debug = enable;
                debug!(enable, "debug overlay toggled");
            }
        }
    }

    pub fn set_autojump(&mut self, enable: bool) {
        self.ctx.params.autojump = enable;
    }

    pub fn set_draw_debug(&mut self, enable: bool) {
        self.draw_debug = enable;
    }

    /// This tick's movement events.
    pub fn events(&self) -> MoveEvents {
        self.ctx.events
    }

    pub fn kinematics(&self) -> &KinematicState {
        &self.ctx.kin
    }

    pub fn params(&self) -> &MovementParams {
        &self.ctx.params
    }

    pub fn can_uncrouch(&self) -> bool {
        self.ctx.can_uncrouch
    }

    pub fn locomotion_stack(&self) -> String {
        self.locomotion.stack_string()
    }

    pub fn stance_stack(&self) -> String {
        self.stance.stack_string()
    }

    pub fn is_grounded(&self) -> bool {
        self.ctx.kin.grounded
    }

    /// Populated only while the debug overlay is enabled.
    pub fn debug_snapshot(&self) -> Option<DebugSnapshot> {
        if !self.draw_debug {
            return None;
        }
        Some(DebugSnapshot {
            position: self.ctx.kin.position,
            velocity: self.ctx.kin.velocity,
            speed_2d: self.ctx.kin.speed_2d(),
            grounded: self.ctx.kin.grounded,
            floor_height: self.ctx.kin.floor_height,
            collider_height: self.ctx.kin.collider_height,
            locomotion: self.locomotion.stack_string(),
            stance: self.stance.stack_string(),
        })
    }
}
