//! Movement states
//!
//! Two orthogonal machines over the shared [`MoveContext`]: locomotion
//! (Ground, Air with Jump/Fall children) and stance (Walk, the timed
//! crouch transitions, Crouch). Neither machine touches the physics
//! world; they only mutate the context, and the controller applies the
//! results.

use strafe_core::Countdown;

use crate::controller::MoveContext;
use crate::hsm::{HsmState, Transition};

/// Vertical locomotion: grounded or airborne, with the airborne phase
/// split into the rising and falling halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionState {
    Ground,
    Air,
    /// Child of [`Air`](LocomotionState::Air) while moving upward.
    Jump,
    /// Child of [`Air`](LocomotionState::Air) once moving downward.
    Fall,
}

impl HsmState for LocomotionState {
    type Owner = MoveContext;

    fn on_enter(self, ctx: &mut MoveContext, _arg: Option<f32>) {
        match self {
            LocomotionState::Ground => {
                if ctx.left_air {
                    // Landing: kill the remaining fall velocity and give
                    // bunnyhoppers one friction-free tick.
                    ctx.left_air = false;
                    ctx.kin.velocity.y = 0.0;
                    ctx.kin.skip_friction_ticks = 1;
                    ctx.events.landed = true;
                }
                ctx.kin.floor_height = ctx.kin.position.y;
            }
            LocomotionState::Air => {
                ctx.kin.floor_height = f32::NAN;
            }
            LocomotionState::Jump => {}
            LocomotionState::Fall => {
                if ctx.exited_jump {
                    ctx.exited_jump = false;
                    ctx.events.jump_apex = true;
                }
                ctx.events.began_falling = true;
            }
        }
    }

    fn on_exit(self, ctx: &mut MoveContext) {
        match self {
            LocomotionState::Air => ctx.left_air = true,
            LocomotionState::Jump => ctx.exited_jump = true,
            _ => {}
        }
    }

    fn update(self, ctx: &mut MoveContext, _dt: f32) {
        if self != LocomotionState::Ground {
            return;
        }
        ctx.kin.floor_height = ctx.kin.position.y;

        let wants_jump = if ctx.params.autojump {
            // Held space re-jumps, but never on the tick right after a
            // jump fired, so each press lands on a fresh ground contact.
            ctx.input.jump_pressed && !ctx.jump_debounce
        } else {
            ctx.input.jump_just_pressed
        };
        if wants_jump {
            ctx.kin.velocity.y += ctx.params.jump_force;
            ctx.events.jumped = true;
            ctx.jumped_last_tick = true;
        }
    }

    fn transition(self, ctx: &MoveContext) -> Transition<Self> {
        match self {
            LocomotionState::Ground => {
                if !ctx.kin.grounded {
                    Transition::Sibling(LocomotionState::Air, None)
                } else {
                    Transition::None
                }
            }
            LocomotionState::Air => {
                if ctx.kin.grounded {
                    Transition::Sibling(LocomotionState::Ground, None)
                } else if ctx.kin.velocity.y > 0.0 {
                    Transition::InnerEntry(LocomotionState::Jump)
                } else {
                    Transition::InnerEntry(LocomotionState::Fall)
                }
            }
            LocomotionState::Jump => {
                if ctx.kin.velocity.y <= 0.0 {
                    Transition::Sibling(LocomotionState::Fall, None)
                } else {
                    Transition::None
                }
            }
            LocomotionState::Fall => Transition::None,
        }
    }
}

/// Stance: standing, crouched, and the timed transitions between them.
/// The transition states interpolate the collider height every tick and
/// support mid-flight reversal with progress carried over, so mashing
/// the crouch key never causes a height pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanceState {
    Walk,
    CrouchIn,
    Crouch,
    CrouchOut,
}

impl StanceState {
    /// Target collider height for a crouch progress in [0, 1], where 0 is
    /// fully standing and 1 is fully crouched.
    fn height_at(ctx: &MoveContext, crouch_progress: f32) -> f32 {
        let span = ctx.params.height - ctx.params.crouch_height;
        ctx.params.height - crouch_progress * span
    }
}

impl HsmState for StanceState {
    type Owner = MoveContext;

    fn on_enter(self, ctx: &mut MoveContext, arg: Option<f32>) {
        // A transition on the entry tick would re-read the key press that
        // caused this entry; the tick counter gates that.
        ctx.stance_ticks = 0;

        match self {
            StanceState::Walk => {
                ctx.kin.collider_height = ctx.params.height;
                ctx.kin.max_ground_speed = ctx.params.max_walk_speed;
                ctx.pending_resize = true;
            }
            StanceState::CrouchIn => {
                // A reversal hands over how far toward crouched we already
                // are; a fresh press starts from standing.
                ctx.crouch_base = arg.unwrap_or(0.0);
                ctx.crouch_timer =
                    Countdown::start(ctx.params.crouch_time * (1.0 - ctx.crouch_base));
                ctx.kin.max_ground_speed = ctx.params.max_crouch_speed;
            }
            StanceState::Crouch => {
                ctx.kin.collider_height = ctx.params.crouch_height;
                ctx.kin.max_ground_speed = ctx.params.max_crouch_speed;
                ctx.pending_resize = true;
            }
            StanceState::CrouchOut => {
                ctx.crouch_base = arg.unwrap_or(0.0);
                ctx.crouch_timer =
                    Countdown::start(ctx.params.uncrouch_time * (1.0 - ctx.crouch_base));
            }
        }
    }

    fn on_exit(self, _ctx: &mut MoveContext) {}

    fn update(self, ctx: &mut MoveContext, dt: f32) {
        ctx.stance_ticks += 1;

        match self {
            StanceState::CrouchIn => {
                ctx.crouch_timer.tick(dt);
                let progress = ctx.stance_progress();
                ctx.kin.collider_height = Self::height_at(ctx, progress);
                ctx.pending_resize = true;
            }
            StanceState::CrouchOut => {
                ctx.crouch_timer.tick(dt);
                // The out-timer's progress runs toward standing.
                let progress = 1.0 - ctx.stance_progress();
                ctx.kin.collider_height = Self::height_at(ctx, progress);
                ctx.pending_resize = true;
            }
            StanceState::Walk | StanceState::Crouch => {}
        }
    }

    fn transition(self, ctx: &MoveContext) -> Transition<Self> {
        let pressed = ctx.input.crouch_just_pressed && ctx.stance_ticks > 0;
        match self {
            StanceState::Walk => {
                if ctx.input.crouch_just_pressed {
                    Transition::Sibling(StanceState::CrouchIn, None)
                } else {
                    Transition::None
                }
            }
            StanceState::CrouchIn => {
                if pressed && ctx.can_uncrouch {
                    // Reverse mid-descent, carrying the height across.
                    let toward_standing = 1.0 - ctx.stance_progress();
                    Transition::Sibling(StanceState::CrouchOut, Some(toward_standing))
                } else if ctx.crouch_timer.finished() {
                    Transition::Sibling(StanceState::Crouch, None)
                } else {
                    Transition::None
                }
            }
            StanceState::Crouch => {
                if pressed && ctx.can_uncrouch {
                    Transition::Sibling(StanceState::CrouchOut, None)
                } else {
                    Transition::None
                }
            }
            StanceState::CrouchOut => {
                if pressed {
                    let toward_crouched = 1.0 - ctx.stance_progress();
                    Transition::Sibling(StanceState::CrouchIn, Some(toward_crouched))
                } else if ctx.crouch_timer.finished() {
                    Transition::Sibling(StanceState::Walk, None)
                } else {
                    Transition::None
                }
            }
        }
    }
}
