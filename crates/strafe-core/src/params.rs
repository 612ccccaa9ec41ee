//! Movement tunables
//!
//! All values are set once at initialization and treated as immutable for
//! the session. `resolve` performs the one-time conversion from the source
//! tuning units to simulation units.

use serde::{Deserialize, Serialize};

/// Movement parameters for the kinematic controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementParams {
    /// Top horizontal speed, in meters per second, reachable without
    /// movement tricks (bunnyhopping). See: sv_maxspeed
    pub max_walk_speed: f32,
    /// Top horizontal speed while crouched.
    pub max_crouch_speed: f32,
    /// Per-tick air acceleration ceiling. Keeping this well below the
    /// ground cap is what makes air strafing gain speed.
    pub max_air_speed: f32,
    /// How hard surfaces decelerate the player. See: sv_friction
    pub friction: f32,
    /// Friction multiplier applied near ledges to keep players from
    /// sliding off edges.
    pub edge_friction_mult: f32,
    /// Maximum acceleration per second, in units of max_walk_speed.
    /// Resolved to absolute units at init. See: sv_accelerate
    pub max_accel: f32,
    /// Scales deceleration at low speeds so the final stop is snappy.
    /// See: sv_stopspeed
    pub stop_speed: f32,
    /// Speeds at or below this are zeroed outright during friction.
    pub stop_epsilon: f32,
    /// Downward acceleration while airborne, meters per second squared.
    pub gravity: f32,
    /// Upward velocity added by a jump.
    pub jump_force: f32,
    /// Walkability threshold for the surface-angle metric, in degrees.
    pub max_walk_angle: f32,
    /// Tallest ledge the step traversal will climb, in meters.
    pub max_step_height: f32,
    /// Seconds to go from standing to crouched.
    pub crouch_time: f32,
    /// Seconds to go from crouched to standing.
    pub uncrouch_time: f32,
    /// Standing capsule height (meters).
    pub height: f32,
    /// Crouched capsule height (meters).
    pub crouch_height: f32,
    /// Capsule radius (meters).
    pub radius: f32,
    /// Collision margin used to inflate probe motions.
    pub margin: f32,
    /// Level-triggered jump while the key is held (with a one-tick
    /// debounce) instead of edge-triggered.
    pub autojump: bool,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            max_walk_speed: 10.0,
            max_crouch_speed: 3.5,
            max_air_speed: 0.9375,
            friction: 4.0,
            edge_friction_mult: 2.0,
            max_accel: 10.0,
            stop_speed: 1.1905,
            stop_epsilon: 0.05,
            gravity: 12.0,
            jump_force: 5.0,
            max_walk_angle: 45.0,
            max_step_height: 0.3,
            crouch_time: 0.25,
            uncrouch_time: 0.25,
            height: 1.8,
            crouch_height: 0.9,
            radius: 0.4,
            margin: 0.04,
            autojump: false,
        }
    }
}

impl MovementParams {
    /// Convert source tuning units to simulation units. Called exactly once
    /// when the controller is constructed; `max_accel` is authored relative
    /// to `max_walk_speed`.
    pub fn resolve(mut self) -> Self {
        self.max_accel *= self.max_walk_speed;
        self
    }

    /// Validate the configuration, failing fast instead of producing
    /// silent geometric penetration at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crouch_height <= 2.0 * (self.radius + self.margin) {
            return Err(ConfigError::CrouchHeightTooSmall {
                crouch_height: self.crouch_height,
                minimum: 2.0 * (self.radius + self.margin),
            });
        }
        if self.crouch_height >= self.height {
            return Err(ConfigError::CrouchHeightNotBelowStanding {
                crouch_height: self.crouch_height,
                height: self.height,
            });
        }
        if self.crouch_time <= 0.0 || self.uncrouch_time <= 0.0 {
            return Err(ConfigError::NonPositiveTiming);
        }
        if self.max_walk_speed <= 0.0 || self.max_crouch_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed);
        }
        if self.max_step_height >= self.crouch_height {
            return Err(ConfigError::StepHeightTooLarge {
                max_step_height: self.max_step_height,
                crouch_height: self.crouch_height,
            });
        }
        Ok(())
    }

    /// The half height of the capsule's cylindrical section for a given
    /// total height.
    pub fn capsule_half_height(&self, height: f32) -> f32 {
        ((height - 2.0 * self.radius) / 2.0).max(0.01)
    }
}

/// Errors produced by `MovementParams::validate`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("crouch height {crouch_height} must exceed capsule diameter + margin ({minimum})")]
    CrouchHeightTooSmall { crouch_height: f32, minimum: f32 },

    #[error("crouch height {crouch_height} must be below standing height {height}")]
    CrouchHeightNotBelowStanding { crouch_height: f32, height: f32 },

    #[error("crouch and uncrouch timings must be positive")]
    NonPositiveTiming,

    #[error("ground speeds must be positive")]
    NonPositiveSpeed,

    #[error("max step height {max_step_height} must stay below crouch height {crouch_height}")]
    StepHeightTooLarge {
        max_step_height: f32,
        crouch_height: f32,
    },
}
