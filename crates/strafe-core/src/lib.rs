//! Strafe Core - Shared types for the Strafe movement controller
//!
//! This crate provides the foundational pieces used by the solver and
//! state machines:
//! - Tunable movement parameters with one-time unit resolution
//! - Tick-sampled countdown timers (crouch transitions)
//! - Math helpers (horizontal projection, slope angle)

pub mod math;
pub mod params;
pub mod timer;

pub use glam::{Vec2, Vec3};
pub use math::{horizontal, surface_angle};
pub use params::{ConfigError, MovementParams};
pub use timer::Countdown;
