//! Strafe Game - Movement states and kinematic solver
//!
//! Provides the hierarchical state machine, the locomotion and stance
//! state sets, the Quake-style kinematic solver, input mapping, the
//! first-person camera rig, and the developer-console command surface.

pub mod camera;
pub mod console;
pub mod controller;
pub mod hsm;
pub mod input;
pub mod solver;
pub mod states;

pub use camera::{CameraConfig, CameraRig};
pub use console::{find_command, CommandSpec, ConsoleToggle, COMMANDS};
pub use controller::{DebugSnapshot, MoveContext, MoveEvents, MovementController};
pub use hsm::{Hsm, HsmError, HsmState, Transition};
pub use input::{InputAction, InputBindings, InputHandler, InputSnapshot, InputState};
pub use solver::{KinematicState, StepOutcome};
pub use states::{LocomotionState, StanceState};
