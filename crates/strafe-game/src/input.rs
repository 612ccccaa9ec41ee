//! Input system with action-based mapping
//!
//! Provides an abstraction layer between raw input events and movement
//! actions, plus the frozen per-tick snapshot the solver and state
//! machines consume. The solver never polls input directly; it reads the
//! snapshot captured at the start of the tick.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use strafe_core::horizontal;

use crate::camera::CameraRig;

/// Movement actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Strafe left (A by default)
    StrafeLeft,
    /// Strafe right (D by default)
    StrafeRight,
    /// Jump (Space by default)
    Jump,
    /// Crouch (Left Ctrl by default)
    Crouch,
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Mouse movement delta for this frame
    pub mouse_delta: Vec2,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

/// Maps physical keys to movement actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<KeyCode, InputAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        // Default WASD bindings
        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::StrafeLeft);
        bindings.bind(KeyCode::KeyD, InputAction::StrafeRight);

        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ControlLeft, InputAction::Crouch);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(key, action);
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

/// Input handler that processes raw events and updates state
#[derive(Debug)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            bindings: InputBindings::default(),
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_key_action(key_code) {
                match element_state {
                    ElementState::Pressed => {
                        if !self.state.held.contains(&action) {
                            self.state.just_pressed.insert(action);
                        }
                        self.state.held.insert(action);
                    }
                    ElementState::Released => {
                        self.state.held.remove(&action);
                        self.state.just_released.insert(action);
                    }
                }
            }
        }
    }

    /// Handle mouse movement (raw delta; sensitivity is the camera's job)
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        self.state.mouse_delta += Vec2::new(delta.0 as f32, delta.1 as f32);
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }
}

/// The frozen view of one tick's input used by the solver and states.
///
/// Captured once at the top of the physics tick so every consumer sees the
/// same input and camera basis for the whole tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub move_forward: bool,
    pub move_backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub jump_pressed: bool,
    pub jump_just_pressed: bool,
    pub crouch_just_pressed: bool,
    /// Camera forward, already projected onto the horizontal plane.
    pub camera_forward: Vec3,
    /// Camera right, already projected onto the horizontal plane.
    pub camera_right: Vec3,
}

impl InputSnapshot {
    /// Capture this tick's input and camera basis.
    pub fn capture(state: &InputState, camera: &CameraRig) -> Self {
        Self {
            move_forward: state.is_held(InputAction::MoveForward),
            move_backward: state.is_held(InputAction::MoveBackward),
            strafe_left: state.is_held(InputAction::StrafeLeft),
            strafe_right: state.is_held(InputAction::StrafeRight),
            jump_pressed: state.is_held(InputAction::Jump),
            jump_just_pressed: state.is_just_pressed(InputAction::Jump),
            crouch_just_pressed: state.is_just_pressed(InputAction::Crouch),
            camera_forward: horizontal(camera.forward()).normalize_or_zero(),
            camera_right: horizontal(camera.right()).normalize_or_zero(),
        }
    }
}
