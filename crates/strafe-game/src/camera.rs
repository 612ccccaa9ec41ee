//! First-person camera rig with mouse look
//!
//! Supplies the view basis vectors the wish direction is built from and
//! receives eye-height updates as the crouch states resize the collider.
//! Rendering itself lives with the host.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Horizontal look sensitivity, degrees per mouse unit
    pub horz_sens: f32,
    /// Vertical look sensitivity, degrees per mouse unit
    pub vert_sens: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            horz_sens: 0.5,
            vert_sens: 0.5,
        }
    }
}

/// First-person camera rig
pub struct CameraRig {
    /// Configuration
    pub config: CameraConfig,
    /// Yaw rotation in degrees (horizontal)
    pub yaw: f32,
    /// Pitch rotation in degrees (vertical), clamped to avoid flipping
    pub pitch: f32,
    /// Eye height above the feet, driven by the movement controller
    eye_height: f32,
}

impl CameraRig {
    /// Create a new camera rig
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    /// Create a camera rig with custom config
    pub fn with_config(config: CameraConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
            eye_height: 1.7,
        }
    }

    /// Apply a mouse motion delta to the look angles.
    pub fn apply_mouse(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.config.horz_sens;
        self.pitch -= delta.y * self.config.vert_sens;

        // Clamp camera to avoid flipping
        self.pitch = self.pitch.clamp(-89.0, 89.0);
    }

    /// The camera's forward direction
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let cos_pitch = pitch.cos();
        Vec3::new(
            yaw.sin() * cos_pitch,
            pitch.sin(),
            -yaw.cos() * cos_pitch,
        )
    }

    /// The camera's right direction
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Update the eye height (crouching lowers it).
    pub fn set_eye_height(&mut self, height: f32) {
        self.eye_height = height;
    }

    /// Eye height above the feet.
    pub fn eye_height(&self) -> f32 {
        self.eye_height
    }

    /// World-space eye position for a character standing at `feet`.
    pub fn eye_position(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::Y * self.eye_height
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamp() {
        let mut camera = CameraRig::new();
        camera.apply_mouse(Vec2::new(0.0, -10_000.0));
        assert_eq!(camera.pitch, 89.0);
        camera.apply_mouse(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn test_forward_right_orthogonal() {
        let mut camera = CameraRig::new();
        camera.apply_mouse(Vec2::new(123.0, 17.0));
        let dot = camera.forward().dot(camera.right());
        assert!(dot.abs() < 1e-5);
    }

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = CameraRig::new();
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_eye_position_tracks_height() {
        let mut camera = CameraRig::new();
        camera.set_eye_height(0.8);
        let eye = camera.eye_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(eye, Vec3::new(1.0, 2.8, 3.0));
    }
}
