//! Math helpers shared by the solver and the ground test

use glam::Vec3;

/// Copy of a vector with its Y component zeroed.
///
/// The solver reasons about horizontal speed separately from vertical
/// velocity, so this shows up everywhere friction and acceleration do.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Angle metric between two vectors used for every walkability check:
/// `90 - degrees(dot(a, b) / (|a| |b|))`.
///
/// Lower values mean a more walkable surface relative to `b` (normally
/// world-up): flat ground reads ~32.7, a 45-degree slope ~49.5, a vertical
/// wall 90. Compared against `MovementParams::max_walk_angle`. This is the
/// tuned in-game metric, not the textbook `degrees(acos(dot))` slope angle.
///
/// Zero-length inputs yield 90.0 (never walkable) rather than NaN.
pub fn surface_angle(a: Vec3, b: Vec3) -> f32 {
    let len_product = a.length() * b.length();
    if len_product <= f32::EPSILON {
        return 90.0;
    }
    90.0 - (a.dot(b) / len_product).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_zeroes_y() {
        let v = horizontal(Vec3::new(1.0, 5.0, -2.0));
        assert_eq!(v, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_surface_angle_ordering() {
        let flat = surface_angle(Vec3::Y, Vec3::Y);
        let slope = surface_angle(Vec3::new(0.0, 0.7071, 0.7071), Vec3::Y);
        let wall = surface_angle(Vec3::Z, Vec3::Y);

        // Flat ground must read as more walkable than a 45-degree slope,
        // which must read as more walkable than a wall.
        assert!(flat < slope);
        assert!(slope < wall);
        assert!((wall - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_surface_angle_flat_is_walkable_at_default_threshold() {
        // Default max_walk_angle is 45; flat ground must pass it.
        assert!(surface_angle(Vec3::Y, Vec3::Y) < 45.0);
        // A 45-degree slope must not.
        assert!(surface_angle(Vec3::new(0.0, 0.7071, 0.7071), Vec3::Y) > 45.0);
    }

    #[test]
    fn test_surface_angle_zero_vector() {
        assert_eq!(surface_angle(Vec3::ZERO, Vec3::Y), 90.0);
    }
}
