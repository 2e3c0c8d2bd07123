//! Model placement.
//!
//! [`Transform`] is where the two matrices of the normals pipeline come from:
//! [`Transform::matrix`] places points, [`Transform::normal_matrix`] places
//! normals. They only agree when the scale is uniform.
//!
//! ```
//! use lanthorn::{Transform, Vec3, Quat};
//!
//! let transform = Transform::new()
//!     .position(Vec3::new(0.0, 2.0, -5.0))
//!     .rotation(Quat::from_rotation_y(0.5))
//!     .scale(Vec3::new(2.0, 1.0, 1.0));
//!
//! let model = transform.matrix();
//! let normals = transform.normal_matrix();
//! assert_ne!(model, normals);
//! ```

use glam::{Mat4, Quat, Vec3};

/// Position, rotation, and scale of a model in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Per-axis scale. Anything but a uniform scale makes
    /// [`normal_matrix`](Self::normal_matrix) differ from [`matrix`](Self::matrix)
    /// in direction, not just length.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Model matrix, applied in SRT order (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Inverse-transpose of [`matrix`](Self::matrix).
    ///
    /// Translation ends up in the bottom row where it cannot touch a `w = 0`
    /// direction. A zero scale component makes this non-finite.
    pub fn normal_matrix(&self) -> Mat4 {
        self.matrix().inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_matrices() {
        let t = Transform::new();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
        assert_eq!(t.normal_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn builder_sets_fields() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).uniform_scale(2.0);
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn rotation_only_normal_matrix_equals_model() {
        let t = Transform::new().rotation(Quat::from_rotation_x(1.1));
        assert_relative_eq!(t.normal_matrix(), t.matrix(), epsilon = 1e-5);
    }

    #[test]
    fn non_uniform_scale_inverts_in_normal_matrix() {
        let t = Transform::new()
            .position(Vec3::new(5.0, -1.0, 0.0))
            .scale(Vec3::new(2.0, 1.0, 1.0));

        let n = t.normal_matrix().transform_vector3(Vec3::X);
        assert_relative_eq!(n, Vec3::new(0.5, 0.0, 0.0), epsilon = 1e-6);

        let p = t.matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p, Vec3::new(7.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn normal_matrix_keeps_translation_away_from_directions() {
        let t = Transform::from_position(Vec3::new(3.0, 4.0, 5.0));
        let n = t.normal_matrix() * Vec3::Y.extend(0.0);
        assert_relative_eq!(n.truncate(), Vec3::Y, epsilon = 1e-6);
    }
}
