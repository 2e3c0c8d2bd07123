//! Varying interpolation.
//!
//! On the GPU, the rasterizer blends the three position-stage outputs of a
//! triangle before handing them to the color stage. [`Interpolate`] is the CPU
//! stand-in for that step, used when the stages are driven by
//! [`PipelineVariant::shade_triangle`](crate::PipelineVariant::shade_triangle).
//!
//! Interpolation is a plain weighted sum. Nothing is renormalized: blending two
//! unit normals that point in different directions yields a shorter vector, and
//! the color stage sees that shorter vector.

use glam::Vec3;

use crate::flat::FlatVarying;
use crate::normals::NormalVarying;

/// A stage output that can be blended across a triangle.
pub trait Interpolate: Sized {
    /// Blends `corners` with barycentric `weights` (`weights.x` for the first
    /// corner, and so on). Weights are not required to sum to one.
    fn interpolate(corners: &[Self; 3], weights: Vec3) -> Self;
}

impl Interpolate for FlatVarying {
    fn interpolate(corners: &[Self; 3], weights: Vec3) -> Self {
        FlatVarying {
            clip_position: corners[0].clip_position * weights.x
                + corners[1].clip_position * weights.y
                + corners[2].clip_position * weights.z,
        }
    }
}

impl Interpolate for NormalVarying {
    fn interpolate(corners: &[Self; 3], weights: Vec3) -> Self {
        NormalVarying {
            clip_position: corners[0].clip_position * weights.x
                + corners[1].clip_position * weights.y
                + corners[2].clip_position * weights.z,
            normal: corners[0].normal * weights.x
                + corners[1].normal * weights.y
                + corners[2].normal * weights.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    fn normal_varying(normal: Vec3) -> NormalVarying {
        NormalVarying {
            clip_position: Vec4::W,
            normal,
        }
    }

    #[test]
    fn corner_weight_selects_corner() {
        let corners = [
            normal_varying(Vec3::X),
            normal_varying(Vec3::Y),
            normal_varying(Vec3::Z),
        ];
        let at_second = NormalVarying::interpolate(&corners, Vec3::Y);
        assert_eq!(at_second.normal, Vec3::Y);
        assert_eq!(at_second.clip_position, Vec4::W);
    }

    #[test]
    fn blended_normals_shrink() {
        let corners = [
            normal_varying(Vec3::X),
            normal_varying(Vec3::Y),
            normal_varying(Vec3::Y),
        ];
        let mid = NormalVarying::interpolate(&corners, Vec3::new(0.5, 0.5, 0.0));
        assert_relative_eq!(mid.normal, Vec3::new(0.5, 0.5, 0.0));
        assert!(mid.normal.length() < 1.0);
    }

    #[test]
    fn flat_varying_blends_clip_position() {
        let corners = [
            FlatVarying {
                clip_position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            },
            FlatVarying {
                clip_position: Vec4::new(3.0, 0.0, 0.0, 1.0),
            },
            FlatVarying {
                clip_position: Vec4::new(0.0, 3.0, 0.0, 1.0),
            },
        ];
        let centroid = FlatVarying::interpolate(&corners, Vec3::splat(1.0 / 3.0));
        assert_relative_eq!(centroid.clip_position, Vec4::new(1.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
    }
}
