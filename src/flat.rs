//! The flat debug pipeline (variant A).
//!
//! Consumes a single `transform` and a position-only vertex, and paints every
//! covered pixel solid red. Useful for checking that geometry lands where it
//! should before anything fancier is involved.
//!
//! # Bindings
//!
//! | Binding | Contents |
//! |---------|----------|
//! | `@group(0) @binding(0)` | [`FlatUniforms`] (64 bytes) |
//! | vertex location 0 | `position: vec3<f32>` |
//!
//! The functions in this module compute exactly what `shaders/flat.wgsl`
//! computes on the GPU.

use glam::{Mat4, Vec3, Vec4};

use crate::color::Color;

/// WGSL source for the flat pipeline (`vs_main` / `fs_main`).
pub const SHADER: &str = include_str!("shaders/flat.wgsl");

/// The constant output of the flat color stage.
pub const FLAT_COLOR: Color = Color::RED;

/// Uniform block for the flat pipeline.
///
/// # WGSL Declaration
///
/// ```wgsl
/// struct Uniforms {
///     transform: mat4x4<f32>,
/// }
/// @group(0) @binding(0) var<uniform> uniforms: Uniforms;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlatUniforms {
    /// Object space to clip space, column-major.
    pub transform: [[f32; 4]; 4],
}

impl FlatUniforms {
    pub fn new(transform: Mat4) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }
}

/// A position-only vertex (12 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    /// Vertex buffer layout: position at location 0.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PositionVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    };

    pub fn new(position: [f32; 3]) -> Self {
        Self { position }
    }
}

/// Output of the flat position stage. Only the clip position is carried.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlatVarying {
    pub clip_position: Vec4,
}

/// Position stage: `transform × (position, 1)`.
pub fn vertex(uniforms: &FlatUniforms, vertex: &PositionVertex) -> FlatVarying {
    let position = Vec3::from(vertex.position);
    FlatVarying {
        clip_position: uniforms.transform() * position.extend(1.0),
    }
}

/// Color stage. Ignores its input.
pub fn fragment(_varying: &FlatVarying) -> Color {
    FLAT_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Quat;

    #[test]
    fn identity_transform_passes_position_through() {
        let uniforms = FlatUniforms::new(Mat4::IDENTITY);
        for p in [[0.0, 0.0, 0.0], [1.5, -2.0, 3.25], [-0.5, 0.5, -0.5]] {
            let out = vertex(&uniforms, &PositionVertex::new(p));
            assert_eq!(out.clip_position, Vec4::new(p[0], p[1], p[2], 1.0));
        }
    }

    #[test]
    fn translation_moves_points() {
        let uniforms = FlatUniforms::new(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        let out = vertex(&uniforms, &PositionVertex::new([1.0, 1.0, 1.0]));
        assert_abs_diff_eq!(out.clip_position, Vec4::new(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn perspective_transform_writes_w() {
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let uniforms = FlatUniforms::new(proj);
        let out = vertex(&uniforms, &PositionVertex::new([0.0, 0.0, -5.0]));
        // Right-handed perspective puts the view depth into w.
        assert_abs_diff_eq!(out.clip_position.w, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn color_is_constant_for_any_transform() {
        let transforms = [
            Mat4::IDENTITY,
            Mat4::from_scale_rotation_translation(
                Vec3::new(2.0, 0.5, 1.0),
                Quat::from_rotation_y(0.7),
                Vec3::new(-3.0, 1.0, 9.0),
            ),
            Mat4::ZERO,
            Mat4::from_cols_array(&[f32::NAN; 16]),
        ];
        for t in transforms {
            let varying = vertex(&FlatUniforms::new(t), &PositionVertex::new([0.3, 0.2, 0.1]));
            assert_eq!(fragment(&varying), Color::rgba(1.0, 0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn singular_transform_degrades_silently() {
        let uniforms = FlatUniforms::new(Mat4::from_cols_array(&[f32::NAN; 16]));
        let out = vertex(&uniforms, &PositionVertex::new([1.0, 2.0, 3.0]));
        assert!(out.clip_position.is_nan());
    }

    #[test]
    fn uniform_block_is_one_mat4() {
        assert_eq!(std::mem::size_of::<FlatUniforms>(), 64);
        let t = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        let uniforms = FlatUniforms::new(t);
        let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));
        // Column-major: translation lives in the last column.
        assert_eq!(&bytes[12..16], &[4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(PositionVertex::LAYOUT.array_stride, 12);
        assert_eq!(PositionVertex::LAYOUT.attributes.len(), 1);
        assert_eq!(PositionVertex::LAYOUT.attributes[0].shader_location, 0);
    }

    #[test]
    fn shader_declares_expected_entry_points() {
        assert!(SHADER.contains("fn vs_main"));
        assert!(SHADER.contains("fn fs_main"));
        assert!(SHADER.contains("@group(0) @binding(0)"));
    }
}
