//! The normal-visualization pipeline (variant B).
//!
//! Positions go through `transform` exactly as in the flat pipeline. Normals go
//! through a *separate* matrix, `transform_for_normals`, with `w = 0` so that
//! translation has no effect on them. The color stage writes the transformed
//! normal straight out as RGB.
//!
//! # The normal matrix
//!
//! Normals are not points. Under a non-uniform scale, transforming a normal by
//! the model matrix tilts it away from the surface it belongs to. The matrix
//! that keeps normals perpendicular is the inverse-transpose of the model
//! matrix's linear part. Supplying it is the caller's job; the stages below
//! never derive it and never assume it equals `transform`.
//! [`NormalUniforms::from_model`] builds a correct block from a model and a
//! view-projection matrix.
//!
//! # What is *not* done here
//!
//! - The interpolated normal is not renormalized before use.
//! - Channels are not remapped from `[-1, 1]` to `[0, 1]` and not clamped.
//!
//! Both match `shaders/normals.wgsl`, which is the GPU half of this module.

use glam::{Mat4, Vec3, Vec4};

use crate::color::Color;

/// WGSL source for the normal-visualization pipeline (`vs_main` / `fs_main`).
pub const SHADER: &str = include_str!("shaders/normals.wgsl");

/// Uniform block for the normal-visualization pipeline.
///
/// Field order is part of the contract: `transform` first, then
/// `transform_for_normals`.
///
/// # WGSL Declaration
///
/// ```wgsl
/// struct Uniforms {
///     transform: mat4x4<f32>,
///     transform_for_normals: mat4x4<f32>,
/// }
/// @group(0) @binding(0) var<uniform> uniforms: Uniforms;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NormalUniforms {
    /// Object space to clip space, column-major.
    pub transform: [[f32; 4]; 4],
    /// Applied to normals with `w = 0`, column-major.
    pub transform_for_normals: [[f32; 4]; 4],
}

impl NormalUniforms {
    pub fn new(transform: Mat4, transform_for_normals: Mat4) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            transform_for_normals: transform_for_normals.to_cols_array_2d(),
        }
    }

    /// Builds the block for a model placed under a camera.
    ///
    /// `transform` is `view_proj * model`; `transform_for_normals` is the
    /// inverse-transpose of `model`, so normals end up in world space.
    /// A singular `model` yields a non-finite normal matrix, which is passed
    /// along rather than rejected.
    pub fn from_model(view_proj: Mat4, model: Mat4) -> Self {
        Self::new(view_proj * model, model.inverse().transpose())
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }

    pub fn transform_for_normals(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform_for_normals)
    }
}

/// A vertex with position and normal (24 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PositionNormalVertex {
    pub position: [f32; 3],
    /// Expected to be unit length. Never renormalized.
    pub normal: [f32; 3],
}

impl PositionNormalVertex {
    /// Vertex buffer layout: position at location 0, normal at location 1.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PositionNormalVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Output of the normal position stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormalVarying {
    pub clip_position: Vec4,
    /// Transformed normal. Interpolated linearly by the rasterizer.
    pub normal: Vec3,
}

/// Position stage.
///
/// - clip position: `transform × (position, 1)`
/// - normal: `(transform_for_normals × (normal, 0)).xyz`
pub fn vertex(uniforms: &NormalUniforms, vertex: &PositionNormalVertex) -> NormalVarying {
    let position = Vec3::from(vertex.position);
    let normal = Vec3::from(vertex.normal);

    NormalVarying {
        clip_position: uniforms.transform() * position.extend(1.0),
        normal: (uniforms.transform_for_normals() * normal.extend(0.0)).truncate(),
    }
}

/// Color stage: `(normal.x, normal.y, normal.z, 1)`, unclamped.
pub fn fragment(varying: &NormalVarying) -> Color {
    Color::from(varying.normal.extend(1.0))
}
