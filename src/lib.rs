//! # Lanthorn
//!
//! **The transform and shading core of a minimal wgpu renderer.**
//!
//! Two pipelines share one contract: the host hands over 4×4 matrices, the
//! position stage maps object-space vertices to clip space, and the color
//! stage turns interpolated outputs into a pixel color.
//!
//! | Pipeline | Uniforms | Vertex | Color |
//! |----------|----------|--------|-------|
//! | [`PipelineVariant::Flat`] | `transform` | position | solid red |
//! | [`PipelineVariant::Normals`] | `transform`, `transform_for_normals` | position, normal | the transformed normal as RGB |
//!
//! The normals pipeline transforms normals by their own matrix with `w = 0`.
//! Under non-uniform scale that matrix must be the inverse-transpose of the
//! model matrix; [`NormalUniforms::from_model`] and [`Transform::normal_matrix`]
//! build it.
//!
//! ## On the CPU
//!
//! The stages are plain functions, so the whole pass can be checked without a
//! GPU:
//!
//! ```
//! use lanthorn::*;
//!
//! let uniforms: UniformBlock = NormalUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY).into();
//! let corner = |n: [f32; 3]| VertexInput::from(PositionNormalVertex::new([0.0; 3], n));
//! let triangle = [corner([0.0, 1.0, 0.0]), corner([0.0, 1.0, 0.0]), corner([0.0, 1.0, 0.0])];
//!
//! let sample = PipelineVariant::Normals
//!     .shade_triangle(&uniforms, &triangle, Vec3::new(0.5, 0.25, 0.25))
//!     .unwrap();
//! assert_eq!(sample.color.g, 1.0);
//!
//! // A flat block bound to the normals pipeline is rejected up front.
//! let wrong: UniformBlock = FlatUniforms::new(Mat4::IDENTITY).into();
//! assert!(PipelineVariant::Normals.shade_triangle(&wrong, &triangle, Vec3::X).is_err());
//! ```
//!
//! ## On the GPU
//!
//! [`ShadingPass`] builds the wgpu pipeline for one variant from the WGSL in
//! [`flat::SHADER`] / [`normals::SHADER`]; [`run`] drives a window with both.

mod app;
mod camera;
mod color;
mod config;
mod error;
pub mod flat;
mod geometry;
mod gpu;
mod logging;
mod mesh;
pub mod normals;
mod pipeline;
mod shading_pass;
mod transform;
mod varying;

pub use app::run;
pub use camera::Camera;
pub use color::Color;
pub use config::{AppConfig, Args};
pub use error::{BindingMismatch, GpuError, ParseVariantError};
pub use flat::{FlatUniforms, FlatVarying, PositionVertex};
pub use geometry::{Geometry, cube_positions, cube_with_normals};
pub use gpu::GpuContext;
pub use logging::{LoggingConfig, init_logging};
pub use mesh::Mesh;
pub use normals::{NormalUniforms, NormalVarying, PositionNormalVertex};
pub use pipeline::{
    PipelineVariant, ShadedSample, UniformBlock, UniformLayout, VertexInput, VertexLayout,
};
pub use shading_pass::ShadingPass;
pub use transform::Transform;
pub use varying::Interpolate;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec3, Vec4};
