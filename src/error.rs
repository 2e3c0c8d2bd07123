//! Error types.

use thiserror::Error;

use crate::pipeline::{PipelineVariant, VertexLayout};

/// A host bound resources that do not match the selected pipeline.
///
/// Raised before any stage runs or any draw command is encoded. Never
/// recovered from inside this crate: the draw is dropped and the host decides
/// what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingMismatch {
    #[error("{expected} pipeline cannot use the uniform block of the {found} pipeline")]
    Uniforms {
        expected: PipelineVariant,
        found: PipelineVariant,
    },

    #[error("{variant} pipeline expects {expected} vertices, got {found}")]
    Vertices {
        variant: PipelineVariant,
        expected: VertexLayout,
        found: VertexLayout,
    },
}

/// Errors that can occur while bringing up the GPU.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Unknown pipeline name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pipeline '{0}' (expected 'flat' or 'normals')")]
pub struct ParseVariantError(pub String);
