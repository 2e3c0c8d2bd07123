//! GPU-resident meshes.
//!
//! A [`Mesh`] remembers which [`VertexLayout`] its vertex buffer was filled
//! with. [`ShadingPass::draw`](crate::ShadingPass::draw) compares that tag
//! against the pipeline before binding the buffer, so a position-only mesh can
//! never be fed to the normals pipeline.

use wgpu::util::DeviceExt;

use crate::flat::PositionVertex;
use crate::geometry::{self, Geometry};
use crate::gpu::GpuContext;
use crate::normals::PositionNormalVertex;
use crate::pipeline::VertexLayout;

/// Vertex and index buffers plus the layout they were built with.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    layout: VertexLayout,
}

impl Mesh {
    /// Uploads position-only vertices for the flat pipeline.
    pub fn from_positions(gpu: &GpuContext, vertices: &[PositionVertex], indices: &[u32]) -> Self {
        Self::upload(gpu, bytemuck::cast_slice(vertices), indices, VertexLayout::Position)
    }

    /// Uploads position+normal vertices for the normals pipeline.
    pub fn from_positions_normals(
        gpu: &GpuContext,
        vertices: &[PositionNormalVertex],
        indices: &[u32],
    ) -> Self {
        Self::upload(
            gpu,
            bytemuck::cast_slice(vertices),
            indices,
            VertexLayout::PositionNormal,
        )
    }

    /// Unit cube in the requested layout.
    pub fn cube(gpu: &GpuContext, layout: VertexLayout) -> Self {
        match layout {
            VertexLayout::Position => {
                let Geometry { vertices, indices } = geometry::cube_positions();
                Self::from_positions(gpu, &vertices, &indices)
            }
            VertexLayout::PositionNormal => {
                let Geometry { vertices, indices } = geometry::cube_with_normals();
                Self::from_positions_normals(gpu, &vertices, &indices)
            }
        }
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    fn upload(gpu: &GpuContext, vertex_bytes: &[u8], indices: &[u32], layout: VertexLayout) -> Self {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "uploaded {layout} mesh: {} bytes of vertices, {} indices",
            vertex_bytes.len(),
            indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            layout,
        }
    }
}
