//! GPU render pass for one pipeline variant.
//!
//! A [`ShadingPass`] is the bound, ready-to-draw form of a
//! [`PipelineVariant`]: its shader module, a uniform buffer sized to that
//! variant's block, and a render pipeline built against that variant's vertex
//! layout.
//!
//! # Bindings
//!
//! - **Group 0, binding 0**: the variant's uniform block, visible to the
//!   vertex stage. The layout entry declares the block's exact size as its
//!   minimum binding size, so wgpu's own validation also rejects a buffer that
//!   is too small for the shader.
//! - **Vertex buffer 0**: [`PositionVertex::LAYOUT`](crate::PositionVertex::LAYOUT)
//!   or [`PositionNormalVertex::LAYOUT`](crate::PositionNormalVertex::LAYOUT).
//!
//! # Usage
//!
//! 1. Call [`ensure_depth_size`](ShadingPass::ensure_depth_size) when the
//!    window may have resized.
//! 2. Begin a render pass with [`depth_view`](ShadingPass::depth_view) as
//!    the depth attachment.
//! 3. Call [`draw`](ShadingPass::draw) with the uniforms and mesh.
//!
//! The uniform buffer is rewritten on every draw, so only the last draw
//! recorded against a pass within one submission sees its own uniforms.
//! One draw per pass per frame is the intended use.

use crate::error::BindingMismatch;
use crate::gpu::GpuContext;
use crate::mesh::Mesh;
use crate::pipeline::{PipelineVariant, UniformBlock};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Pipeline, uniform buffer, and depth buffer for one variant.
pub struct ShadingPass {
    variant: PipelineVariant,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ShadingPass {
    pub fn new(gpu: &GpuContext, variant: PipelineVariant) -> Self {
        let device = &gpu.device;
        let uniform_layout = variant.uniform_layout();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(variant.name()),
            source: wgpu::ShaderSource::Wgsl(variant.shader_source().into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(uniform_layout.label),
            size: uniform_layout.size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(uniform_layout.size),
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shading Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(variant.name()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[variant.vertex_layout().buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!(
            "created {variant} pipeline ({} byte uniform block)",
            uniform_layout.size
        );

        Self {
            variant,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    pub fn variant(&self) -> PipelineVariant {
        self.variant
    }

    /// Depth attachment to use when beginning a render pass for this pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Records one draw of `mesh` with `uniforms`.
    ///
    /// The uniform block and the mesh's vertex layout are checked against this
    /// pass's variant first; on mismatch nothing is written or recorded.
    pub fn draw(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        uniforms: &UniformBlock,
        mesh: &Mesh,
    ) -> Result<(), BindingMismatch> {
        self.variant.check_bindings(uniforms, mesh.layout())?;

        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, uniforms.as_bytes());

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);

        Ok(())
    }
}
