//! The demo host.
//!
//! Owns the window and everything the core treats as external: surface setup,
//! geometry upload, matrix construction, and the render loop. Each frame it
//! builds the uniform block for the selected variant and records one draw.
//!
//! Keys:
//! - `Escape` exits.
//! - `Tab` switches between the flat and normals pipelines. The switch takes
//!   effect on the next draw; a draw always runs through one variant.

use std::sync::Arc;
use std::time::Instant;

use glam::{Quat, Vec3};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::config::AppConfig;
use crate::flat::FlatUniforms;
use crate::gpu::GpuContext;
use crate::mesh::Mesh;
use crate::normals::NormalUniforms;
use crate::pipeline::{PipelineVariant, UniformBlock, VertexLayout};
use crate::shading_pass::ShadingPass;
use crate::transform::Transform;

/// Run the demo until the window is closed.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// Everything that needs a live window.
struct Renderer {
    window: Arc<Window>,
    gpu: GpuContext,
    flat_pass: ShadingPass,
    normals_pass: ShadingPass,
    flat_cube: Mesh,
    normals_cube: Mesh,
}

impl Renderer {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig) -> anyhow::Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let gpu = GpuContext::new(window.clone())?;

        Ok(Self {
            flat_pass: ShadingPass::new(&gpu, PipelineVariant::Flat),
            normals_pass: ShadingPass::new(&gpu, PipelineVariant::Normals),
            flat_cube: Mesh::cube(&gpu, VertexLayout::Position),
            normals_cube: Mesh::cube(&gpu, VertexLayout::PositionNormal),
            window,
            gpu,
        })
    }

    fn pass_and_mesh(&self, variant: PipelineVariant) -> (&ShadingPass, &Mesh) {
        match variant {
            PipelineVariant::Flat => (&self.flat_pass, &self.flat_cube),
            PipelineVariant::Normals => (&self.normals_pass, &self.normals_cube),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.flat_pass.ensure_depth_size(&self.gpu);
        self.normals_pass.ensure_depth_size(&self.gpu);
    }

    fn render(
        &self,
        config: &AppConfig,
        variant: PipelineVariant,
        uniforms: &UniformBlock,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (pass, mesh) = self.pass_and_mesh(variant);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shading Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(config.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: pass.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Err(err) = pass.draw(&self.gpu, &mut render_pass, uniforms, mesh) {
                log::error!("draw skipped: {err}");
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

struct App {
    config: AppConfig,
    variant: PipelineVariant,
    camera: Camera,
    start_time: Instant,
    renderer: Option<Renderer>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            variant: config.variant,
            config,
            camera: Camera::new().at(0.0, 1.2, 3.0),
            start_time: Instant::now(),
            renderer: None,
        }
    }

    /// The spinning, squashed cube. The scale is deliberately non-uniform so
    /// that the normals pipeline shows the effect of the normal matrix.
    fn model(&self) -> Transform {
        let t = self.start_time.elapsed().as_secs_f32();
        Transform::new()
            .rotation(Quat::from_rotation_y(t * 0.8) * Quat::from_rotation_x(t * 0.3))
            .scale(Vec3::new(1.6, 0.8, 1.0))
    }

    fn uniforms(&self, aspect: f32) -> UniformBlock {
        let view_proj = self.camera.view_projection(aspect);
        let model = self.model();

        match self.variant {
            PipelineVariant::Flat => FlatUniforms::new(view_proj * model.matrix()).into(),
            PipelineVariant::Normals => NormalUniforms::from_model(view_proj, model.matrix()).into(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        match Renderer::new(event_loop, &self.config) {
            Ok(renderer) => {
                log::info!("starting with the {} pipeline", self.variant);
                renderer.window.request_redraw();
                self.renderer = Some(renderer);
            }
            Err(err) => {
                log::error!("initialization failed: {err:?}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                NamedKey::Escape => event_loop.exit(),
                NamedKey::Tab => {
                    self.variant = self.variant.toggled();
                    log::info!("switched to the {} pipeline", self.variant);
                }
                _ => {}
            },
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_ref() else {
                    return;
                };

                let uniforms = self.uniforms(renderer.gpu.aspect());
                match renderer.render(&self.config, self.variant, &uniforms) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost or outdated, reconfiguring");
                        renderer.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory, exiting");
                        event_loop.exit();
                        return;
                    }
                    Err(err) => {
                        log::warn!("skipping frame: {err}");
                    }
                }

                renderer.window.request_redraw();
            }
            _ => (),
        }
    }
}
