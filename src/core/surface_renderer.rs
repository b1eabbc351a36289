use std::sync::Arc;

use log::{debug, warn};
use wgpu::{BindGroup, Device, RenderPipeline, Surface, SurfaceConfiguration, Texture};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use super::gpu_context::GpuContext;
use super::window::{WindowContext, WindowDimensions};
use crate::device::{Geometry, PixelFormat, PixelView};
use crate::error::{Result, ViewerError};

pub const WINDOW_TITLE: &str = "Virtual FB Viewer";

/// Streams framebuffer pixels into a texture and stretches it over a window.
///
/// The texture is always `width x height` of the source; the window can be
/// any size and the GPU does the scaling. Fields drop top to bottom, which
/// releases the texture, then the renderer, then the window.
pub struct SurfaceRenderer {
    texture: Texture,
    bind_group: BindGroup,
    render_pipeline: RenderPipeline,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    gpu: GpuContext,
    window: Arc<Window>,
    staging: Vec<u8>,
    geometry: Geometry,
}

impl SurfaceRenderer {
    /// Create the window, renderer and streaming texture for a framebuffer
    pub fn new(event_loop: &ActiveEventLoop, geometry: Geometry, format: PixelFormat) -> Result<Self> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(PhysicalSize::new(geometry.width, geometry.height))
                    .with_resizable(true),
            )
            .map(Arc::new)
            .map_err(|e| ViewerError::WindowCreate(e.to_string()))?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ViewerError::RendererCreate(e.to_string()))?;

        let gpu = pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?;

        let surface_config = Self::create_surface_config(&surface, &gpu, window.inner_size())?;
        surface.configure(gpu.device(), &surface_config);

        let texture = Self::create_frame_texture(&gpu, geometry, format)?;
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (render_pipeline, bind_group) =
            Self::create_render_pipeline(gpu.device(), &texture_view, format, surface_config.format);

        Ok(Self {
            texture,
            bind_group,
            render_pipeline,
            surface,
            surface_config,
            gpu,
            window,
            staging: vec![0; geometry.mapping_len()],
            geometry,
        })
    }

    fn create_surface_config(
        surface: &Surface<'_>,
        gpu: &GpuContext,
        size: PhysicalSize<u32>,
    ) -> Result<SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(gpu.adapter());
        if surface_caps.formats.is_empty() {
            return Err(ViewerError::RendererCreate(
                "surface is not supported by the adapter".to_string(),
            ));
        }

        // Raw framebuffer bytes are already display-encoded; keep them as-is.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        debug!("Surface format {:?}", surface_format);

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    /// Create the streaming texture, sized exactly to the framebuffer
    fn create_frame_texture(gpu: &GpuContext, geometry: Geometry, format: PixelFormat) -> Result<Texture> {
        let max = gpu.max_texture_dimension();
        if geometry.width == 0 || geometry.height == 0 || geometry.width > max || geometry.height > max {
            return Err(ViewerError::TextureCreate(format!(
                "{}x{} texture exceeds device limits (1..={} per side)",
                geometry.width, geometry.height, max
            )));
        }

        debug!("Frame texture {}x{} {:?}", geometry.width, geometry.height, format.texture_format());

        gpu.device().push_error_scope(wgpu::ErrorFilter::Validation);
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Framebuffer Texture"),
            size: wgpu::Extent3d {
                width: geometry.width,
                height: geometry.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: format.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        match pollster::block_on(gpu.device().pop_error_scope()) {
            Some(e) => Err(ViewerError::TextureCreate(e.to_string())),
            None => Ok(texture),
        }
    }

    /// Create render pipeline for displaying the frame texture on the surface
    fn create_render_pipeline(
        device: &Device,
        texture_view: &wgpu::TextureView,
        format: PixelFormat,
        surface_format: wgpu::TextureFormat,
    ) -> (RenderPipeline, BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Framebuffer Display Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source(format).into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Framebuffer Texture Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: sample_type(format),
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Framebuffer Texture Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(texture_view),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Framebuffer Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Framebuffer Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    fn reconfigure(&self) {
        self.surface.configure(self.gpu.device(), &self.surface_config);
    }
}

impl WindowContext for SurfaceRenderer {
    fn request_size(&mut self, dimensions: WindowDimensions) {
        // Some platforms apply the size at once instead of sending Resized.
        if let Some(size) = self
            .window
            .request_inner_size(PhysicalSize::new(dimensions.width, dimensions.height))
        {
            self.resize_surface(WindowDimensions::new(size.width, size.height));
        }
    }

    fn resize_surface(&mut self, dimensions: WindowDimensions) {
        if dimensions.is_empty() {
            return;
        }

        self.surface_config.width = dimensions.width;
        self.surface_config.height = dimensions.height;
        self.reconfigure();
    }

    fn draw(&mut self, frame: PixelView<'_>) -> std::result::Result<(), Box<dyn std::error::Error>> {
        frame.copy_into(&mut self.staging);

        self.gpu.queue().write_texture(
            self.texture.as_image_copy(),
            &self.staging,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.geometry.stride()),
                rows_per_image: Some(self.geometry.height),
            },
            wgpu::Extent3d {
                width: self.geometry.width,
                height: self.geometry.height,
                depth_or_array_layers: 1,
            },
        );

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Box::new(ViewerError::Render(
                    "out of memory acquiring frame".to_string(),
                )));
            }
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Framebuffer Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Framebuffer Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// WGSL source for a pixel format
fn shader_source(format: PixelFormat) -> &'static str {
    match format {
        PixelFormat::Rgb565 => include_str!("../shaders/rgb565.wgsl"),
        PixelFormat::Argb8888 => include_str!("../shaders/argb8888.wgsl"),
    }
}

/// How the fragment shader reads the frame texture; both use `textureLoad`
fn sample_type(format: PixelFormat) -> wgpu::TextureSampleType {
    match format {
        PixelFormat::Rgb565 => wgpu::TextureSampleType::Uint,
        PixelFormat::Argb8888 => wgpu::TextureSampleType::Float { filterable: false },
    }
}
