//! WGPU-based rendering engine for Embers
//!
//! Owns the surface, device and queue, clears the frame, draws the particle
//! batch and hands the encoder to an optional UI overlay callback.

use std::sync::Arc;
use wgpu::TextureFormat;

use super::particle_renderer::ParticleRenderer;
use crate::error::RenderError;

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles:
/// - Surface and device management
/// - Surface loss recovery
/// - The particle batch pass
/// - UI overlay hand-off
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    clear_color: wgpu::Color,
    particle_renderer: ParticleRenderer,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Present with `Fifo` when set, `Immediate` otherwise
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync, &surface_capabilities.present_modes),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?}, vsync {}",
            config.width,
            config.height,
            format,
            vsync
        );

        let particle_renderer = ParticleRenderer::new(device.clone(), queue.clone(), format);
        particle_renderer.set_aspect(aspect_ratio(config.width, config.height));

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            clear_color: wgpu::Color::BLACK,
            particle_renderer,
        })
    }

    /// Renders a frame: clear, particle batch, then the optional UI overlay
    ///
    /// The particle batch must already have been submitted to
    /// [`RenderEngine::particle_renderer_mut`]. Returns `Ok(false)` when the
    /// frame was skipped because the surface had to be reconfigured.
    pub fn render_frame<F>(&mut self, ui_callback: Option<F>) -> Result<bool, RenderError>
    where
        F: FnOnce(
            &wgpu::Device,
            &wgpu::Queue,
            &mut wgpu::CommandEncoder,
            &wgpu::TextureView,
        ) -> Result<(), RenderError>,
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(false);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.particle_renderer.record(&mut render_pass);
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            )?;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(true)
    }

    /// Resizes the surface and updates the aspect correction
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.particle_renderer.set_aspect(self.aspect());
    }

    pub fn set_clear_color(&mut self, color: [f64; 4]) {
        self.clear_color = wgpu::Color {
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
        };
    }

    /// Width over height of the surface
    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn particle_renderer(&self) -> &ParticleRenderer {
        &self.particle_renderer
    }

    /// Batch target for this frame's particles
    pub fn particle_renderer_mut(&mut self) -> &mut ParticleRenderer {
        &mut self.particle_renderer
    }
}

/// `Fifo` is always supported, so it is the fallback for uncapped presentation
fn present_mode(vsync: bool, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if !vsync && supported.contains(&wgpu::PresentMode::Immediate) {
        wgpu::PresentMode::Immediate
    } else {
        wgpu::PresentMode::Fifo
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_mode_follows_vsync() {
        let supported = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate];
        assert_eq!(present_mode(true, &supported), wgpu::PresentMode::Fifo);
        assert_eq!(present_mode(false, &supported), wgpu::PresentMode::Immediate);
        assert_eq!(present_mode(false, &[wgpu::PresentMode::Fifo]), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(1200, 800), 1.5);
        assert_eq!(aspect_ratio(640, 0), 1.0);
    }
}
