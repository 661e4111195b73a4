use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    demo::DemoScene,
    error::{AppError, RenderError},
    gfx::RenderEngine,
    performance::PerformanceMonitor,
    ui::{particle_editor_panel, UiManager},
};

/// Frame callback used when no UI overlay is drawn
type NoOverlay = fn(
    &wgpu::Device,
    &wgpu::Queue,
    &mut wgpu::CommandEncoder,
    &wgpu::TextureView,
) -> Result<(), RenderError>;

/// Windowed particle demo
pub struct EmbersApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    demo: DemoScene,
    performance: PerformanceMonitor,
    last_frame: Option<Instant>,
    show_ui: bool,
    error: Option<AppError>,
}

impl EmbersApp {
    /// Creates the event loop and the demo scene; the window opens on `run`
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let event_loop = EventLoop::new()?;
        let demo = DemoScene::new(&config.demo);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                demo,
                performance: PerformanceMonitor::new(),
                last_frame: None,
                show_ui: true,
                error: None,
            },
        })
    }

    /// Direct access to the scene, e.g. to tweak emitters before running
    pub fn demo_mut(&mut self) -> &mut DemoScene {
        &mut self.app_state.demo
    }

    /// Runs until the window closes or a fatal error occurs
    pub fn run(mut self) -> Result<(), AppError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: impl Into<AppError>) {
        let error = error.into();
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let (width, height) = window.inner_size().into();
        let vsync = self.config.vsync;
        let surface_target = window.clone();
        let mut renderer = pollster::block_on(async move {
            RenderEngine::new(surface_target, width, height, vsync).await
        })?;
        renderer.set_clear_color(self.config.clear_color);
        self.demo.set_viewport_aspect(renderer.aspect());

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        log::info!("Window ready at {}x{}", width, height);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key_code: KeyCode) {
        match key_code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => self.demo.launch_random_star(),
            KeyCode::KeyS => {
                self.demo.spark_at_random_point();
            }
            KeyCode::F1 => self.show_ui = !self.show_ui,
            _ => {}
        }
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        let delta_time = self.config.clamp_delta(elapsed);

        self.performance.begin_frame();
        self.demo.update(delta_time);

        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return Ok(());
        };

        render_engine.particle_renderer_mut().begin_frame();
        let vertex_count = self.demo.render(render_engine.particle_renderer_mut());
        self.performance.update_render_stats(
            render_engine.particle_renderer().draw_calls(),
            vertex_count as u32,
            self.demo.particle_count(),
        );

        match self.ui_manager.as_mut() {
            Some(ui_manager) if self.show_ui => {
                let demo = &mut self.demo;
                let performance = &self.performance;
                let show_performance = self.config.show_performance;
                ui_manager.prepare_frame(window, |ui| {
                    particle_editor_panel(ui, demo);
                    performance.render_overlay(ui);
                    if show_performance {
                        performance.render_ui(ui);
                    }
                })?;

                render_engine.render_frame(Some(
                    |device: &wgpu::Device,
                     queue: &wgpu::Queue,
                     encoder: &mut wgpu::CommandEncoder,
                     view: &wgpu::TextureView| {
                        ui_manager.render_overlay(device, queue, encoder, view)
                    },
                ))?;
            }
            _ => {
                render_engine.render_frame(None::<NoOverlay>)?;
            }
        }

        self.performance.end_frame();
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.init_graphics(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_window_event(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key_code),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                    self.demo.set_viewport_aspect(render_engine.aspect());
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(error) = self.redraw() {
                    self.fail(event_loop, error);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
