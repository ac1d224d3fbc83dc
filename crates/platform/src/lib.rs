//! Platform layer: window, event loop, input and the control panel.
//!
//! - Continuous redraw: every frame requests the next one.
//! - Proper handling of resize/scale/close and surface loss.
//! - Pointer input goes to egui first; the orbit camera only sees what egui
//!   did not consume.

mod gui;
mod panel;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use asset::TextureRegistry;
use corelib::camera::{Camera, OrbitController};
use demos::{DemoAssets, DemoKind, DemoScene};
use glam::Vec2;
use renderer::{GpuState, SceneView};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::gui::EguiLayer;

/// Runtime options handed over by the binary.
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub demo: DemoKind,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub texture_root: PathBuf,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            backends: wgpu::Backends::all(),
            show_fps: false,
            width: 1280,
            height: 720,
            texture_root: PathBuf::from("textures"),
        }
    }
}

/// Frames-per-second averaged over half-second windows.
#[derive(Debug)]
struct FpsCounter {
    frames: u32,
    window_start: Instant,
    fps: f32,
}

impl FpsCounter {
    const WINDOW: Duration = Duration::from_millis(500);

    fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            fps: 0.0,
        }
    }

    /// Count a frame; returns the refreshed value when a window closes.
    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Self::WINDOW {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }
}

/// State that only exists once the window is up.
struct Running {
    window: Arc<Window>,
    gpu: GpuState,
    egui: EguiLayer,
}

struct App {
    config: PlatformConfig,
    assets: DemoAssets,
    demo: DemoScene,
    camera: Camera,
    orbit: OrbitController,
    running: Option<Running>,
    start: Instant,
    fps: FpsCounter,
    dragging: bool,
    last_cursor: Option<Vec2>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: PlatformConfig) -> Result<Self> {
        let assets = DemoAssets::new(config.texture_root.clone(), TextureRegistry::new());
        let demo = DemoScene::build(config.demo, &assets)
            .with_context(|| format!("Failed to build demo '{}'", config.demo))?;
        let camera = Camera::demo_default(config.width as f32 / config.height.max(1) as f32);
        let orbit = OrbitController::from_camera(&camera);
        let now = Instant::now();
        Ok(Self {
            config,
            assets,
            demo,
            camera,
            orbit,
            running: None,
            start: now,
            fps: FpsCounter::new(now),
            dragging: false,
            last_cursor: None,
            error: None,
        })
    }

    fn switch_demo(&mut self, kind: DemoKind) {
        match DemoScene::build(kind, &self.assets) {
            Ok(demo) => {
                log::info!("Switched to demo '{}'", kind);
                self.demo = demo;
                self.camera = Camera::demo_default(self.camera.aspect);
                self.orbit = OrbitController::from_camera(&self.camera);
            }
            Err(e) => log::warn!("Failed to build demo '{}': {}", kind, e),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = Window::default_attributes()
            .with_title(format!("Texture maps: {}", self.demo.title()))
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to create window")?,
        );
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends))?;
        let egui = EguiLayer::new(&gpu, &window);
        self.camera.aspect = gpu.aspect();
        Ok(Running { window, gpu, egui })
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        if let Some(fps) = self.fps.tick(now) {
            log::trace!("fps={:.1}", fps);
        }
        let time = now.duration_since(self.start).as_secs_f32();

        let Some(running) = self.running.as_mut() else {
            return;
        };
        let mut frame = match running.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface lost ({e:?}), recreating");
                running.gpu.recreate_surface();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                log::error!("Surface error: {e:?}");
                return;
            }
        };

        self.orbit.apply(&mut self.camera);
        running.gpu.draw(
            &mut frame,
            SceneView {
                scene: &self.demo.scene,
                material: &mut self.demo.material,
                camera: &self.camera,
                registry: self.assets.registry(),
                time,
            },
        );

        let demo = &mut self.demo;
        let show_fps = self.config.show_fps;
        let fps = self.fps.fps;
        let variants = running.gpu.pipeline_count();
        let mut switch_to = None;
        running
            .egui
            .paint(&running.gpu, &running.window, &mut frame, |ctx| {
                egui::Window::new(demo.title())
                    .resizable(false)
                    .show(ctx, |ui| {
                        let mut kind = demo.kind;
                        egui::ComboBox::from_label("demo")
                            .selected_text(kind.title())
                            .show_ui(ui, |ui| {
                                for k in DemoKind::ALL {
                                    ui.selectable_value(&mut kind, k, k.title());
                                }
                            });
                        if kind != demo.kind {
                            switch_to = Some(kind);
                        }
                        ui.separator();

                        for change in panel::controls_ui(ui, &demo.panel) {
                            if let Err(e) = demo.panel.apply(&mut demo.material, &change) {
                                log::warn!("Rejected control change {:?}: {}", change, e);
                            }
                        }

                        if show_fps {
                            ui.separator();
                            ui.label(format!("{fps:.1} fps, {variants} shader variant(s)"));
                        }
                    });
            });
        running.gpu.end_frame(frame);

        if let Some(kind) = switch_to {
            self.switch_demo(kind);
            if let Some(running) = &self.running {
                running
                    .window
                    .set_title(&format!("Texture maps: {}", self.demo.title()));
            }
        }
    }

    fn handle_pointer(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    self.orbit.drag(pos - last);
                }
                self.last_cursor = Some(pos);
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.orbit.scroll(lines);
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.create_window(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                log::error!("Startup failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match self.running.as_mut() {
            Some(running) => running.egui.on_window_event(&running.window, &event),
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(running) = self.running.as_mut() {
                    running.gpu.resize(new_size.width, new_size.height);
                    self.camera.aspect = running.gpu.aspect();
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {:.3}", scale_factor);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(running) = &self.running {
                    running.window.request_redraw();
                }
            }
            ref pointer => {
                // A release always ends a drag, even over the panel.
                let is_release = matches!(
                    pointer,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        ..
                    }
                );
                let egui_has_pointer = self
                    .running
                    .as_ref()
                    .is_some_and(|r| r.egui.wants_pointer_input());
                if is_release || !(consumed || egui_has_pointer && !self.dragging) {
                    self.handle_pointer(pointer);
                }
            }
        }
    }
}

/// Open the window and run the selected demo until it is closed.
pub fn run(config: PlatformConfig) -> Result<()> {
    log::info!(
        "Starting demo '{}' (textures from {})",
        config.demo,
        config.texture_root.display()
    );
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_after_window() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::new(t0);
        for i in 1..30 {
            assert_eq!(fps.tick(t0 + Duration::from_millis(i * 10)), None);
        }
        let value = fps.tick(t0 + Duration::from_millis(500)).unwrap();
        assert!((value - 60.0).abs() < 1e-3, "{value}");
        assert_eq!(fps.frames, 0);
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = PlatformConfig::default();
        assert_eq!(config.demo, DemoKind::Emissive);
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(!config.show_fps);
    }
}
