//! egui glue: winit input in, wgpu paint jobs out.

use egui::ViewportId;
use egui_wgpu::ScreenDescriptor;
use renderer::{Frame, GpuState};
use winit::event::WindowEvent;
use winit::window::Window;

pub struct EguiLayer {
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiLayer {
    pub fn new(gpu: &GpuState, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(gpu.device(), gpu.surface_format(), None, 1, false);
        Self {
            ctx,
            winit_state,
            renderer,
        }
    }

    /// Feed a window event to egui. Returns `true` if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    pub fn wants_pointer_input(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    /// Run `build_ui` and record the UI pass on top of whatever `frame` holds.
    pub fn paint(
        &mut self,
        gpu: &GpuState,
        window: &Window,
        frame: &mut Frame,
        build_ui: impl FnMut(&egui::Context),
    ) {
        let raw_input = self.winit_state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, build_ui);
        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen = ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(gpu.device(), gpu.queue(), *id, delta);
        }
        let user_buffers = self.renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            &mut frame.encoder,
            &paint_jobs,
            &screen,
        );
        if !user_buffers.is_empty() {
            gpu.queue().submit(user_buffers);
        }

        {
            let mut rpass = frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("EguiPass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut rpass, &paint_jobs, &screen);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
