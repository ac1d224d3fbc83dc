//! Renderer: wgpu init, depth, and the texture-mapped material pipeline.
//! wgpu = 23.x, winit = 0.30.x
//!
//! A frame is split into [`GpuState::begin_frame`], any number of passes
//! recorded into [`Frame::encoder`] (the scene via [`GpuState::draw`], the UI
//! by the platform layer), and [`GpuState::end_frame`].

pub mod material;
pub mod mesh;
pub mod textures;

use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result};
use asset::TextureRegistry;
use bytemuck::{Pod, Zeroable};
use corelib::camera::Camera;
use corelib::scene::Scene;
use corelib::Material;
use glam::{Mat4, Vec3};
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    Buffer, BufferBindingType, BufferUsages, CommandEncoder, CommandEncoderDescriptor, Device,
    DeviceDescriptor, Extent3d, Features, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, Surface,
    SurfaceConfiguration, SurfaceError, SurfaceTexture, TextureDescriptor, TextureDimension,
    TextureFormat, TextureUsages, TextureView, TextureViewDescriptor, util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::material::{DEPTH_FORMAT, MaterialBinding, PipelineCache, material_bind_group_layout};
use crate::mesh::MeshCache;
use crate::textures::GpuTextureCache;

/// Per-frame UBO: camera and lights (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
}

/// Per-object UBO.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
}

struct ObjectSlot {
    buf: Buffer,
    bg: BindGroup,
}

/// Everything the renderer needs to draw one demo frame.
pub struct SceneView<'a> {
    pub scene: &'a Scene,
    pub material: &'a mut Material,
    pub camera: &'a Camera,
    pub registry: &'a TextureRegistry,
    /// Seconds since start; drives animated lights.
    pub time: f32,
}

/// An acquired swapchain image plus the encoder recording into it.
pub struct Frame {
    surface_texture: SurfaceTexture,
    pub view: TextureView,
    pub encoder: CommandEncoder,
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_format: TextureFormat,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Frame + objects
    frame_buf: Buffer,
    frame_bg: BindGroup,
    object_bgl: BindGroupLayout,
    objects: Vec<ObjectSlot>,

    // Materials
    material_bgl: BindGroupLayout,
    pipelines: PipelineCache,
    material: MaterialBinding,
    textures: GpuTextureCache,
    meshes: MeshCache,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window>, restricted to `backends`.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("No suitable GPU adapter for backends {backends:?}"))?;
        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("Texmaps Device"),
                    required_features: Features::empty(),
                    required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("request_device failed")?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("Surface reports no formats")?;

        // Configure surface
        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Depth texture
        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shader ====
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Material WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/material.wgsl").into()),
        });

        // ==== Frame / object BGLs ====
        let frame_bgl = uniform_bgl::<FrameUniform>(&device, "Frame BGL");
        let object_bgl = uniform_bgl::<ObjectUniform>(&device, "Object BGL");
        let material_bgl = material_bind_group_layout(&device);

        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&FrameUniform::zeroed()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        // ==== Pipelines ====
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Material PipelineLayout"),
            bind_group_layouts: &[&frame_bgl, &material_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let pipelines = PipelineCache::new(shader, pipeline_layout, surface_format);
        let material = MaterialBinding::new(&device);
        let textures = GpuTextureCache::new(&device, &queue);

        Ok(Self {
            surface,
            surface_format,
            surface_config,
            device,
            queue,
            frame_buf,
            frame_bg,
            object_bgl,
            objects: Vec::new(),
            material_bgl,
            pipelines,
            material,
            textures,
            meshes: MeshCache::new(),
            depth_view,
            width,
            height,
        })
    }

    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    #[inline]
    pub fn surface_format(&self) -> TextureFormat {
        self.surface_format
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Number of compiled material variants so far.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    pub fn begin_frame(&mut self) -> Result<Frame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture.texture.create_view(&TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });
        Ok(Frame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Record the scene pass: clear to the scene background and draw every
    /// renderable with the view's material.
    pub fn draw(&mut self, frame: &mut Frame, view: SceneView<'_>) {
        let SceneView {
            scene,
            material,
            camera,
            registry,
            time,
        } = view;

        // --- frame uniforms
        let camera = camera.with_aspect(self.aspect());
        let ambient = scene
            .lights
            .ambient
            .map(|a| a.color * a.intensity)
            .unwrap_or(Vec3::ZERO);
        let (light_pos, light_color) = match (scene.lights.point, scene.point_light_position(time)) {
            (Some(light), Some(pos)) => (pos.extend(1.0), light.color * light.intensity),
            _ => (Vec3::ZERO.extend(0.0), Vec3::ZERO),
        };
        let frame_uniform = FrameUniform {
            view_proj: camera.proj_view().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            ambient: ambient.extend(0.0).to_array(),
            light_pos: light_pos.to_array(),
            light_color: light_color.extend(0.0).to_array(),
        };
        self.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&frame_uniform));

        // --- material
        self.material.prepare(
            &self.device,
            &self.queue,
            &self.material_bgl,
            material,
            registry,
            &mut self.textures,
            &mut self.pipelines,
        );

        // --- objects
        let mut draws = Vec::new();
        for (i, (transform, renderable)) in scene.iter_renderables().enumerate() {
            self.meshes.get_or_upload(&self.device, &renderable.mesh);
            self.ensure_object_slot(i);
            let object = ObjectUniform {
                model: transform.matrix().to_cols_array_2d(),
                normal_matrix: Mat4::from_mat3(transform.normal_matrix()).to_cols_array_2d(),
            };
            self.queue
                .write_buffer(&self.objects[i].buf, 0, bytemuck::bytes_of(&object));
            draws.push((i, renderable.mesh));
        }

        let background = scene.background;
        let mut rpass = frame.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("MainPass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(wgpu::Color {
                        r: srgb_to_linear(background.x) as f64,
                        g: srgb_to_linear(background.y) as f64,
                        b: srgb_to_linear(background.z) as f64,
                        a: 1.0,
                    }),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let (Some(key), Some(material_bg)) = (self.material.key(), self.material.bind_group())
        else {
            return;
        };
        let Some(pipeline) = self.pipelines.get(&key) else {
            log::warn!("No pipeline for material variant {:?}", key);
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &self.frame_bg, &[]);
        rpass.set_bind_group(1, material_bg, &[]);
        for (slot, kind) in draws {
            let Some(mesh) = self.meshes.get(&kind) else {
                continue;
            };
            rpass.set_bind_group(2, &self.objects[slot].bg, &[]);
            rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
            rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    pub fn end_frame(&self, frame: Frame) {
        self.queue.submit(Some(frame.encoder.finish()));
        frame.surface_texture.present();
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }

    fn ensure_object_slot(&mut self, index: usize) {
        while self.objects.len() <= index {
            let buf = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Object UBO"),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object BG"),
                layout: &self.object_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buf.as_entire_binding(),
                }],
            });
            self.objects.push(ObjectSlot { buf, bg });
        }
    }
}

fn uniform_bgl<T>(device: &Device, label: &str) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

/// sRGB-encoded channel to linear; clear colors bypass the sRGB target's encoding.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 128);
    }

    #[test]
    fn srgb_conversion_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        // 0x44 / 255 is roughly 0.058 in linear space.
        let grey = srgb_to_linear(0x44 as f32 / 255.0);
        assert!((grey - 0.058).abs() < 1e-3, "{grey}");
    }
}
