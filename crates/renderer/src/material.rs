//! Material shader variants and per-material GPU state.
//!
//! A variant is identified by [`MaterialKey`]: which texture slots are
//! populated (and resident), the shading model, and the blend/cull state.
//! Pipelines are compiled on first use with WGSL override constants and kept
//! for the lifetime of the renderer.

use std::collections::HashMap;

use asset::TextureRegistry;
use bytemuck::{Pod, Zeroable};
use corelib::{Material, ShadingModel, Side, TextureProperty};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, BlendState, Buffer, BufferBindingType,
    BufferUsages, ColorTargetState, ColorWrites, DepthBiasState, DepthStencilState, Device,
    FragmentState, PipelineCompilationOptions, PipelineLayout, Queue, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, ShaderModule, ShaderStages, TextureFormat,
    TextureSampleType, TextureViewDimension, VertexState, util::DeviceExt,
};

use crate::mesh::GpuVertex;
use crate::textures::GpuTextureCache;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const SLOT_COUNT: usize = TextureProperty::ALL.len();

/// Override constant names, indexed like [`TextureProperty::ALL`].
const FEATURE_CONSTANTS: [&str; SLOT_COUNT] = [
    "HAS_MAP",
    "HAS_BUMP_MAP",
    "HAS_NORMAL_MAP",
    "HAS_DISPLACEMENT_MAP",
    "HAS_ALPHA_MAP",
    "HAS_EMISSIVE_MAP",
    "HAS_GRADIENT_MAP",
];

/// Bitset of populated texture slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MapFeatures(u8);

impl MapFeatures {
    pub fn with(mut self, property: TextureProperty) -> Self {
        self.0 |= 1 << property.index();
        self
    }

    pub fn contains(self, property: TextureProperty) -> bool {
        self.0 & (1 << property.index()) != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub features: MapFeatures,
    pub shading: ShadingModel,
    pub transparent: bool,
    pub double_sided: bool,
}

impl MaterialKey {
    /// Key for `material`, counting a slot only if its texture is resident.
    pub fn derive(material: &Material, resident: impl Fn(corelib::TextureHandle) -> bool) -> Self {
        let features = material
            .bound_textures()
            .filter(|(_, handle)| resident(*handle))
            .fold(MapFeatures::default(), |f, (p, _)| f.with(p));
        Self {
            features,
            shading: material.shading(),
            transparent: material.is_transparent(),
            double_sided: material.side() == Side::Double,
        }
    }

    fn constants(&self) -> HashMap<String, f64> {
        let mut constants: HashMap<String, f64> = TextureProperty::ALL
            .iter()
            .zip(FEATURE_CONSTANTS)
            .map(|(&p, name)| (name.to_string(), f64::from(u8::from(self.features.contains(p)))))
            .collect();
        constants.insert(
            "TOON".to_string(),
            f64::from(u8::from(self.shading == ShadingModel::Toon)),
        );
        constants.insert(
            "DOUBLE_SIDED".to_string(),
            f64::from(u8::from(self.double_sided)),
        );
        constants
    }
}

/// Material UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    /// rgb = base color, a = opacity.
    pub color: [f32; 4],
    /// rgb = emissive * intensity.
    pub emissive: [f32; 4],
    /// roughness, metalness, bump scale, displacement scale.
    pub params: [f32; 4],
    /// normal scale xy, displacement bias, unused.
    pub params2: [f32; 4],
    /// Per-slot UV repeat in xy.
    pub uv_repeat: [[f32; 4]; SLOT_COUNT],
}

impl MaterialUniform {
    pub fn new(material: &Material, registry: &TextureRegistry) -> Self {
        let mut uv_repeat = [[1.0, 1.0, 0.0, 0.0]; SLOT_COUNT];
        for (property, handle) in material.bound_textures() {
            if let Some(sampler) = registry.sampler(handle) {
                uv_repeat[property.index()] = [sampler.repeat[0], sampler.repeat[1], 0.0, 0.0];
            }
        }
        let emissive = material.emissive * material.emissive_intensity;
        Self {
            color: material.color.extend(material.opacity).to_array(),
            emissive: emissive.extend(0.0).to_array(),
            params: [
                material.roughness.clamp(0.03, 1.0),
                material.metalness.clamp(0.0, 1.0),
                material.bump_scale,
                material.displacement_scale,
            ],
            params2: [
                material.normal_scale.x,
                material.normal_scale.y,
                material.displacement_bias,
                0.0,
            ],
            uv_repeat,
        }
    }
}

/// Color slots are sampled through the sRGB view.
fn is_color_slot(property: TextureProperty) -> bool {
    matches!(property, TextureProperty::Map | TextureProperty::EmissiveMap)
}

pub fn material_bind_group_layout(device: &Device) -> BindGroupLayout {
    let visibility = ShaderStages::VERTEX | ShaderStages::FRAGMENT;
    let mut entries = vec![BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MaterialUniform>() as u64),
        },
        count: None,
    }];
    for slot in 0..SLOT_COUNT as u32 {
        entries.push(BindGroupLayoutEntry {
            binding: 1 + slot * 2,
            visibility,
            ty: BindingType::Texture {
                sample_type: TextureSampleType::Float { filterable: true },
                view_dimension: TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(BindGroupLayoutEntry {
            binding: 2 + slot * 2,
            visibility,
            ty: BindingType::Sampler(SamplerBindingType::Filtering),
            count: None,
        });
    }
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Material BGL"),
        entries: &entries,
    })
}

/// Compiled pipelines, one per [`MaterialKey`].
pub struct PipelineCache {
    shader: ShaderModule,
    layout: PipelineLayout,
    color_format: TextureFormat,
    pipelines: HashMap<MaterialKey, RenderPipeline>,
}

impl PipelineCache {
    pub fn new(
        shader: ShaderModule,
        layout: PipelineLayout,
        color_format: TextureFormat,
    ) -> Self {
        Self {
            shader,
            layout,
            color_format,
            pipelines: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn get(&self, key: &MaterialKey) -> Option<&RenderPipeline> {
        self.pipelines.get(key)
    }

    /// Compile the variant for `key` unless it already exists.
    pub fn ensure(&mut self, device: &Device, key: MaterialKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        log::debug!("Compiling material variant {:?}", key);

        let constants = key.constants();
        let compilation_options = PipelineCompilationOptions {
            constants: &constants,
            ..Default::default()
        };
        let blend = if key.transparent {
            BlendState::ALPHA_BLENDING
        } else {
            BlendState::REPLACE
        };
        let cull_mode = if key.double_sided {
            None
        } else {
            Some(wgpu::Face::Back)
        };

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Material Pipeline"),
            layout: Some(&self.layout),
            vertex: VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::LAYOUT],
                compilation_options: compilation_options.clone(),
            },
            fragment: Some(FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: self.color_format,
                    blend: Some(blend),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options,
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        self.pipelines.insert(key, pipeline);
    }
}

/// Uniform buffer + bind group for the active material.
pub struct MaterialBinding {
    uniform_buf: Buffer,
    bind_group: Option<BindGroup>,
    key: Option<MaterialKey>,
    seen_generation: Option<u64>,
}

impl MaterialBinding {
    pub fn new(device: &Device) -> Self {
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material UBO"),
            contents: bytemuck::bytes_of(&MaterialUniform::zeroed()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        Self {
            uniform_buf,
            bind_group: None,
            key: None,
            seen_generation: None,
        }
    }

    pub fn key(&self) -> Option<MaterialKey> {
        self.key
    }

    pub fn bind_group(&self) -> Option<&BindGroup> {
        self.bind_group.as_ref()
    }

    /// Bring GPU state in line with `material`.
    ///
    /// The variant and bind group are re-derived when the material is dirty or
    /// when a texture finished loading since the last call; uniforms are
    /// written every frame.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        layout: &BindGroupLayout,
        material: &mut Material,
        registry: &TextureRegistry,
        textures: &mut GpuTextureCache,
        pipelines: &mut PipelineCache,
    ) {
        let dirty = material.take_needs_update();
        let generation = registry.generation();

        if dirty || self.seen_generation != Some(generation) || self.bind_group.is_none() {
            textures.sync(
                device,
                queue,
                registry,
                material.bound_textures().map(|(_, h)| h),
            );

            let key = MaterialKey::derive(material, |h| textures.get(h).is_some());
            if self.key != Some(key) {
                log::debug!(
                    "Material '{}' switches to variant {:?}",
                    material.name,
                    key
                );
            }
            pipelines.ensure(device, key);
            self.bind_group = Some(self.create_bind_group(device, layout, material, textures));
            self.key = Some(key);
            self.seen_generation = Some(generation);
        }

        let uniform = MaterialUniform::new(material, registry);
        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&uniform));
    }

    fn create_bind_group(
        &self,
        device: &Device,
        layout: &BindGroupLayout,
        material: &Material,
        textures: &GpuTextureCache,
    ) -> BindGroup {
        let mut entries = vec![BindGroupEntry {
            binding: 0,
            resource: self.uniform_buf.as_entire_binding(),
        }];
        for (slot, &property) in TextureProperty::ALL.iter().enumerate() {
            let gpu = textures.resolve(material.texture(property));
            let view = if is_color_slot(property) {
                &gpu.srgb_view
            } else {
                &gpu.linear_view
            };
            entries.push(BindGroupEntry {
                binding: 1 + slot as u32 * 2,
                resource: BindingResource::TextureView(view),
            });
            entries.push(BindGroupEntry {
                binding: 2 + slot as u32 * 2,
                resource: BindingResource::Sampler(&gpu.sampler),
            });
        }
        device.create_bind_group(&BindGroupDescriptor {
            label: Some("Material BG"),
            layout,
            entries: &entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use corelib::TextureHandle;

    use super::*;

    #[test]
    fn key_counts_only_resident_textures() {
        let material = Material::new("m")
            .with_texture(TextureProperty::Map, Some(TextureHandle(0)))
            .with_texture(TextureProperty::BumpMap, Some(TextureHandle(1)));
        let key = MaterialKey::derive(&material, |h| h == TextureHandle(0));
        assert!(key.features.contains(TextureProperty::Map));
        assert!(!key.features.contains(TextureProperty::BumpMap));
    }

    #[test]
    fn swapping_to_none_changes_the_variant() {
        let mut material = Material::new("m").with_texture(TextureProperty::Map, Some(TextureHandle(0)));
        let before = MaterialKey::derive(&material, |_| true);
        material.set_texture(TextureProperty::Map, None);
        let after = MaterialKey::derive(&material, |_| true);
        assert_ne!(before, after);
        assert_eq!(after.features, MapFeatures::default());
    }

    #[test]
    fn override_constants_cover_every_slot() {
        let key = MaterialKey::derive(
            &Material::toon("t").with_texture(TextureProperty::GradientMap, Some(TextureHandle(2))),
            |_| true,
        );
        let constants = key.constants();
        assert_eq!(constants.len(), SLOT_COUNT + 2);
        assert_eq!(constants["HAS_GRADIENT_MAP"], 1.0);
        assert_eq!(constants["HAS_MAP"], 0.0);
        assert_eq!(constants["TOON"], 1.0);
    }

    #[test]
    fn uniform_layout_is_aligned() {
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
    }
}
