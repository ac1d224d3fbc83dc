//! GPU copies of registry textures, uploaded once they finish decoding.

use std::collections::HashMap;

use asset::{Filter, TextureData, TextureRegistry, Wrap};
use corelib::TextureHandle;
use wgpu::{
    AddressMode, Device, Extent3d, FilterMode, ImageCopyTexture, ImageDataLayout, Origin3d, Queue,
    Sampler, SamplerDescriptor, TextureAspect, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor,
};

/// Uploaded texture. Color slots sample the sRGB view, data slots the linear one.
pub struct GpuTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    pub linear_view: TextureView,
    pub srgb_view: TextureView,
    pub sampler: Sampler,
}

impl GpuTexture {
    pub fn upload(device: &Device, queue: &Queue, label: &str, data: &TextureData) -> Self {
        let size = Extent3d {
            width: data.width.max(1),
            height: data.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[TextureFormat::Rgba8UnormSrgb],
        });

        queue.write_texture(
            ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            &data.data,
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_pixel() * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let linear_view = texture.create_view(&TextureViewDescriptor::default());
        let srgb_view = texture.create_view(&TextureViewDescriptor {
            format: Some(TextureFormat::Rgba8UnormSrgb),
            ..Default::default()
        });

        let address_mode = match data.sampler.wrap {
            Wrap::Clamp => AddressMode::ClampToEdge,
            Wrap::Repeat => AddressMode::Repeat,
        };
        let filter = match data.sampler.filter {
            Filter::Linear => FilterMode::Linear,
            Filter::Nearest => FilterMode::Nearest,
        };
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            linear_view,
            srgb_view,
            sampler,
        }
    }
}

/// Handle → uploaded texture, plus a 1x1 white texture bound to empty slots.
pub struct GpuTextureCache {
    textures: HashMap<TextureHandle, GpuTexture>,
    fallback: GpuTexture,
}

impl GpuTextureCache {
    pub fn new(device: &Device, queue: &Queue) -> Self {
        Self {
            textures: HashMap::new(),
            fallback: GpuTexture::upload(
                device,
                queue,
                "Fallback Texture",
                &TextureData::solid([255, 255, 255, 255]),
            ),
        }
    }

    /// Upload every handle in `wanted` that is ready and not yet resident.
    /// Returns how many textures were uploaded.
    pub fn sync(
        &mut self,
        device: &Device,
        queue: &Queue,
        registry: &TextureRegistry,
        wanted: impl IntoIterator<Item = TextureHandle>,
    ) -> usize {
        let mut uploaded = 0;
        for handle in wanted {
            if self.textures.contains_key(&handle) {
                continue;
            }
            if let Some(data) = registry.get(handle) {
                let label = format!("Texture #{}", handle.0);
                self.textures
                    .insert(handle, GpuTexture::upload(device, queue, &label, &data));
                log::debug!("Uploaded texture #{} ({}x{})", handle.0, data.width, data.height);
                uploaded += 1;
            }
        }
        uploaded
    }

    #[inline]
    pub fn get(&self, handle: TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle)
    }

    /// Resident texture for `handle`, or the fallback.
    pub fn resolve(&self, handle: Option<TextureHandle>) -> &GpuTexture {
        handle
            .and_then(|h| self.textures.get(&h))
            .unwrap_or(&self.fallback)
    }
}
