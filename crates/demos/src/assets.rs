//! Where the demo textures live and how each one is sampled.

use std::path::PathBuf;

use asset::{SamplerSettings, TextureRegistry};
use corelib::TextureHandle;

pub const BLOCKS_COLOR: &str = "blocks_color.jpg";
pub const BLOCKS_BUMP: &str = "blocks_bump.jpg";
pub const BLOCKS_NORMAL: &str = "blocks_normal.jpg";
pub const SANDS_COLOR: &str = "sands_color.jpg";
pub const SANDS_DISPLACEMENT: &str = "sands_displacement.png";
pub const ALPHA_MAP: &str = "alpha_map.png";
pub const LAVA_EMISSIVE: &str = "lava_emissive.png";
pub const LAVA_NORMAL: &str = "lava_normal.png";
pub const TONE_THREE: &str = "tone_three.jpg";
pub const TONE_FIVE: &str = "tone_five.jpg";

/// Texture root plus the registry the demo loads through.
#[derive(Clone, Debug)]
pub struct DemoAssets {
    root: PathBuf,
    registry: TextureRegistry,
}

impl DemoAssets {
    pub fn new(root: impl Into<PathBuf>, registry: TextureRegistry) -> Self {
        Self {
            root: root.into(),
            registry,
        }
    }

    pub fn registry(&self) -> &TextureRegistry {
        &self.registry
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Queue `file` for background decoding; the handle is usable immediately.
    pub fn texture(&self, file: &str) -> TextureHandle {
        self.texture_with(file, SamplerSettings::default())
    }

    pub fn texture_with(&self, file: &str, sampler: SamplerSettings) -> TextureHandle {
        self.registry.load(self.path(file), sampler)
    }
}
