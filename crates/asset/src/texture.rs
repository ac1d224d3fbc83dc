//! Texture data and per-texture sampling settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// How UVs outside [0, 1] are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrap {
    #[default]
    Clamp,
    Repeat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Linear,
    /// Required by gradient maps so the tone bands stay crisp.
    Nearest,
}

/// Sampling state that travels with a texture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub wrap: Wrap,
    pub filter: Filter,
    /// UV multiplier; only meaningful with [`Wrap::Repeat`].
    pub repeat: [f32; 2],
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            wrap: Wrap::Clamp,
            filter: Filter::Linear,
            repeat: [1.0, 1.0],
        }
    }
}

impl SamplerSettings {
    pub fn repeating(u: f32, v: f32) -> Self {
        Self {
            wrap: Wrap::Repeat,
            repeat: [u, v],
            ..Self::default()
        }
    }

    pub fn nearest() -> Self {
        Self {
            filter: Filter::Nearest,
            ..Self::default()
        }
    }
}

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub sampler: SamplerSettings,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
            sampler: SamplerSettings::default(),
        }
    }

    pub fn with_sampler(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    /// Decode a PNG or JPEG file into RGBA8.
    pub fn load<P: AsRef<Path>>(path: P, sampler: SamplerSettings) -> Result<Self, AssetError> {
        let path = path.as_ref();
        log::debug!("Decoding texture {:?}", path);

        let img = image::open(path).map_err(|e| AssetError::ResourceLoadFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!(
            "Loaded texture {:?}: {}x{} ({} bytes)",
            path,
            width,
            height,
            data.len()
        );

        Ok(Self::new_rgba8(width, height, data).with_sampler(sampler))
    }

    /// 1x1 texture of a single color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self::new_rgba8(1, 1, rgba.to_vec())
    }

    /// Checkerboard of 8-pixel cells, white and gray.
    pub fn checkerboard(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let checker = ((x / 8) + (y / 8)) % 2;
                if checker == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }

        Self::new_rgba8(size, size, data)
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_textures_are_valid() {
        assert!(TextureData::checkerboard(16).is_valid());
        assert!(TextureData::solid([0, 0, 0, 255]).is_valid());
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let err = TextureData::load("does/not/exist.png", SamplerSettings::default()).unwrap_err();
        assert!(matches!(err, AssetError::ResourceLoadFailure { .. }));
    }

    #[test]
    fn sampler_settings_default_when_fields_missing() {
        let s: SamplerSettings = ron::from_str("(wrap: Repeat)").unwrap();
        assert_eq!(s.wrap, Wrap::Repeat);
        assert_eq!(s.repeat, [1.0, 1.0]);
    }
}
