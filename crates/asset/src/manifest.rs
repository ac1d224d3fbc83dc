//! Serializable form of a texture swap: which property, and which file each
//! label points at. Stored as RON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use corelib::{TextureProperty, TextureSlot, TextureSwap};
use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::registry::TextureRegistry;
use crate::texture::SamplerSettings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    pub path: PathBuf,
    #[serde(default)]
    pub sampler: SamplerSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub label: String,
    pub texture: Option<TextureRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotManifest {
    /// Engine-style property name, e.g. `"bumpMap"`.
    pub property: String,
    pub entries: Vec<ManifestEntry>,
}

impl SlotManifest {
    /// Describe `swap` in terms of file paths. Fails for generated textures.
    pub fn from_swap(swap: &TextureSwap, registry: &TextureRegistry) -> Result<Self, AssetError> {
        let entries = swap
            .slot()
            .iter()
            .map(|(label, texture)| -> Result<ManifestEntry, AssetError> {
                let texture = texture
                    .map(|handle| {
                        registry
                            .file_source(handle)
                            .map(|(path, sampler)| TextureRef { path, sampler })
                    })
                    .transpose()?;
                Ok(ManifestEntry {
                    label: label.to_owned(),
                    texture,
                })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        Ok(Self {
            property: swap.property().name().to_owned(),
            entries,
        })
    }

    /// Rebuild the swap, loading (or reusing) each referenced texture.
    ///
    /// Paths already known to the registry resolve to their existing handles,
    /// so a manifest taken from a live swap rebinds the very same textures.
    pub fn to_swap(&self, registry: &TextureRegistry) -> Result<TextureSwap, AssetError> {
        let property: TextureProperty = self.property.parse()?;
        let mut slot = TextureSlot::new();
        for entry in &self.entries {
            let texture = entry
                .texture
                .as_ref()
                .map(|t| registry.load(&t.path, t.sampler));
            slot.insert(entry.label.clone(), texture)?;
        }
        Ok(TextureSwap::new(property, slot))
    }

    pub fn to_ron(&self) -> Result<String, AssetError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| AssetError::Manifest(e.to_string()))
    }

    pub fn from_ron(text: &str) -> Result<Self, AssetError> {
        ron::from_str(text).map_err(|e| AssetError::Manifest(e.to_string()))
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read slot manifest: {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_ron()?)
            .with_context(|| format!("Failed to write slot manifest: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use corelib::{Material, TextureHandle};

    use super::*;
    use crate::texture::TextureData;

    fn gradient_swap(registry: &TextureRegistry) -> TextureSwap {
        let three = registry.load_blocking("textures/tone_three.jpg", SamplerSettings::nearest());
        let five = registry.load_blocking("textures/tone_five.jpg", SamplerSettings::nearest());
        let slot = TextureSlot::with_none()
            .with("threeTone", Some(three))
            .unwrap()
            .with("fiveTone", Some(five))
            .unwrap();
        TextureSwap::new(TextureProperty::GradientMap, slot)
    }

    #[test]
    fn round_trip_rebinds_identical_state() {
        let registry = TextureRegistry::new();
        let original = gradient_swap(&registry);

        let text = SlotManifest::from_swap(&original, &registry)
            .unwrap()
            .to_ron()
            .unwrap();
        let restored = SlotManifest::from_ron(&text)
            .unwrap()
            .to_swap(&registry)
            .unwrap();
        assert_eq!(restored, original);

        for label in ["none", "threeTone", "fiveTone"] {
            let mut a = Material::toon("a");
            let mut b = Material::toon("a");
            original.apply(&mut a, label).unwrap();
            restored.apply(&mut b, label).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn unknown_property_name_is_rejected() {
        let manifest = SlotManifest {
            property: "specularMap".into(),
            entries: vec![],
        };
        let err = manifest.to_swap(&TextureRegistry::new()).unwrap_err();
        assert!(matches!(err, AssetError::Material(_)));
    }

    #[test]
    fn generated_textures_cannot_be_described() {
        let registry = TextureRegistry::new();
        let checker = registry.insert("checker", TextureData::checkerboard(8));
        let slot = TextureSlot::with_none().with("checker", Some(checker)).unwrap();
        let swap = TextureSwap::new(TextureProperty::Map, slot);
        assert!(matches!(
            SlotManifest::from_swap(&swap, &registry),
            Err(AssetError::NoSourcePath(TextureHandle(0)))
        ));
    }

    #[test]
    fn manifest_file_round_trip() {
        let path = std::env::temp_dir().join(format!("slot-manifest-{}.ron", std::process::id()));
        let manifest = SlotManifest {
            property: "alphaMap".into(),
            entries: vec![
                ManifestEntry {
                    label: "none".into(),
                    texture: None,
                },
                ManifestEntry {
                    label: "partial".into(),
                    texture: Some(TextureRef {
                        path: "textures/alpha_map.png".into(),
                        sampler: SamplerSettings::repeating(8.0, 8.0),
                    }),
                },
            ],
        };
        manifest.write_to(&path).unwrap();
        assert_eq!(SlotManifest::read_from(&path).unwrap(), manifest);
    }
}
