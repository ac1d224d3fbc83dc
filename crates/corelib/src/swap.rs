//! Swap the active texture of a material property by label.

use log::debug;

use crate::error::{MaterialError, MaterialResult};
use crate::material::Material;
use crate::property::TextureProperty;
use crate::slot::TextureSlot;

/// Binds the texture mapped to a label into one texture property.
///
/// The material is passed at call time rather than captured, so the demo keeps
/// sole ownership of it while the panel holds the swap.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSwap {
    property: TextureProperty,
    slot: TextureSlot,
}

impl TextureSwap {
    pub fn new(property: TextureProperty, slot: TextureSlot) -> Self {
        Self { property, slot }
    }

    pub fn property(&self) -> TextureProperty {
        self.property
    }

    pub fn slot(&self) -> &TextureSlot {
        &self.slot
    }

    /// Bind the texture mapped to `label` and mark the material dirty.
    ///
    /// Unknown labels fail with [`MaterialError::UnknownLabel`] and leave the
    /// material untouched.
    pub fn apply(&self, material: &mut Material, label: &str) -> MaterialResult<()> {
        let texture = self
            .slot
            .get(label)
            .ok_or_else(|| MaterialError::UnknownLabel {
                label: label.to_owned(),
                property: self.property,
            })?;

        debug!(
            "material '{}': {} <- '{}' ({:?})",
            material.name, self.property, label, texture
        );
        material.set_texture(self.property, texture);
        Ok(())
    }

    /// Label currently bound on `material`, if the binding came from this slot.
    pub fn current_label<'a>(&'a self, material: &Material) -> Option<&'a str> {
        self.slot.label_of(material.texture(self.property))
    }

    /// One-argument callback form used by change-notification widgets.
    pub fn into_callback(self) -> impl FnMut(&mut Material, &str) -> MaterialResult<()> {
        move |material, label| self.apply(material, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::TextureHandle;

    const BLOCKS: TextureHandle = TextureHandle(1);

    fn color_swap() -> TextureSwap {
        let slot = TextureSlot::with_none().with("blocks", Some(BLOCKS)).unwrap();
        TextureSwap::new(TextureProperty::Map, slot)
    }

    #[test]
    fn every_label_binds_its_mapped_texture() {
        let swap = color_swap();
        for (label, texture) in swap.slot().iter() {
            let mut m = Material::new("m");
            m.take_needs_update();
            swap.apply(&mut m, label).unwrap();
            assert_eq!(m.texture(TextureProperty::Map), texture);
            assert!(m.needs_update());
        }
    }

    #[test]
    fn unknown_label_leaves_material_unchanged() {
        let swap = color_swap();
        let mut m = Material::new("m").with_texture(TextureProperty::Map, Some(BLOCKS));
        m.take_needs_update();
        let before = m.clone();

        let err = swap.apply(&mut m, "bricks").unwrap_err();
        assert_eq!(
            err,
            MaterialError::UnknownLabel {
                label: "bricks".into(),
                property: TextureProperty::Map
            }
        );
        assert_eq!(m, before);
        assert_eq!(m.version(), before.version());
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let swap = color_swap();
        let mut once = Material::new("m");
        let mut twice = Material::new("m");
        swap.apply(&mut once, "none").unwrap();
        swap.apply(&mut twice, "none").unwrap();
        swap.apply(&mut twice, "none").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn color_map_scenario() {
        let swap = color_swap();
        let mut m = Material::new("color").with_texture(TextureProperty::Map, Some(BLOCKS));
        assert_eq!(swap.current_label(&m), Some("blocks"));
        m.take_needs_update();

        let mut on_change = swap.into_callback();
        on_change(&mut m, "none").unwrap();
        assert_eq!(m.texture(TextureProperty::Map), None);
        assert!(m.needs_update());
    }
}
