//! Material: shading parameters plus texture bindings for one mesh.
//!
//! Texture bindings and the variant-selecting fields (shading model,
//! transparency, side) are private so every change goes through a setter
//! that raises the dirty flag. The renderer polls
//! that flag once per frame to pick the shader variant matching the set of
//! populated texture slots.

use glam::{Vec2, Vec3};

use crate::error::{MaterialError, MaterialResult};
use crate::property::{PropertyId, PropertyValue, ScalarProperty, TextureProperty, VectorProperty};

/// Opaque id of a texture owned by the asset registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShadingModel {
    /// Lambert diffuse + GGX specular driven by roughness/metalness.
    #[default]
    Standard,
    /// Banded diffuse looked up through the gradient map.
    Toon,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    #[default]
    Front,
    Double,
}

const TEXTURE_SLOTS: usize = TextureProperty::ALL.len();

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub bump_scale: f32,
    pub normal_scale: Vec2,
    pub displacement_scale: f32,
    pub displacement_bias: f32,
    pub opacity: f32,

    shading: ShadingModel,
    transparent: bool,
    side: Side,
    textures: [Option<TextureHandle>; TEXTURE_SLOTS],
    needs_update: bool,
    version: u64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            shading: ShadingModel::Standard,
            color: Vec3::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            bump_scale: 1.0,
            normal_scale: Vec2::ONE,
            displacement_scale: 1.0,
            displacement_bias: 0.0,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            textures: [None; TEXTURE_SLOTS],
            // A fresh material has never been prepared by the renderer.
            needs_update: true,
            version: 0,
        }
    }
}

/// Equality covers everything that affects rendering. The version counter is
/// bookkeeping and is ignored.
impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.shading == other.shading
            && self.color == other.color
            && self.emissive == other.emissive
            && self.emissive_intensity == other.emissive_intensity
            && self.roughness == other.roughness
            && self.metalness == other.metalness
            && self.bump_scale == other.bump_scale
            && self.normal_scale == other.normal_scale
            && self.displacement_scale == other.displacement_scale
            && self.displacement_bias == other.displacement_bias
            && self.opacity == other.opacity
            && self.transparent == other.transparent
            && self.side == other.side
            && self.textures == other.textures
            && self.needs_update == other.needs_update
    }
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn toon(name: &str) -> Self {
        Self {
            shading: ShadingModel::Toon,
            ..Self::new(name)
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_emissive(mut self, emissive: Vec3) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_normal_scale(mut self, scale: Vec2) -> Self {
        self.normal_scale = scale;
        self
    }

    pub fn with_displacement_scale(mut self, scale: f32) -> Self {
        self.displacement_scale = scale;
        self
    }

    pub fn with_transparency(mut self, side: Side) -> Self {
        self.transparent = true;
        self.side = side;
        self
    }

    pub fn with_texture(mut self, property: TextureProperty, texture: Option<TextureHandle>) -> Self {
        self.set_texture(property, texture);
        self
    }

    #[inline]
    pub fn shading(&self) -> ShadingModel {
        self.shading
    }

    pub fn set_shading(&mut self, shading: ShadingModel) {
        self.shading = shading;
        self.mark_needs_update();
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Blending and culling are baked into the pipeline, so both mark the
    /// material dirty.
    pub fn set_transparency(&mut self, transparent: bool, side: Side) {
        self.transparent = transparent;
        self.side = side;
        self.mark_needs_update();
    }

    #[inline]
    pub fn texture(&self, property: TextureProperty) -> Option<TextureHandle> {
        self.textures[property.index()]
    }

    /// Bind `texture` (or nothing) to `property` and mark the material dirty.
    pub fn set_texture(&mut self, property: TextureProperty, texture: Option<TextureHandle>) {
        self.textures[property.index()] = texture;
        self.mark_needs_update();
    }

    /// Iterate over bound texture properties in slot order.
    pub fn bound_textures(&self) -> impl Iterator<Item = (TextureProperty, TextureHandle)> + '_ {
        TextureProperty::ALL
            .iter()
            .filter_map(move |&p| self.texture(p).map(|h| (p, h)))
    }

    pub fn scalar(&self, property: ScalarProperty) -> f32 {
        match property {
            ScalarProperty::Roughness => self.roughness,
            ScalarProperty::Metalness => self.metalness,
            ScalarProperty::BumpScale => self.bump_scale,
            ScalarProperty::DisplacementScale => self.displacement_scale,
            ScalarProperty::DisplacementBias => self.displacement_bias,
            ScalarProperty::EmissiveIntensity => self.emissive_intensity,
            ScalarProperty::Opacity => self.opacity,
        }
    }

    pub fn set_scalar(&mut self, property: ScalarProperty, value: f32) {
        let field = match property {
            ScalarProperty::Roughness => &mut self.roughness,
            ScalarProperty::Metalness => &mut self.metalness,
            ScalarProperty::BumpScale => &mut self.bump_scale,
            ScalarProperty::DisplacementScale => &mut self.displacement_scale,
            ScalarProperty::DisplacementBias => &mut self.displacement_bias,
            ScalarProperty::EmissiveIntensity => &mut self.emissive_intensity,
            ScalarProperty::Opacity => &mut self.opacity,
        };
        *field = value;
    }

    /// Typed setter dispatch for a dynamically chosen property.
    pub fn set(&mut self, property: PropertyId, value: PropertyValue) -> MaterialResult<()> {
        match (property, value) {
            (PropertyId::Texture(p), PropertyValue::Texture(t)) => self.set_texture(p, t),
            (PropertyId::Scalar(p), PropertyValue::Scalar(v)) => self.set_scalar(p, v),
            (PropertyId::Vector(VectorProperty::NormalScale), PropertyValue::Vec2(v)) => {
                self.normal_scale = v;
            }
            (PropertyId::Vector(VectorProperty::Color), PropertyValue::Vec3(v)) => {
                self.color = v;
            }
            (PropertyId::Vector(VectorProperty::Emissive), PropertyValue::Vec3(v)) => {
                self.emissive = v;
            }
            (property, value) => {
                return Err(MaterialError::KindMismatch {
                    property,
                    got: value.kind(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, property: PropertyId) -> PropertyValue {
        match property {
            PropertyId::Texture(p) => PropertyValue::Texture(self.texture(p)),
            PropertyId::Scalar(p) => PropertyValue::Scalar(self.scalar(p)),
            PropertyId::Vector(VectorProperty::NormalScale) => PropertyValue::Vec2(self.normal_scale),
            PropertyId::Vector(VectorProperty::Color) => PropertyValue::Vec3(self.color),
            PropertyId::Vector(VectorProperty::Emissive) => PropertyValue::Vec3(self.emissive),
        }
    }

    /// Request shader-variant re-selection and bind group rebuild before the next draw.
    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
        self.version = self.version.wrapping_add(1);
    }

    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }

    /// Number of times the material was marked dirty.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_material_starts_dirty_and_untextured() {
        let m = Material::new("fresh");
        assert!(m.needs_update());
        assert_eq!(m.bound_textures().count(), 0);
    }

    #[test]
    fn set_texture_marks_dirty() {
        let mut m = Material::new("m");
        assert!(m.take_needs_update());
        assert!(!m.needs_update());

        m.set_texture(TextureProperty::BumpMap, Some(TextureHandle(3)));
        assert!(m.needs_update());
        assert_eq!(m.texture(TextureProperty::BumpMap), Some(TextureHandle(3)));
        assert_eq!(m.version(), 1);
    }

    #[test]
    fn scalar_setters_leave_variant_alone() {
        let mut m = Material::new("m");
        m.take_needs_update();
        m.set_scalar(ScalarProperty::BumpScale, -2.5);
        assert_eq!(m.bump_scale, -2.5);
        assert!(!m.needs_update());
    }

    #[test]
    fn pipeline_state_setters_mark_dirty() {
        let mut m = Material::new("m");
        m.take_needs_update();

        m.set_shading(ShadingModel::Toon);
        assert!(m.take_needs_update());
        assert_eq!(m.shading(), ShadingModel::Toon);

        m.set_transparency(true, Side::Double);
        assert!(m.take_needs_update());
        assert!(m.is_transparent());
        assert_eq!(m.side(), Side::Double);
        assert_eq!(m.version(), 2);
    }

    #[test]
    fn builders_set_pipeline_state() {
        let m = Material::toon("t").with_transparency(Side::Double);
        assert_eq!(m.shading(), ShadingModel::Toon);
        assert!(m.is_transparent());
        assert_eq!(m.side(), Side::Double);
        assert_eq!(Material::new("s").side(), Side::Front);
    }

    #[test]
    fn dispatch_rejects_kind_mismatch() {
        let mut m = Material::new("m");
        let before = m.clone();
        let err = m
            .set(
                PropertyId::Texture(TextureProperty::Map),
                PropertyValue::Scalar(1.0),
            )
            .unwrap_err();
        assert!(matches!(err, MaterialError::KindMismatch { got: "scalar", .. }));
        assert_eq!(m, before);
    }

    #[test]
    fn dispatch_routes_vectors() {
        let mut m = Material::new("m");
        m.set(
            PropertyId::Vector(VectorProperty::NormalScale),
            PropertyValue::Vec2(Vec2::new(2.0, -1.0)),
        )
        .unwrap();
        assert_eq!(
            m.get(PropertyId::Vector(VectorProperty::NormalScale)),
            PropertyValue::Vec2(Vec2::new(2.0, -1.0))
        );
    }

    #[test]
    fn equality_ignores_version() {
        let mut a = Material::new("m");
        let mut b = Material::new("m");
        a.set_texture(TextureProperty::Map, None);
        b.set_texture(TextureProperty::Map, None);
        b.set_texture(TextureProperty::Map, None);
        assert_ne!(a.version(), b.version());
        assert_eq!(a, b);
    }
}
