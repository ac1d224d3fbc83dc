//! Typed material property identifiers.
//!
//! Materials are never addressed by raw strings at runtime. Controls and
//! manifests name a [`PropertyId`], which is parsed once from the familiar
//! engine-style names (`"bumpMap"`, `"normalScale"`, ...) and then dispatched
//! to a typed setter on [`Material`](crate::Material).

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};

use crate::error::MaterialError;
use crate::material::TextureHandle;

/// Material properties that accept a texture or nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureProperty {
    Map,
    BumpMap,
    NormalMap,
    DisplacementMap,
    AlphaMap,
    EmissiveMap,
    GradientMap,
}

impl TextureProperty {
    pub const ALL: [TextureProperty; 7] = [
        TextureProperty::Map,
        TextureProperty::BumpMap,
        TextureProperty::NormalMap,
        TextureProperty::DisplacementMap,
        TextureProperty::AlphaMap,
        TextureProperty::EmissiveMap,
        TextureProperty::GradientMap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextureProperty::Map => "map",
            TextureProperty::BumpMap => "bumpMap",
            TextureProperty::NormalMap => "normalMap",
            TextureProperty::DisplacementMap => "displacementMap",
            TextureProperty::AlphaMap => "alphaMap",
            TextureProperty::EmissiveMap => "emissiveMap",
            TextureProperty::GradientMap => "gradientMap",
        }
    }

    /// Dense index, used for feature bitsets and GPU binding slots.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarProperty {
    Roughness,
    Metalness,
    BumpScale,
    DisplacementScale,
    DisplacementBias,
    EmissiveIntensity,
    Opacity,
}

impl ScalarProperty {
    pub const ALL: [ScalarProperty; 7] = [
        ScalarProperty::Roughness,
        ScalarProperty::Metalness,
        ScalarProperty::BumpScale,
        ScalarProperty::DisplacementScale,
        ScalarProperty::DisplacementBias,
        ScalarProperty::EmissiveIntensity,
        ScalarProperty::Opacity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarProperty::Roughness => "roughness",
            ScalarProperty::Metalness => "metalness",
            ScalarProperty::BumpScale => "bumpScale",
            ScalarProperty::DisplacementScale => "displacementScale",
            ScalarProperty::DisplacementBias => "displacementBias",
            ScalarProperty::EmissiveIntensity => "emissiveIntensity",
            ScalarProperty::Opacity => "opacity",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VectorProperty {
    NormalScale,
    Color,
    Emissive,
}

impl VectorProperty {
    pub const ALL: [VectorProperty; 3] = [
        VectorProperty::NormalScale,
        VectorProperty::Color,
        VectorProperty::Emissive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VectorProperty::NormalScale => "normalScale",
            VectorProperty::Color => "color",
            VectorProperty::Emissive => "emissive",
        }
    }
}

/// Any addressable material property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyId {
    Texture(TextureProperty),
    Scalar(ScalarProperty),
    Vector(VectorProperty),
}

impl PropertyId {
    pub fn name(self) -> &'static str {
        match self {
            PropertyId::Texture(p) => p.name(),
            PropertyId::Scalar(p) => p.name(),
            PropertyId::Vector(p) => p.name(),
        }
    }
}

impl FromStr for PropertyId {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextureProperty::ALL
            .iter()
            .find(|p| p.name() == s)
            .map(|&p| PropertyId::Texture(p))
            .or_else(|| {
                ScalarProperty::ALL
                    .iter()
                    .find(|p| p.name() == s)
                    .map(|&p| PropertyId::Scalar(p))
            })
            .or_else(|| {
                VectorProperty::ALL
                    .iter()
                    .find(|p| p.name() == s)
                    .map(|&p| PropertyId::Vector(p))
            })
            .ok_or_else(|| MaterialError::UnknownProperty(s.to_owned()))
    }
}

impl FromStr for TextureProperty {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<PropertyId>()? {
            PropertyId::Texture(p) => Ok(p),
            _ => Err(MaterialError::UnknownProperty(s.to_owned())),
        }
    }
}

impl fmt::Display for TextureProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value destined for one property. Vec2 is used by normal scale, Vec3 by colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    Texture(Option<TextureHandle>),
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Texture(_) => "texture",
            PropertyValue::Scalar(_) => "scalar",
            PropertyValue::Vec2(_) => "vec2",
            PropertyValue::Vec3(_) => "vec3",
        }
    }
}
