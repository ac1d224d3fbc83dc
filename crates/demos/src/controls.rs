//! Control panel model: named controls bound to material properties.

use std::ops::RangeInclusive;

use corelib::{Material, MaterialError, ScalarProperty, TextureSwap, Vec2};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("no control named '{0}'")]
    UnknownControl(String),

    #[error("duplicate control name '{0}'")]
    DuplicateControl(String),

    #[error("control '{name}' is a {actual} control, not a {expected} control")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("value {value} for '{name}' is not finite")]
    NotFinite { name: String, value: f32 },

    #[error(transparent)]
    Material(#[from] MaterialError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    /// Slider bound directly to a scalar material property.
    Scalar {
        property: ScalarProperty,
        range: RangeInclusive<f32>,
        value: f32,
    },
    /// Drop-down of texture labels routed through a [`TextureSwap`].
    TextureChoice { swap: TextureSwap, selected: String },
    /// Two independent sliders recombined into `Material::normal_scale`.
    NormalScale {
        x: f32,
        y: f32,
        range: RangeInclusive<f32>,
    },
}

impl Control {
    pub fn kind(&self) -> &'static str {
        match self {
            Control::Scalar { .. } => "scalar",
            Control::TextureChoice { .. } => "texture",
            Control::NormalScale { .. } => "normal-scale",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControlEntry {
    pub name: String,
    pub control: Control,
}

/// A change reported by the widget layer.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlChange {
    Scalar { name: String, value: f32 },
    Texture { name: String, label: String },
    Axis { name: String, axis: Axis, value: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlPanel {
    entries: Vec<ControlEntry>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ControlEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.control)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Control, ControlError> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| &mut e.control)
            .ok_or_else(|| ControlError::UnknownControl(name.to_owned()))
    }

    /// Names are unique; a second control under the same name is rejected.
    fn push(&mut self, name: impl Into<String>, control: Control) -> Result<(), ControlError> {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(ControlError::DuplicateControl(name));
        }
        self.entries.push(ControlEntry { name, control });
        Ok(())
    }

    /// Slider over `range`, starting from the material's current value.
    pub fn add_scalar(
        &mut self,
        name: impl Into<String>,
        property: ScalarProperty,
        range: RangeInclusive<f32>,
        material: &Material,
    ) -> Result<(), ControlError> {
        let value = material.scalar(property);
        self.push(
            name,
            Control::Scalar {
                property,
                range,
                value,
            },
        )
    }

    /// Texture drop-down, pre-selecting whatever label is bound on the material.
    pub fn add_texture_choice(
        &mut self,
        name: impl Into<String>,
        swap: TextureSwap,
        material: &Material,
    ) -> Result<(), ControlError> {
        let selected = swap
            .current_label(material)
            .or_else(|| swap.slot().labels().next())
            .unwrap_or_default()
            .to_owned();
        self.push(name, Control::TextureChoice { swap, selected })
    }

    pub fn add_normal_scale(
        &mut self,
        name: impl Into<String>,
        range: RangeInclusive<f32>,
        material: &Material,
    ) -> Result<(), ControlError> {
        self.push(
            name,
            Control::NormalScale {
                x: material.normal_scale.x,
                y: material.normal_scale.y,
                range,
            },
        )
    }

    /// Clamp `value` into the slider range and write it to the material.
    /// Returns the value actually applied.
    pub fn set_scalar(&mut self, material: &mut Material, name: &str, value: f32) -> Result<f32, ControlError> {
        check_finite(name, value)?;
        match self.get_mut(name)? {
            Control::Scalar {
                property,
                range,
                value: current,
            } => {
                let v = value.clamp(*range.start(), *range.end());
                *current = v;
                material.set_scalar(*property, v);
                Ok(v)
            }
            other => Err(wrong_kind(name, "scalar", other)),
        }
    }

    /// Swap the texture behind `name` to `label`. Unknown labels are rejected
    /// and neither the material nor the selection changes.
    pub fn select_texture(&mut self, material: &mut Material, name: &str, label: &str) -> Result<(), ControlError> {
        match self.get_mut(name)? {
            Control::TextureChoice { swap, selected } => {
                swap.apply(material, label)?;
                *selected = label.to_owned();
                Ok(())
            }
            other => Err(wrong_kind(name, "texture", other)),
        }
    }

    /// Update one axis of the composite normal-scale control. The material
    /// always receives both stored axes, so call order does not matter.
    pub fn set_axis(&mut self, material: &mut Material, name: &str, axis: Axis, value: f32) -> Result<f32, ControlError> {
        check_finite(name, value)?;
        match self.get_mut(name)? {
            Control::NormalScale { x, y, range } => {
                let v = value.clamp(*range.start(), *range.end());
                match axis {
                    Axis::X => *x = v,
                    Axis::Y => *y = v,
                }
                material.normal_scale = Vec2::new(*x, *y);
                Ok(v)
            }
            other => Err(wrong_kind(name, "normal-scale", other)),
        }
    }

    pub fn apply(&mut self, material: &mut Material, change: &ControlChange) -> Result<(), ControlError> {
        debug!("control change: {:?}", change);
        match change {
            ControlChange::Scalar { name, value } => self.set_scalar(material, name, *value).map(drop),
            ControlChange::Texture { name, label } => self.select_texture(material, name, label),
            ControlChange::Axis { name, axis, value } => {
                self.set_axis(material, name, *axis, *value).map(drop)
            }
        }
    }
}

fn check_finite(name: &str, value: f32) -> Result<(), ControlError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ControlError::NotFinite {
            name: name.to_owned(),
            value,
        })
    }
}

fn wrong_kind(name: &str, expected: &'static str, actual: &Control) -> ControlError {
    ControlError::WrongKind {
        name: name.to_owned(),
        expected,
        actual: actual.kind(),
    }
}
