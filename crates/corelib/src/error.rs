//! Errors raised while mutating materials.

use thiserror::Error;

use crate::property::{PropertyId, TextureProperty};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaterialError {
    /// A control reported a label that the texture slot does not contain.
    #[error("unknown texture label '{label}' for {property}")]
    UnknownLabel {
        label: String,
        property: TextureProperty,
    },

    #[error("texture slot already contains label '{0}'")]
    DuplicateLabel(String),

    /// Value kind does not match the property kind (e.g. a scalar for a texture).
    #[error("cannot assign {got} value to {property}")]
    KindMismatch {
        property: PropertyId,
        got: &'static str,
    },

    #[error("unknown material property '{0}'")]
    UnknownProperty(String),
}

pub type MaterialResult<T> = Result<T, MaterialError>;
