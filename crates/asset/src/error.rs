use std::path::PathBuf;

use corelib::{MaterialError, TextureHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// A declared texture could not be read or decoded.
    #[error("failed to load texture {path:?}: {reason}")]
    ResourceLoadFailure { path: PathBuf, reason: String },

    #[error("unknown texture handle {0:?}")]
    UnknownHandle(TextureHandle),

    /// Generated textures have no file to point at.
    #[error("texture {0:?} has no source path")]
    NoSourcePath(TextureHandle),

    #[error("invalid slot manifest: {0}")]
    Manifest(String),

    #[error(transparent)]
    Material(#[from] MaterialError),
}
