//! Asset side of the demos: procedural meshes, texture decoding, the
//! background texture registry and serializable slot manifests.

pub mod error;
pub mod manifest;
pub mod mesh;
pub mod registry;
pub mod texture;

pub use error::AssetError;
pub use manifest::{ManifestEntry, SlotManifest, TextureRef};
pub use mesh::{MeshData, MeshVertex};
pub use registry::{TextureRegistry, TextureSource, TextureState};
pub use texture::{Filter, SamplerSettings, TextureData, TextureFormat, Wrap};
