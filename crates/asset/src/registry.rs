//! Texture registry: hands out [`TextureHandle`]s immediately and decodes
//! image files on background threads.
//!
//! The render loop polls [`TextureRegistry::generation`] each frame and picks
//! up textures once they turn [`TextureState::Ready`]. A failed decode is
//! logged and the texture stays absent; nothing downstream aborts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use corelib::TextureHandle;
use parking_lot::RwLock;

use crate::error::AssetError;
use crate::texture::{SamplerSettings, TextureData};

#[derive(Clone, Debug)]
pub enum TextureState {
    Pending,
    Ready(Arc<TextureData>),
    Failed(String),
}

impl TextureState {
    pub fn is_ready(&self) -> bool {
        matches!(self, TextureState::Ready(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    File(PathBuf),
    Generated(String),
}

#[derive(Debug)]
struct Entry {
    source: TextureSource,
    sampler: SamplerSettings,
    state: TextureState,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<Entry>,
    /// Bumped whenever any entry leaves `Pending`.
    generation: u64,
}

/// Shared, cloneable handle to the texture table.
#[derive(Clone, Debug, Default)]
pub struct TextureRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `path` in the background and return its handle.
    ///
    /// The same path with the same sampler settings always yields the same handle.
    pub fn load(&self, path: impl AsRef<Path>, sampler: SamplerSettings) -> TextureHandle {
        let path = path.as_ref().to_path_buf();
        let (handle, fresh) = self.reserve(&path, sampler);
        if !fresh {
            return handle;
        }

        let registry = self.clone();
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name(format!("texture-loader-{}", handle.0))
            .spawn(move || {
                let result = TextureData::load(&worker_path, sampler);
                registry.finish(handle, result);
            });

        if let Err(e) = spawned {
            log::warn!("Could not spawn texture loader ({e}); decoding {:?} inline", path);
            self.finish(handle, TextureData::load(&path, sampler));
        }
        handle
    }

    /// Load `path` on the calling thread. Returns the handle even on failure;
    /// the failure is logged and recorded in the entry state.
    pub fn load_blocking(&self, path: impl AsRef<Path>, sampler: SamplerSettings) -> TextureHandle {
        let path = path.as_ref();
        let (handle, fresh) = self.reserve(path, sampler);
        if fresh {
            self.finish(handle, TextureData::load(path, sampler));
        }
        handle
    }

    /// Register an in-memory texture under a descriptive name.
    pub fn insert(&self, name: impl Into<String>, data: TextureData) -> TextureHandle {
        let mut inner = self.inner.write();
        let handle = TextureHandle(inner.entries.len() as u32);
        inner.entries.push(Entry {
            source: TextureSource::Generated(name.into()),
            sampler: data.sampler,
            state: TextureState::Ready(Arc::new(data)),
        });
        inner.generation += 1;
        handle
    }

    pub fn state(&self, handle: TextureHandle) -> Option<TextureState> {
        self.inner
            .read()
            .entries
            .get(handle.0 as usize)
            .map(|e| e.state.clone())
    }

    /// Decoded data, if the texture finished loading.
    pub fn get(&self, handle: TextureHandle) -> Option<Arc<TextureData>> {
        match self.state(handle)? {
            TextureState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_ready(&self, handle: TextureHandle) -> bool {
        self.state(handle).is_some_and(|s| s.is_ready())
    }

    pub fn sampler(&self, handle: TextureHandle) -> Option<SamplerSettings> {
        self.inner
            .read()
            .entries
            .get(handle.0 as usize)
            .map(|e| e.sampler)
    }

    /// File path and sampler for a file-backed texture.
    pub fn file_source(&self, handle: TextureHandle) -> Result<(PathBuf, SamplerSettings), AssetError> {
        let inner = self.inner.read();
        let entry = inner
            .entries
            .get(handle.0 as usize)
            .ok_or(AssetError::UnknownHandle(handle))?;
        match &entry.source {
            TextureSource::File(path) => Ok((path.clone(), entry.sampler)),
            TextureSource::Generated(_) => Err(AssetError::NoSourcePath(handle)),
        }
    }

    /// Changes whenever a texture finishes (successfully or not).
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    pub fn pending_count(&self) -> usize {
        self.inner
            .read()
            .entries
            .iter()
            .filter(|e| matches!(e.state, TextureState::Pending))
            .count()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the entry for (path, sampler) or append a pending one.
    fn reserve(&self, path: &Path, sampler: SamplerSettings) -> (TextureHandle, bool) {
        let mut inner = self.inner.write();
        let existing = inner.entries.iter().position(|e| {
            e.sampler == sampler && matches!(&e.source, TextureSource::File(p) if p == path)
        });
        if let Some(index) = existing {
            return (TextureHandle(index as u32), false);
        }

        let handle = TextureHandle(inner.entries.len() as u32);
        inner.entries.push(Entry {
            source: TextureSource::File(path.to_path_buf()),
            sampler,
            state: TextureState::Pending,
        });
        (handle, true)
    }

    fn finish(&self, handle: TextureHandle, result: Result<TextureData, AssetError>) {
        let state = match result {
            Ok(data) => TextureState::Ready(Arc::new(data)),
            Err(err) => {
                log::warn!("{err}; continuing without this texture");
                TextureState::Failed(err.to_string())
            }
        };

        let mut inner = self.inner.write();
        if let Some(entry) = inner.entries.get_mut(handle.0 as usize) {
            entry.state = state;
        }
        inner.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn temp_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("asset-registry-{}-{name}", std::process::id()));
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn same_path_and_sampler_share_a_handle() {
        let registry = TextureRegistry::new();
        let path = temp_png("shared.png");
        let a = registry.load_blocking(&path, SamplerSettings::default());
        let b = registry.load_blocking(&path, SamplerSettings::default());
        let c = registry.load_blocking(&path, SamplerSettings::nearest());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);

        let data = registry.get(a).unwrap();
        assert_eq!((data.width, data.height), (4, 2));
    }

    #[test]
    fn failed_load_is_recorded_not_fatal() {
        let registry = TextureRegistry::new();
        let before = registry.generation();
        let handle = registry.load_blocking("missing/texture.jpg", SamplerSettings::default());
        assert!(matches!(registry.state(handle), Some(TextureState::Failed(_))));
        assert!(registry.get(handle).is_none());
        assert!(registry.generation() > before);
    }

    #[test]
    fn background_load_becomes_ready() {
        let registry = TextureRegistry::new();
        let path = temp_png("async.png");
        let handle = registry.load(&path, SamplerSettings::repeating(8.0, 8.0));

        let deadline = Instant::now() + Duration::from_secs(10);
        while !registry.is_ready(handle) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(registry.is_ready(handle));
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.get(handle).unwrap().sampler.repeat, [8.0, 8.0]);
    }

    #[test]
    fn background_load_failure_is_recorded() {
        let registry = TextureRegistry::new();
        let before = registry.generation();
        let handle = registry.load("missing/async.jpg", SamplerSettings::default());

        let deadline = Instant::now() + Duration::from_secs(10);
        while matches!(registry.state(handle), Some(TextureState::Pending)) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(registry.state(handle), Some(TextureState::Failed(_))));
        assert!(registry.get(handle).is_none());
        assert!(registry.generation() > before);
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn generated_textures_have_no_file_source() {
        let registry = TextureRegistry::new();
        let handle = registry.insert("checker", TextureData::checkerboard(8));
        assert!(registry.is_ready(handle));
        assert!(matches!(
            registry.file_source(handle),
            Err(AssetError::NoSourcePath(_))
        ));
    }
}
