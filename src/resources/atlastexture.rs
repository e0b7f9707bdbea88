//! Atlas texture handles and the path-keyed texture store.
//!
//! The cache never decodes or uploads images itself. A [`TextureLoader`]
//! turns a file path into an [`AtlasTexture`] handle (whatever the renderer
//! keeps on the GPU side stays with the loader), and the [`TextureStore`]
//! caches those handles by path so every descriptor naming the same image
//! shares one `Arc<AtlasTexture>`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;

/// A loaded backing texture as seen by the frame cache.
///
/// Compared by identity (`Arc::ptr_eq`) when frames are removed by texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasTexture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl AtlasTexture {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        AtlasTexture {
            path: path.into(),
            width,
            height,
        }
    }
}

/// Produces texture handles from image files.
pub trait TextureLoader: Send + Sync {
    fn load(&mut self, path: &Path) -> Result<AtlasTexture, String>;
}

/// Loader for textures whose size is already known (uploaded elsewhere, or tests).
#[derive(Debug, Default)]
pub struct StaticTextureLoader {
    sizes: FxHashMap<PathBuf, (u32, u32)>,
}

impl StaticTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a known texture size.
    pub fn with(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.sizes.insert(path.into(), (width, height));
        self
    }
}

impl TextureLoader for StaticTextureLoader {
    fn load(&mut self, path: &Path) -> Result<AtlasTexture, String> {
        self.sizes
            .get(path)
            .map(|&(w, h)| AtlasTexture::new(path, w, h))
            .ok_or_else(|| format!("no texture registered for {}", path.display()))
    }
}

/// Reads image dimensions from the IHDR chunk of a PNG file.
///
/// Only the first 24 bytes are read; pixel data is never decoded. Used by
/// tooling that needs frame bounds without a GPU context.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngHeaderLoader;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

impl TextureLoader for PngHeaderLoader {
    fn load(&mut self, path: &Path) -> Result<AtlasTexture, String> {
        let mut header = [0u8; 24];
        File::open(path)
            .and_then(|mut f| f.read_exact(&mut header))
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        if header[..8] != PNG_SIGNATURE || &header[12..16] != b"IHDR" {
            return Err(format!("{} is not a PNG file", path.display()));
        }
        let width = u32::from_be_bytes([header[16], header[17], header[18], header[19]]);
        let height = u32::from_be_bytes([header[20], header[21], header[22], header[23]]);
        Ok(AtlasTexture::new(path, width, height))
    }
}

/// Loaded textures keyed by path, in front of a [`TextureLoader`].
pub struct TextureStore {
    loader: Box<dyn TextureLoader>,
    map: FxHashMap<PathBuf, Arc<AtlasTexture>>,
}

impl TextureStore {
    pub fn new(loader: impl TextureLoader + 'static) -> Self {
        TextureStore {
            loader: Box::new(loader),
            map: FxHashMap::default(),
        }
    }

    /// Return the cached handle for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<AtlasTexture>, String> {
        if let Some(tex) = self.map.get(path) {
            return Ok(tex.clone());
        }
        let tex = Arc::new(self.loader.load(path)?);
        debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            tex.width,
            tex.height
        );
        self.map.insert(path.to_path_buf(), tex.clone());
        Ok(tex)
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Arc<AtlasTexture>> {
        self.map.get(path.as_ref())
    }

    /// Register an externally created texture under its own path.
    pub fn insert(&mut self, texture: Arc<AtlasTexture>) {
        self.map.insert(texture.path.clone(), texture);
    }

    /// Stop referencing the texture at `path`. Frames still holding it keep it alive.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<Arc<AtlasTexture>> {
        self.map.remove(path.as_ref())
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for TextureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureStore")
            .field("textures", &self.map.keys().collect::<Vec<_>>())
            .finish()
    }
}
