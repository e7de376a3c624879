use std::{
    io,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use image::RgbaImage;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },
    #[error("failed to decode {path} as a raster image")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read asset {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Read-only storage that assets are loaded from.
///
/// Implementations report a missing path with [`io::ErrorKind::NotFound`].
pub trait ResourceTree {
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Loads assets by logical path, e.g. `dice/dice.png`.
pub trait AssetSource {
    fn get(&mut self, path: &str) -> Result<Arc<[u8]>, AssetError>;

    fn get_image(&mut self, path: &str) -> Result<Arc<RgbaImage>, AssetError> {
        let bytes = self.get(path)?;
        decode_image(path, &bytes).map(Arc::new)
    }
}

pub fn decode_image(path: &str, bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Decode {
            path: path.to_string(),
            source,
        })
}

/// Resources compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct Bundle {
    entries: &'static [(&'static str, &'static [u8])],
}

static DICE_ENTRIES: &[(&str, &[u8])] = &[
    (
        "dice/dice.png",
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/dice/dice.png")),
    ),
    (
        "dice/dice.svg",
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/dice/dice.svg")),
    ),
];

impl Bundle {
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }

    /// The dice sheet and its companion files.
    pub const fn dice() -> Self {
        Self::new(DICE_ENTRIES)
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(path, _)| *path)
    }
}

impl ResourceTree for Bundle {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.entries
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

/// Resources read from a directory on disk, relative to `root`.
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        // logical paths never leave the tree
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ResourceTree for DirTree {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        std::fs::read(full_path)
    }
}

/// Caching [`AssetSource`] over a [`ResourceTree`].
///
/// Resources are immutable for the lifetime of the process, so entries are
/// never evicted.
#[derive(Debug)]
pub struct AssetManager<T> {
    cache: FxHashMap<String, Arc<[u8]>>,
    tree: T,
}

impl AssetManager<Bundle> {
    pub fn bundled() -> Self {
        Self::new(Bundle::dice())
    }
}

impl<T: ResourceTree> AssetManager<T> {
    pub fn new(tree: T) -> Self {
        Self {
            cache: FxHashMap::default(),
            tree,
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.contains_key(path)
    }

    pub fn cached_paths(&self) -> impl Iterator<Item = &str> {
        self.cache.keys().map(String::as_str)
    }
}

impl<T: ResourceTree> AssetSource for AssetManager<T> {
    fn get(&mut self, path: &str) -> Result<Arc<[u8]>, AssetError> {
        if let Some(data) = self.cache.get(path) {
            log::debug!("Asset cache hit: {}", path);
            return Ok(data.clone());
        }

        let data = self.tree.read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound {
                path: path.to_string(),
            },
            _ => AssetError::Io {
                path: path.to_string(),
                source,
            },
        })?;
        log::debug!("Loaded asset {} ({} bytes)", path, data.len());

        let data: Arc<[u8]> = data.into();
        self.cache.insert(path.to_string(), data.clone());
        Ok(data)
    }
}

/// Picks the compiled bundle or a directory override.
#[derive(Debug, Clone)]
pub enum AnyTree {
    Bundle(Bundle),
    Dir(DirTree),
}

impl AnyTree {
    pub fn from_override(asset_dir: Option<&Path>) -> Self {
        match asset_dir {
            Some(dir) => AnyTree::Dir(DirTree::new(dir)),
            None => AnyTree::Bundle(Bundle::dice()),
        }
    }
}

impl ResourceTree for AnyTree {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        match self {
            AnyTree::Bundle(bundle) => bundle.read(path),
            AnyTree::Dir(dir) => dir.read(path),
        }
    }
}
