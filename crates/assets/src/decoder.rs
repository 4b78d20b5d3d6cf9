use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Opaque handle to a decoded, renderable texture owned by the decoder backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Result of a successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedImage {
    pub texture: TextureHandle,
    /// Pixel `(width, height)`, when the backend can report it.
    pub dimensions: Option<(u32, u32)>,
}

/// Errors from image decoding.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("image decode error: {0}")]
    Format(String),
    /// Unexpected backend failure, not attributable to the asset itself.
    #[error("decoder fault: {0}")]
    Backend(String),
}

/// Asynchronous image decoder backing the asset cache.
///
/// `decode` may suspend; the cache never holds internal borrows across it.
/// `release` hands a texture back to the backend and must be idempotent.
pub trait ImageDecoder {
    fn decode<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<DecodedImage, DecodeError>>;

    fn release(&self, texture: TextureHandle);
}

impl<D: ImageDecoder + ?Sized> ImageDecoder for Rc<D> {
    fn decode<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<DecodedImage, DecodeError>> {
        (**self).decode(path)
    }

    fn release(&self, texture: TextureHandle) {
        (**self).release(texture)
    }
}

/// Monotonic texture handle allocation plus the set of handles not yet released.
#[derive(Debug, Default)]
struct TexturePool {
    next: Cell<u64>,
    live: RefCell<HashSet<TextureHandle>>,
}

impl TexturePool {
    fn allocate(&self) -> TextureHandle {
        let id = self.next.get() + 1;
        self.next.set(id);
        let handle = TextureHandle(id);
        self.live.borrow_mut().insert(handle);
        handle
    }

    fn release(&self, handle: TextureHandle) {
        if !self.live.borrow_mut().remove(&handle) {
            tracing::trace!(?handle, "release of unknown texture ignored");
        }
    }

    fn live_count(&self) -> usize {
        self.live.borrow().len()
    }
}

/// In-process decoder with a table of known images.
///
/// Resolves immediately. Paths that were never registered fail with
/// [`DecodeError::NotFound`]. Counts decode calls so callers can observe
/// cache behavior.
#[derive(Debug, Default)]
pub struct MemoryDecoder {
    images: RefCell<HashMap<String, Option<(u32, u32)>>>,
    textures: TexturePool,
    decodes: Cell<usize>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_image(self, path: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert(path, width, height);
        self
    }

    /// Register an image with known pixel dimensions.
    pub fn insert(&self, path: impl Into<String>, width: u32, height: u32) {
        self.images
            .borrow_mut()
            .insert(path.into(), Some((width, height)));
    }

    /// Register an image whose backend cannot report dimensions.
    pub fn insert_without_dimensions(&self, path: impl Into<String>) {
        self.images.borrow_mut().insert(path.into(), None);
    }

    /// Number of `decode` calls so far, successful or not.
    pub fn decode_count(&self) -> usize {
        self.decodes.get()
    }

    /// Number of textures handed out and not yet released.
    pub fn live_textures(&self) -> usize {
        self.textures.live_count()
    }
}

impl ImageDecoder for MemoryDecoder {
    fn decode<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<DecodedImage, DecodeError>> {
        async move {
            self.decodes.set(self.decodes.get() + 1);
            let dimensions = self
                .images
                .borrow()
                .get(path)
                .copied()
                .ok_or_else(|| DecodeError::NotFound(path.to_string()))?;
            Ok::<_, DecodeError>(DecodedImage {
                texture: self.textures.allocate(),
                dimensions,
            })
        }
        .boxed_local()
    }

    fn release(&self, texture: TextureHandle) {
        self.textures.release(texture);
    }
}

/// Decoder reading image files below a root directory.
///
/// Only the header is probed for pixel dimensions; pixel upload belongs to the
/// render backend, which keys its resources by the returned handle.
#[derive(Debug)]
pub struct FileImageDecoder {
    root: PathBuf,
    textures: TexturePool,
}

impl FileImageDecoder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: TexturePool::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn live_textures(&self) -> usize {
        self.textures.live_count()
    }

    fn probe(&self, path: &str) -> Result<(u32, u32), DecodeError> {
        let full = self.root.join(path);
        let bytes = std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DecodeError::NotFound(full.display().to_string()),
            _ => DecodeError::Io(e),
        })?;
        image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| DecodeError::Format(format!("{}: {e}", full.display())))
    }
}

impl ImageDecoder for FileImageDecoder {
    fn decode<'a>(&'a self, path: &'a str) -> LocalBoxFuture<'a, Result<DecodedImage, DecodeError>> {
        async move {
            let dimensions = self.probe(path)?;
            tracing::trace!(path, ?dimensions, "probed image");
            Ok::<_, DecodeError>(DecodedImage {
                texture: self.textures.allocate(),
                dimensions: Some(dimensions),
            })
        }
        .boxed_local()
    }

    fn release(&self, texture: TextureHandle) {
        self.textures.release(texture);
    }
}
