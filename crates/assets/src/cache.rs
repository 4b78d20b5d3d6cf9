use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::decoder::{DecodeError, ImageDecoder, TextureHandle};

/// A decoded billboard asset, unique per path while resident.
///
/// Immutable once created. Placed entities share it through `Rc`; the cache
/// is not the owner of their lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    path: String,
    texture: TextureHandle,
    pixel_width: u32,
    pixel_height: u32,
}

impl AssetEntry {
    pub fn new(
        path: impl Into<String>,
        texture: TextureHandle,
        pixel_width: u32,
        pixel_height: u32,
    ) -> Self {
        Self {
            path: path.into(),
            texture,
            pixel_width,
            pixel_height,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Pixel width; 0 when the decoder could not report it.
    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    /// Pixel height; 0 when the decoder could not report it.
    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// Width over height, or 1.0 when either dimension is unknown.
    pub fn aspect(&self) -> f32 {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            1.0
        } else {
            self.pixel_width as f32 / self.pixel_height as f32
        }
    }
}

/// A decode failure for a specific asset path.
#[derive(Debug, thiserror::Error)]
#[error("failed to load asset {path}: {cause}")]
pub struct AssetLoadError {
    pub path: String,
    #[source]
    pub cause: DecodeError,
}

/// Counters for cache instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub failures: u64,
    /// Entries overwritten by a concurrent load of the same path.
    pub replaced: u64,
}

/// Path-keyed memoization of decoded assets.
///
/// `load` is the only operation that suspends. Concurrent loads of the same
/// path are not de-duplicated; whichever decode finishes last owns the slot
/// and the displaced texture is released.
pub struct AssetCache<D> {
    decoder: D,
    entries: RefCell<HashMap<String, Rc<AssetEntry>>>,
    stats: Cell<CacheStats>,
}

impl<D: ImageDecoder> AssetCache<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            entries: RefCell::new(HashMap::new()),
            stats: Cell::new(CacheStats::default()),
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Resident entry for `path`, without decoding.
    pub fn get(&self, path: &str) -> Option<Rc<AssetEntry>> {
        self.entries.borrow().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.borrow().contains_key(path)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    /// Return the resident entry for `path`, decoding it first if needed.
    ///
    /// A resident path completes on first poll without touching the decoder.
    /// Failures are not cached; a later call retries the decode.
    pub async fn load(&self, path: &str) -> Result<Rc<AssetEntry>, AssetLoadError> {
        if let Some(entry) = self.get(path) {
            self.bump(|s| s.hits += 1);
            tracing::debug!(path, "asset cache hit");
            return Ok(entry);
        }

        self.bump(|s| s.misses += 1);
        tracing::debug!(path, "asset cache miss, decoding");

        let decoded = match self.decoder.decode(path).await {
            Ok(decoded) => decoded,
            Err(cause) => {
                self.bump(|s| s.failures += 1);
                tracing::warn!(path, error = %cause, "asset decode failed");
                return Err(AssetLoadError {
                    path: path.to_string(),
                    cause,
                });
            }
        };

        let (width, height) = decoded.dimensions.unwrap_or_else(|| {
            tracing::debug!(path, "decoder reported no dimensions, assuming square");
            (0, 0)
        });
        let entry = Rc::new(AssetEntry::new(path, decoded.texture, width, height));

        let displaced = self
            .entries
            .borrow_mut()
            .insert(path.to_string(), Rc::clone(&entry));
        // The displaced texture may back a placed entity; only `clear` releases.
        if let Some(old) = displaced {
            self.bump(|s| s.replaced += 1);
            tracing::debug!(path, old = ?old.texture, new = ?entry.texture, "concurrent load replaced entry");
        }

        tracing::debug!(path, width, height, texture = ?entry.texture, "asset cached");
        Ok(entry)
    }

    /// Release every resident texture and empty the cache.
    ///
    /// Entries already handed out stay valid as values; the next `load` of any
    /// path decodes again.
    pub fn clear(&self) {
        let drained: Vec<Rc<AssetEntry>> = self
            .entries
            .borrow_mut()
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        for entry in &drained {
            self.decoder.release(entry.texture);
        }
        tracing::debug!(released = drained.len(), "asset cache cleared");
    }

    fn bump(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl<D> std::fmt::Debug for AssetCache<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("entries", &self.entries.borrow().len())
            .field("stats", &self.stats.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{DecodedImage, MemoryDecoder};
    use futures::FutureExt;
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::future::LocalBoxFuture;
    use futures::task::LocalSpawnExt;
    use std::collections::VecDeque;

    fn memory_cache() -> (Rc<MemoryDecoder>, AssetCache<Rc<MemoryDecoder>>) {
        let decoder = Rc::new(
            MemoryDecoder::new()
                .with_image("wide.png", 200, 100)
                .with_image("tall.png", 50, 100),
        );
        let cache = AssetCache::new(Rc::clone(&decoder));
        (decoder, cache)
    }

    /// Decoder whose calls complete only when the test sends on their gate.
    #[derive(Default)]
    struct GatedDecoder {
        gates: RefCell<VecDeque<oneshot::Receiver<DecodedImage>>>,
        released: RefCell<Vec<TextureHandle>>,
    }

    impl GatedDecoder {
        fn gate(&self) -> oneshot::Sender<DecodedImage> {
            let (tx, rx) = oneshot::channel();
            self.gates.borrow_mut().push_back(rx);
            tx
        }
    }

    impl ImageDecoder for GatedDecoder {
        fn decode<'a>(
            &'a self,
            _path: &'a str,
        ) -> LocalBoxFuture<'a, Result<DecodedImage, DecodeError>> {
            let gate = self.gates.borrow_mut().pop_front();
            async move {
                match gate {
                    Some(rx) => rx
                        .await
                        .map_err(|_| DecodeError::Backend("gate dropped".into())),
                    None => Err(DecodeError::Backend("no gate".into())),
                }
            }
            .boxed_local()
        }

        fn release(&self, texture: TextureHandle) {
            self.released.borrow_mut().push(texture);
        }
    }

    #[test]
    fn second_load_is_a_cache_hit() {
        let (decoder, cache) = memory_cache();
        let first = block_on(cache.load("wide.png")).unwrap();
        let second = block_on(cache.load("wide.png")).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(decoder.decode_count(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn resident_load_completes_on_first_poll() {
        let (_decoder, cache) = memory_cache();
        block_on(cache.load("wide.png")).unwrap();
        let ready = cache.load("wide.png").now_or_never();
        assert!(matches!(ready, Some(Ok(_))));
    }

    #[test]
    fn clear_releases_and_forces_redecode() {
        let (decoder, cache) = memory_cache();
        let before = block_on(cache.load("wide.png")).unwrap();
        block_on(cache.load("tall.png")).unwrap();
        assert_eq!(decoder.live_textures(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(decoder.live_textures(), 0);
        // Entries handed out before the clear remain usable values.
        assert_eq!(before.aspect(), 2.0);

        let after = block_on(cache.load("wide.png")).unwrap();
        assert_eq!(decoder.decode_count(), 3);
        assert_ne!(before.texture(), after.texture());
    }

    #[test]
    fn failures_are_not_cached() {
        let (decoder, cache) = memory_cache();
        let err = block_on(cache.load("later.png")).unwrap_err();
        assert_eq!(err.path, "later.png");
        assert!(matches!(err.cause, DecodeError::NotFound(_)));
        assert!(!cache.contains("later.png"));

        decoder.insert("later.png", 10, 10);
        let entry = block_on(cache.load("later.png")).unwrap();
        assert_eq!(entry.aspect(), 1.0);
        assert_eq!(decoder.decode_count(), 2);
        assert_eq!(cache.stats().failures, 1);
    }

    #[test]
    fn aspect_from_pixel_dimensions() {
        let (_decoder, cache) = memory_cache();
        assert_eq!(block_on(cache.load("wide.png")).unwrap().aspect(), 2.0);
        assert_eq!(block_on(cache.load("tall.png")).unwrap().aspect(), 0.5);
    }

    #[test]
    fn missing_dimensions_default_to_square() {
        let decoder = MemoryDecoder::new();
        decoder.insert_without_dimensions("blob.png");
        let cache = AssetCache::new(decoder);
        let entry = block_on(cache.load("blob.png")).unwrap();
        assert_eq!(entry.pixel_width(), 0);
        assert_eq!(entry.aspect(), 1.0);
    }

    #[test]
    fn concurrent_loads_last_completion_wins() {
        let decoder = GatedDecoder::default();
        let gate_a = decoder.gate();
        let gate_b = decoder.gate();
        let cache = Rc::new(AssetCache::new(decoder));

        let mut pool = LocalPool::new();
        let results: Rc<RefCell<Vec<TextureHandle>>> = Rc::default();
        for _ in 0..2 {
            let cache = Rc::clone(&cache);
            let results = Rc::clone(&results);
            pool.spawner()
                .spawn_local(async move {
                    let entry = cache.load("a.png").await.unwrap();
                    results.borrow_mut().push(entry.texture());
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert!(cache.is_empty());

        gate_b
            .send(DecodedImage {
                texture: TextureHandle(2),
                dimensions: Some((1, 1)),
            })
            .unwrap();
        pool.run_until_stalled();
        gate_a
            .send(DecodedImage {
                texture: TextureHandle(1),
                dimensions: Some((1, 1)),
            })
            .unwrap();
        pool.run_until_stalled();

        assert_eq!(*results.borrow(), vec![TextureHandle(2), TextureHandle(1)]);
        assert_eq!(cache.get("a.png").unwrap().texture(), TextureHandle(1));
        assert!(cache.decoder().released.borrow().is_empty());
        assert_eq!(cache.stats().replaced, 1);

        cache.clear();
        assert_eq!(*cache.decoder().released.borrow(), vec![TextureHandle(1)]);
    }
}
