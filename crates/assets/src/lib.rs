//! Billboard asset pipeline: a path-keyed cache over an asynchronous decoder.
//!
//! The scene consumes assets by texture handle, never by raw file paths. The
//! cache is a performance optimization, not the owner of placed entities:
//! clearing it releases textures but never invalidates entries already handed
//! out.
//!
//! # Invariants
//! - At most one resident entry per path; entries are immutable.
//! - Decode failures are never cached.
//! - No cache borrow is held across a decoder suspension.

mod cache;
mod decoder;

pub use cache::{AssetCache, AssetEntry, AssetLoadError, CacheStats};
pub use decoder::{
    DecodeError, DecodedImage, FileImageDecoder, ImageDecoder, MemoryDecoder, TextureHandle,
};

pub fn crate_info() -> &'static str {
    "standee-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
