use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Retention of the texture cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum CachePolicy {
    /// Entries live for the whole run.
    #[default]
    Unbounded,
    /// Least-recently-used entries are dropped past the capacity. Evicting only
    /// releases the cache's reference.
    Bounded(NonZeroUsize),
}

/// Cache key used by `from_image`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ImageKeying {
    /// Hash of the resolved path. Skips decoding on a hit, but a file edited
    /// in place keeps serving the old pixels.
    #[default]
    Path,
    /// Hash of the decoded pixels. Always decodes.
    Content,
}

/// What a cache hit does with the stored entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum CollisionPolicy {
    /// Compare full content (or path) and fail with `CacheKeyCollision` on mismatch.
    #[default]
    Verify,
    /// Accept any entry stored under the key.
    TrustHash,
}

/// Texture manager settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureConfig {
    /// Root for relative image paths.
    pub asset_root: PathBuf,
    pub cache: CachePolicy,
    pub image_keys: ImageKeying,
    pub collisions: CollisionPolicy,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            cache: CachePolicy::default(),
            image_keys: ImageKeying::default(),
            collisions: CollisionPolicy::default(),
        }
    }
}

impl TextureConfig {
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_image_keys(mut self, keys: ImageKeying) -> Self {
        self.image_keys = keys;
        self
    }

    pub fn with_collisions(mut self, collisions: CollisionPolicy) -> Self {
        self.collisions = collisions;
        self
    }
}
