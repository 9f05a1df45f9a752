use std::path::PathBuf;
use std::sync::Arc;

use crate::device::Device;

use super::resource::check_rgba_len;
use super::{
    CacheKey, CacheOutcome, CollisionPolicy, DecodedImage, FsImageLoader, ImageKeying, ImageLoader, ImagePath,
    PixelSource, Rgba8, Texture, TextureCache, TextureConfig, TextureError, TextureFlags,
};

/// Pixel array plus its dimensions, as produced by asset pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureStub {
    pub array: Arc<[u8]>,
    pub size: (u32, u32),
}

/// Creates textures and routes cacheable ones through a [`TextureCache`].
///
/// Cache keys depend on pixel content only. Every cached constructor declares
/// its texture `RGBA`, so two requests with identical bytes always agree on
/// type and share one resource, whatever dimensions they pass. Typed textures
/// come from [`from_type`](Self::from_type) or
/// [`create_render_target`](Self::create_render_target), which bypass the cache.
pub struct TextureManager {
    config: TextureConfig,
    cache: Arc<TextureCache>,
    loader: Box<dyn ImageLoader>,
}

impl TextureManager {
    /// Manager backed by the process-wide cache and the filesystem loader.
    pub fn new(config: TextureConfig) -> Self {
        let cache = TextureCache::global_with(config.cache);
        Self { config, cache, loader: Box::new(FsImageLoader) }
    }

    /// Replaces the cache, e.g. with an isolated instance for tests.
    pub fn with_cache(mut self, cache: Arc<TextureCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    #[inline]
    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &Arc<TextureCache> {
        &self.cache
    }

    pub fn resolve_path(&self, image: &ImagePath) -> PathBuf {
        image.resolve(&self.config.asset_root)
    }

    // ── cached constructors ───────────────────────────────────────────────

    /// Texture over raw RGBA8 rows, shared with any earlier request for the same bytes.
    ///
    /// The length is checked against `width`/`height` only when a new texture is built.
    pub fn from_array(&self, rgba: &[u8], width: u32, height: u32) -> Result<Arc<Texture>, TextureError> {
        let key = CacheKey::of_bytes(rgba);
        let outcome = self.cache.get_or_build(key, || {
            check_rgba_len(rgba, width, height)?;
            let texture = Texture::new(TextureFlags::RGBA, width, height, PixelSource::Array(Arc::from(rgba)));
            log::debug!("texture {}: from array {width}x{height}", texture.id());
            Ok(Arc::new(texture))
        })?;
        self.verify(key, outcome, |t| t.built_from(rgba))
    }

    pub fn from_pixels(&self, pixels: &[Rgba8], width: u32, height: u32) -> Result<Arc<Texture>, TextureError> {
        self.from_array(bytemuck::cast_slice(pixels), width, height)
    }

    pub fn from_stub(&self, stub: &TextureStub) -> Result<Arc<Texture>, TextureError> {
        let (width, height) = stub.size;
        self.from_array(&stub.array, width, height)
    }

    /// Texture over a decoded image file, keyed per [`ImageKeying`].
    pub fn from_image(&self, image: &ImagePath) -> Result<Arc<Texture>, TextureError> {
        let path = self.resolve_path(image);
        match self.config.image_keys {
            ImageKeying::Path => {
                let key = CacheKey::of_path(&path);
                let outcome = self.cache.get_or_build(key, || {
                    let decoded = self.loader.load(&path)?;
                    Ok(Arc::new(image_texture(path.clone(), decoded)))
                })?;
                self.verify(key, outcome, |t| t.has_source_path(&path))
            }
            ImageKeying::Content => {
                let decoded = self.loader.load(&path)?;
                let key = CacheKey::of_bytes(&decoded.rgba);
                let rgba = Arc::clone(&decoded.rgba);
                let outcome = self
                    .cache
                    .get_or_build(key, || Ok(Arc::new(image_texture(path.clone(), decoded))))?;
                self.verify(key, outcome, |t| t.built_from(&rgba))
            }
        }
    }

    // ── uncached constructors ─────────────────────────────────────────────

    /// Empty texture of the given declared type, to be filled later.
    pub fn from_type(&self, flags: TextureFlags) -> Arc<Texture> {
        Arc::new(Texture::new(flags, 0, 0, PixelSource::None))
    }

    /// New render target with all attachments allocated. Never cached.
    ///
    /// Empty `flags` mean `RGBA|DEPTH|STENCIL`.
    pub fn create_render_target(
        &self,
        device: &mut dyn Device,
        flags: TextureFlags,
        width: u32,
        height: u32,
    ) -> Result<Arc<Texture>, TextureError> {
        let texture = Texture::render_target(flags, width, height);
        texture.init_as_render_target(device)?;
        Ok(Arc::new(texture))
    }

    fn verify(
        &self,
        key: CacheKey,
        outcome: CacheOutcome,
        matches: impl FnOnce(&Texture) -> bool,
    ) -> Result<Arc<Texture>, TextureError> {
        if outcome.is_hit() && self.config.collisions == CollisionPolicy::Verify && !matches(outcome.texture()) {
            log::warn!(
                "texture cache: key {key} maps to texture {} with different content",
                outcome.texture().id()
            );
            return Err(TextureError::CacheKeyCollision { key });
        }
        Ok(outcome.into_texture())
    }
}

fn image_texture(path: PathBuf, image: DecodedImage) -> Texture {
    let texture = Texture::new(TextureFlags::RGBA, image.width, image.height, PixelSource::Image { path, image });
    log::debug!("texture {}: from image {}", texture.id(), texture.source_path().unwrap_or_default().display());
    texture
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::device::{HeadlessConfig, HeadlessDevice};
    use crate::texture::CachePolicy;

    /// In-memory loader that counts decodes.
    #[derive(Default)]
    struct CountingLoader {
        loads: Arc<AtomicUsize>,
    }

    impl ImageLoader for CountingLoader {
        fn load(&self, path: &Path) -> Result<DecodedImage, TextureError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if path.ends_with("missing.png") {
                return Err(TextureError::ImageLoad { path: path.to_path_buf(), reason: "not found".into() });
            }
            DecodedImage::new(1, 1, vec![10u8, 20, 30, 255])
        }
    }

    fn manager(config: TextureConfig) -> TextureManager {
        TextureManager::new(config).with_cache(Arc::new(TextureCache::new(CachePolicy::Unbounded)))
    }

    // ── arrays ────────────────────────────────────────────────────────────

    #[test]
    fn identical_bytes_share_one_texture_regardless_of_size() {
        let mgr = manager(TextureConfig::default());
        let bytes = [1u8; 16];
        let a = mgr.from_array(&bytes, 2, 2).unwrap();
        let b = mgr.from_array(&bytes, 4, 1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.size(), (2, 2));
    }

    #[test]
    fn wrong_length_fails_only_when_building() {
        let mgr = manager(TextureConfig::default());
        assert!(matches!(mgr.from_array(&[0u8; 5], 1, 1), Err(TextureError::SizeMismatch { .. })));
        assert!(mgr.cache().is_empty());
    }

    #[test]
    fn pixels_and_stubs_go_through_the_same_key() {
        let mgr = manager(TextureConfig::default());
        let px = [Rgba8::new(1, 2, 3, 4)];
        let a = mgr.from_pixels(&px, 1, 1).unwrap();
        let b = mgr.from_stub(&TextureStub { array: Arc::from(vec![1u8, 2, 3, 4]), size: (1, 1) }).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn verify_rejects_foreign_entry_under_key() {
        let mgr = manager(TextureConfig::default());
        let key = CacheKey::of_bytes(&[7u8; 4]);
        // Plant unrelated content under the key of [7; 4].
        mgr.cache()
            .get_or_build(key, || {
                let tex = Texture::new(TextureFlags::RGBA, 1, 1, PixelSource::Array(Arc::from(vec![0u8; 4])));
                Ok(Arc::new(tex))
            })
            .unwrap();

        let err = mgr.from_array(&[7u8; 4], 1, 1).unwrap_err();
        assert!(matches!(err, TextureError::CacheKeyCollision { key: k } if k == key));
    }

    #[test]
    fn trust_hash_accepts_foreign_entry() {
        let mgr = manager(TextureConfig::default().with_collisions(CollisionPolicy::TrustHash));
        let key = CacheKey::of_bytes(&[7u8; 4]);
        let planted = mgr
            .cache()
            .get_or_build(key, || Ok(Arc::new(Texture::new(TextureFlags::RGBA, 0, 0, PixelSource::None))))
            .unwrap()
            .into_texture();
        assert!(Arc::ptr_eq(&mgr.from_array(&[7u8; 4], 1, 1).unwrap(), &planted));
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn path_keying_decodes_once() {
        let loader = CountingLoader::default();
        let loads = Arc::clone(&loader.loads);
        let mgr = manager(TextureConfig::default().with_asset_root("assets")).with_loader(loader);

        let a = mgr.from_image(&"tile.png".into()).unwrap();
        let b = mgr.from_image(&"tile.png".into()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(a.source_path(), Some(PathBuf::from("assets/tile.png")));
    }

    #[test]
    fn content_keying_shares_across_paths() {
        let loader = CountingLoader::default();
        let loads = Arc::clone(&loader.loads);
        let config = TextureConfig::default().with_image_keys(ImageKeying::Content);
        let mgr = manager(config).with_loader(loader);

        let a = mgr.from_image(&"a.png".into()).unwrap();
        let b = mgr.from_image(&"b.png".into()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn load_failure_propagates_and_is_not_cached() {
        let mgr = manager(TextureConfig::default()).with_loader(CountingLoader::default());
        assert!(matches!(mgr.from_image(&"missing.png".into()), Err(TextureError::ImageLoad { .. })));
        assert!(mgr.cache().is_empty());
    }

    // ── uncached ──────────────────────────────────────────────────────────

    #[test]
    fn render_targets_are_always_distinct() {
        let mgr = manager(TextureConfig::default());
        let mut dev = HeadlessDevice::new(HeadlessConfig::default());
        let a = mgr.create_render_target(&mut dev, TextureFlags::RGBA, 4, 4).unwrap();
        let b = mgr.create_render_target(&mut dev, TextureFlags::RGBA, 4, 4).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.framebuffer(), b.framebuffer());
        assert!(mgr.cache().is_empty());
    }

    #[test]
    fn from_type_is_empty_and_uncached() {
        let mgr = manager(TextureConfig::default());
        let t = mgr.from_type(TextureFlags::RGBA | TextureFlags::FLOAT);
        assert_eq!(t.size(), (0, 0));
        assert_eq!(t.type_string(), "Texture.RGBA|Texture.FLOAT");
        assert!(mgr.cache().is_empty());
    }
}
