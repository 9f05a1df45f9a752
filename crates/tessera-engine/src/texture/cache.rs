use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use lru::LruCache;
use parking_lot::{Condvar, Mutex};
use twox_hash::XxHash64;

use super::{CachePolicy, Texture, TextureError};

/// Content-derived cache key (`xxhash64` digest).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct CacheKey(u64);

impl CacheKey {
    const BYTES_SEED: u64 = 0;
    const PATH_SEED: u64 = 0x7465_7373_6572_6170;

    /// Key of a raw pixel buffer. Dimensions and declared type do not participate.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(XxHash64::oneshot(Self::BYTES_SEED, bytes))
    }

    /// Proxy key of an image file, seeded apart from byte keys.
    pub fn of_path(path: &Path) -> Self {
        Self(XxHash64::oneshot(Self::PATH_SEED, path.as_os_str().as_encoded_bytes()))
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Counters for cache behaviour.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Hits served after waiting on another caller's build.
    pub coalesced: u64,
    pub failed_builds: u64,
    pub evictions: u64,
}

/// Result of [`TextureCache::get_or_build`].
#[derive(Debug, Clone)]
pub enum CacheOutcome {
    Hit(Arc<Texture>),
    Built(Arc<Texture>),
}

impl CacheOutcome {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheOutcome::Hit(_))
    }

    #[inline]
    pub fn texture(&self) -> &Arc<Texture> {
        match self {
            CacheOutcome::Hit(t) | CacheOutcome::Built(t) => t,
        }
    }

    #[inline]
    pub fn into_texture(self) -> Arc<Texture> {
        match self {
            CacheOutcome::Hit(t) | CacheOutcome::Built(t) => t,
        }
    }
}

struct CacheState {
    entries: LruCache<CacheKey, Arc<Texture>>,
    in_flight: HashSet<CacheKey>,
    stats: CacheStats,
}

/// Content-addressed texture cache with single-flight builds.
///
/// At most one build runs per key. Concurrent requesters for that key block
/// until it finishes and then share the result; if the build fails they retry,
/// one of them becoming the next builder.
pub struct TextureCache {
    policy: CachePolicy,
    state: Mutex<CacheState>,
    built: Condvar,
}

static GLOBAL_CACHE: OnceLock<Arc<TextureCache>> = OnceLock::new();

impl TextureCache {
    pub fn new(policy: CachePolicy) -> Self {
        let entries = match policy {
            CachePolicy::Unbounded => LruCache::unbounded(),
            CachePolicy::Bounded(cap) => LruCache::new(cap),
        };
        Self {
            policy,
            state: Mutex::new(CacheState { entries, in_flight: HashSet::new(), stats: CacheStats::default() }),
            built: Condvar::new(),
        }
    }

    /// The process-wide cache, created unbounded on first use.
    pub fn global() -> Arc<TextureCache> {
        Self::global_with(CachePolicy::Unbounded)
    }

    /// The process-wide cache; `policy` applies only if this call creates it.
    pub fn global_with(policy: CachePolicy) -> Arc<TextureCache> {
        let cache = GLOBAL_CACHE.get_or_init(|| {
            log::debug!("texture cache: global instance created ({policy:?})");
            Arc::new(TextureCache::new(policy))
        });
        if cache.policy != policy {
            log::warn!(
                "texture cache: global instance already uses {:?}, ignoring {policy:?}",
                cache.policy
            );
        }
        Arc::clone(cache)
    }

    #[inline]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: CacheKey) -> bool {
        self.state.lock().entries.contains(&key)
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Looks up `key` without building, refreshing its recency.
    pub fn get(&self, key: CacheKey) -> Option<Arc<Texture>> {
        self.state.lock().entries.get(&key).cloned()
    }

    /// Returns the entry for `key`, running `build` if there is none.
    ///
    /// `build` runs without the cache lock held and at most once per key at a time.
    pub fn get_or_build<F>(&self, key: CacheKey, build: F) -> Result<CacheOutcome, TextureError>
    where
        F: FnOnce() -> Result<Arc<Texture>, TextureError>,
    {
        let mut state = self.state.lock();
        let mut waited = false;
        loop {
            if let Some(texture) = state.entries.get(&key).cloned() {
                state.stats.hits += 1;
                if waited {
                    state.stats.coalesced += 1;
                }
                log::trace!("texture cache: hit {key} -> {}", texture.id());
                return Ok(CacheOutcome::Hit(texture));
            }
            if !state.in_flight.contains(&key) {
                break;
            }
            waited = true;
            self.built.wait(&mut state);
        }
        state.in_flight.insert(key);
        state.stats.misses += 1;
        drop(state);

        let flight = InFlight { cache: self, key };
        let texture = match build() {
            Ok(texture) => texture,
            Err(e) => {
                drop(flight);
                self.state.lock().stats.failed_builds += 1;
                log::debug!("texture cache: build for {key} failed: {e}");
                return Err(e);
            }
        };

        {
            let mut state = self.state.lock();
            if let Some((evicted, old)) = state.entries.push(key, Arc::clone(&texture)) {
                if evicted != key {
                    state.stats.evictions += 1;
                    log::debug!("texture cache: evicted {evicted} ({})", old.id());
                }
            }
        }
        drop(flight);

        log::debug!("texture cache: built {key} -> {}", texture.id());
        Ok(CacheOutcome::Built(texture))
    }

    /// Drops every cached reference. In-flight builds are unaffected.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

impl fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TextureCache")
            .field("policy", &self.policy)
            .field("len", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .field("stats", &state.stats)
            .finish()
    }
}

/// Clears the in-flight mark and wakes waiters, including on unwind.
struct InFlight<'a> {
    cache: &'a TextureCache,
    key: CacheKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.cache.state.lock().in_flight.remove(&self.key);
        self.cache.built.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::texture::{PixelSource, TextureFlags};

    fn texture() -> Arc<Texture> {
        Arc::new(Texture::new(TextureFlags::RGBA, 0, 0, PixelSource::None))
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn byte_keys_are_stable_and_content_sensitive() {
        assert_eq!(CacheKey::of_bytes(&[1, 2, 3]), CacheKey::of_bytes(&[1, 2, 3]));
        assert_ne!(CacheKey::of_bytes(&[1, 2, 3]), CacheKey::of_bytes(&[1, 2, 4]));
    }

    #[test]
    fn path_keys_differ_from_byte_keys() {
        let p = Path::new("a.png");
        assert_ne!(CacheKey::of_path(p), CacheKey::of_bytes(b"a.png"));
    }

    #[test]
    fn key_displays_as_hex() {
        assert_eq!(CacheKey::from_raw(0xab).to_string(), "00000000000000ab");
    }

    // ── get_or_build ──────────────────────────────────────────────────────

    #[test]
    fn second_request_hits() {
        let cache = TextureCache::new(CachePolicy::Unbounded);
        let key = CacheKey::from_raw(1);
        let first = cache.get_or_build(key, || Ok(texture())).unwrap();
        let second = cache.get_or_build(key, || panic!("rebuilt")).unwrap();

        assert!(!first.is_hit());
        assert!(second.is_hit());
        assert!(Arc::ptr_eq(first.texture(), second.texture()));
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let cache = TextureCache::new(CachePolicy::Unbounded);
        let key = CacheKey::from_raw(2);
        let err = cache.get_or_build(key, || Err(TextureError::SizeMismatch { width: 1, height: 1, len: 0 }));
        assert!(err.is_err());
        assert!(!cache.contains(key));
        assert_eq!(cache.stats().failed_builds, 1);

        assert!(cache.get_or_build(key, || Ok(texture())).is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn bounded_cache_evicts_least_recent() {
        let cache = TextureCache::new(CachePolicy::Bounded(NonZeroUsize::new(2).unwrap()));
        let (a, b, c) = (CacheKey::from_raw(1), CacheKey::from_raw(2), CacheKey::from_raw(3));
        let kept = cache.get_or_build(a, || Ok(texture())).unwrap().into_texture();
        cache.get_or_build(b, || Ok(texture())).unwrap();
        cache.get(a);
        cache.get_or_build(c, || Ok(texture())).unwrap();

        assert!(cache.contains(a));
        assert!(!cache.contains(b));
        assert_eq!(cache.stats().evictions, 1);
        // Eviction never invalidates handed-out textures.
        assert!(kept.id().raw() > 0);
    }

    #[test]
    fn concurrent_requests_build_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Barrier;

        let cache = Arc::new(TextureCache::new(CachePolicy::Unbounded));
        let builds = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));
        let key = CacheKey::from_raw(42);

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let (cache, builds, barrier) = (Arc::clone(&cache), Arc::clone(&builds), Arc::clone(&barrier));
                std::thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_build(key, || {
                            builds.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            Ok(texture())
                        })
                        .unwrap()
                        .into_texture()
                })
            })
            .collect();

        let ids: Vec<_> = workers.into_iter().map(|w| w.join().unwrap().id()).collect();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(ids.iter().all(|&id| id == ids[0]));
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 7);
    }
}
