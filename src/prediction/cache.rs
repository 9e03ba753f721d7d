//! Prediction caches.
//!
//! Two independent policies, picked deliberately per fetch pattern:
//!
//! - [`TimedCache`]: keyed by the document text, entries expire after a
//!   timeout and are evicted lazily on lookup. Suits continuous inline
//!   suggestions where the same text recurs within seconds.
//! - [`CapacityCache`]: keyed by selection bounds plus document text, holds
//!   at most `max_size` entries and evicts in insertion order. Reads do not
//!   refresh an entry. Suits discrete next-edit predictions.
//!
//! Failed predictions are never stored, so a retry always reaches the
//! backend.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::predictor::{EditorState, Prediction, Predictor};
use crate::config::CachePolicy;
use crate::error::{LockResultExt, PredictionResult};

/// Logging target for cache activity.
const LOG_TARGET: &str = "ghost_edit::cache";

/// Default number of entries kept by [`CapacityCache`].
pub const DEFAULT_MAX_SIZE: usize = 20;

/// Default expiry of [`TimedCache`] entries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A cache strategy usable by [`CachedPredictor`].
pub trait PredictionCache: Send + 'static {
    type Key: Send + 'static;

    /// Derive the cache key for an editor state.
    fn key_for(state: &EditorState) -> Self::Key;

    /// Return the cached prediction for `key`, if present and valid.
    fn lookup(&mut self, key: &Self::Key) -> Option<Prediction>;

    /// Store a successful prediction.
    fn store(&mut self, key: Self::Key, prediction: Prediction);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

struct TimedEntry {
    prediction: Prediction,
    timestamp: Instant,
}

/// Time-based cache keyed by the full document text.
pub struct TimedCache {
    entries: HashMap<String, TimedEntry>,
    timeout: Duration,
}

impl Default for TimedCache {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl TimedCache {
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PredictionCache for TimedCache {
    type Key = String;

    fn key_for(state: &EditorState) -> String {
        state.text.clone()
    }

    fn lookup(&mut self, key: &String) -> Option<Prediction> {
        let entry = self.entries.get(key)?;
        if entry.timestamp.elapsed() > self.timeout {
            self.entries.remove(key);
            log::trace!(target: LOG_TARGET, "Evicted expired entry");
            return None;
        }
        Some(entry.prediction.clone())
    }

    fn store(&mut self, key: String, prediction: Prediction) {
        self.entries.insert(
            key,
            TimedEntry {
                prediction,
                timestamp: Instant::now(),
            },
        );
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Composite key of [`CapacityCache`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub selection_start: usize,
    pub selection_end: usize,
    pub text: String,
}

impl Fingerprint {
    pub fn of(state: &EditorState) -> Self {
        Self {
            selection_start: state.selection.from(),
            selection_end: state.selection.to(),
            text: state.text.clone(),
        }
    }
}

/// Capacity-bounded cache with insertion-order eviction.
pub struct CapacityCache {
    entries: LruCache<Fingerprint, Prediction>,
}

impl Default for CapacityCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl CapacityCache {
    /// Create a cache holding at most `max_size` entries (at least one).
    pub fn new(max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn max_size(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains(key)
    }
}

impl PredictionCache for CapacityCache {
    type Key = Fingerprint;

    fn key_for(state: &EditorState) -> Fingerprint {
        Fingerprint::of(state)
    }

    fn lookup(&mut self, key: &Fingerprint) -> Option<Prediction> {
        // peek: a read must not move the entry to the most-recent position
        self.entries.peek(key).cloned()
    }

    fn store(&mut self, key: Fingerprint, prediction: Prediction) {
        // Replace in place so a re-stored key keeps its insertion slot
        if let Some(existing) = self.entries.peek_mut(&key) {
            *existing = prediction;
            return;
        }
        if let Some((evicted, _)) = self.entries.push(key, prediction) {
            log::trace!(
                target: LOG_TARGET,
                "Evicted oldest entry (selection {}..{})",
                evicted.selection_start,
                evicted.selection_end
            );
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Memoizes a delegate predictor with a cache strategy.
pub struct CachedPredictor<P, C> {
    inner: P,
    cache: Mutex<C>,
}

impl<P: Predictor, C: PredictionCache> CachedPredictor<P, C> {
    pub fn new(inner: P, cache: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached predictions.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().recover_poison("CachedPredictor::cached_len").len()
    }

    /// Drop every cached prediction.
    pub fn clear(&self) {
        self.cache.lock().recover_poison("CachedPredictor::clear").clear();
    }
}

impl<P: Predictor, C: PredictionCache> Predictor for CachedPredictor<P, C> {
    async fn predict(
        &self,
        state: &EditorState,
        cancel: &CancellationToken,
    ) -> PredictionResult<Prediction> {
        let key = C::key_for(state);
        let hit = self
            .cache
            .lock()
            .recover_poison("CachedPredictor::predict")
            .lookup(&key);

        if let Some(hit) = hit {
            log::trace!(target: LOG_TARGET, "Cache hit for version {}", state.version);
            // Same text, possibly a newer version number
            return Ok(Prediction {
                version: state.version,
                ..hit
            });
        }

        let prediction = self.inner.predict(state, cancel).await?;
        self.cache
            .lock()
            .recover_poison("CachedPredictor::predict")
            .store(key, prediction.clone());
        Ok(prediction)
    }
}

/// A delegate wrapped in the cache strategy chosen by configuration.
pub enum ConfiguredPredictor<P> {
    Timed(CachedPredictor<P, TimedCache>),
    Capacity(CachedPredictor<P, CapacityCache>),
}

/// Wrap `predictor` in the cache strategy described by `policy`.
pub fn with_cache_policy<P: Predictor>(predictor: P, policy: &CachePolicy) -> ConfiguredPredictor<P> {
    match *policy {
        CachePolicy::Time { timeout } => {
            ConfiguredPredictor::Timed(CachedPredictor::new(predictor, TimedCache::new(timeout)))
        }
        CachePolicy::Capacity { max_size } => ConfiguredPredictor::Capacity(CachedPredictor::new(
            predictor,
            CapacityCache::new(max_size),
        )),
    }
}

impl<P: Predictor> Predictor for ConfiguredPredictor<P> {
    async fn predict(
        &self,
        state: &EditorState,
        cancel: &CancellationToken,
    ) -> PredictionResult<Prediction> {
        match self {
            ConfiguredPredictor::Timed(predictor) => predictor.predict(state, cancel).await,
            ConfiguredPredictor::Capacity(predictor) => predictor.predict(state, cancel).await,
        }
    }
}
