//! High-level get-or-render cache with per-run eviction.
//!
//! [`AssetCache`] ties the [`ArtifactStore`] to the generation pipeline. A
//! pipeline run for one asset kind opens a [`CacheRun`], routes every render
//! through [`AssetCache::get_or_render`], and hands the run back to
//! [`AssetCache::sweep`] once all renders have finished. The sweep deletes
//! every entry of that kind the run did not touch.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use pwa_common::AssetKind;

use crate::artifact::ArtifactStore;
use crate::key::{CacheKey, RenderRequest};

/// Location of the image cache relative to a project root.
pub const PROJECT_CACHE_DIR: &str = ".pwa/cache/images";

/// Keys touched by one generation run of one asset kind.
///
/// Created by [`AssetCache::begin_run`] and consumed by [`AssetCache::sweep`].
/// Runs for different kinds are independent values, so a favicon run can never
/// keep a splash entry alive or cause one to be evicted.
#[derive(Debug)]
pub struct CacheRun {
    kind: AssetKind,
    touched: Mutex<HashSet<CacheKey>>,
}

impl CacheRun {
    /// The asset kind this run generates.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Returns the keys touched so far, sorted.
    pub fn touched(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = lock(&self.touched).iter().copied().collect();
        keys.sort();
        keys
    }

    fn touch(&self, key: CacheKey) {
        lock(&self.touched).insert(key);
    }

    fn into_touched(self) -> HashSet<CacheKey> {
        self.touched
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Content-addressable store of rendered image bytes.
///
/// Safe to share between threads. Concurrent calls for distinct keys run
/// independently; concurrent calls for the same key are serialized so the
/// render closure runs at most once per key while an entry can be persisted.
/// All disk problems degrade to cache misses or skipped deletions; the cache
/// never turns an otherwise successful render into an error.
#[derive(Debug)]
pub struct AssetCache {
    store: ArtifactStore,
    tool_version: String,
    in_flight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    hits: AtomicUsize,
    renders: AtomicUsize,
}

impl AssetCache {
    /// Opens a cache rooted at `cache_dir`. Directories are created lazily.
    pub fn open(cache_dir: &Path) -> Self {
        Self {
            store: ArtifactStore::new(cache_dir),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            in_flight: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            renders: AtomicUsize::new(0),
        }
    }

    /// Opens the conventional cache of a project.
    pub fn for_project(project_root: &Path) -> Self {
        Self::open(&project_root.join(PROJECT_CACHE_DIR))
    }

    /// Root directory of this cache.
    pub fn cache_dir(&self) -> &Path {
        self.store.cache_dir()
    }

    /// Path an entry for `request` is (or would be) stored at.
    pub fn entry_path(&self, request: &RenderRequest) -> PathBuf {
        self.store
            .entry_path(request.kind, &CacheKey::for_request(request))
    }

    /// Starts a generation run for `kind` with an empty touched set.
    pub fn begin_run(&self, kind: AssetKind) -> CacheRun {
        CacheRun {
            kind,
            touched: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the cached bytes for `request`, rendering them on a miss.
    ///
    /// On a hit `render` is not called. On a miss it is called exactly once
    /// and its output is persisted before being returned. Either way the key
    /// is recorded in `run`. If `render` fails, its error is returned as is and
    /// nothing is stored or touched.
    ///
    /// # Panics
    ///
    /// Panics if `request.kind` differs from the kind `run` was started for.
    pub fn get_or_render<E, F>(
        &self,
        run: &CacheRun,
        request: &RenderRequest,
        render: F,
    ) -> Result<Vec<u8>, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        assert_eq!(
            run.kind, request.kind,
            "request kind must match the run it is recorded in"
        );

        let key = CacheKey::for_request(request);
        let slot = self.key_slot(key);
        let result = {
            let _guard = lock(&slot);
            self.load_or_render(request, key, render)
        };
        self.release_slot(key, slot);

        let bytes = result?;
        run.touch(key);
        Ok(bytes)
    }

    /// Deletes every entry of the run's kind that the run did not touch.
    ///
    /// Returns the number of entries removed. Failures are logged and never
    /// propagated: a sweep problem must not fail a generation that already
    /// produced its outputs.
    pub fn sweep(&self, run: CacheRun) -> usize {
        let kind = run.kind;
        let live = run.into_touched();
        match self.store.gc(kind, &live) {
            Ok(removed) => {
                tracing::info!(%kind, kept = live.len(), removed, "swept image cache");
                removed
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "image cache sweep failed");
                0
            }
        }
    }

    /// Lists the keys currently stored for `kind`, sorted.
    pub fn entries(&self, kind: AssetKind) -> Vec<CacheKey> {
        self.store.list(kind).unwrap_or_else(|e| {
            tracing::warn!(%kind, error = %e, "failed to list image cache");
            Vec::new()
        })
    }

    /// Number of lookups answered from disk since the cache was opened.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of render closures invoked since the cache was opened.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    fn load_or_render<E, F>(
        &self,
        request: &RenderRequest,
        key: CacheKey,
        render: F,
    ) -> Result<Vec<u8>, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        match self.store.read_entry(request.kind, &key) {
            Ok(Some(bytes)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(kind = %request.kind, %key, "image cache hit");
                return Ok(bytes);
            }
            Ok(None) => {
                tracing::debug!(kind = %request.kind, %key, "image cache miss");
            }
            Err(e) => {
                tracing::warn!(kind = %request.kind, %key, error = %e, "discarding unreadable cache entry");
            }
        }

        self.renders.fetch_add(1, Ordering::Relaxed);
        let bytes = render()?;

        if let Err(e) = self
            .store
            .write_entry(request.kind, &key, &bytes, &self.tool_version)
        {
            tracing::warn!(kind = %request.kind, %key, error = %e, "failed to persist rendered image");
        }
        Ok(bytes)
    }

    fn key_slot(&self, key: CacheKey) -> Arc<Mutex<()>> {
        lock(&self.in_flight).entry(key).or_default().clone()
    }

    /// Drops the per-key lock once nobody else holds or waits on it.
    fn release_slot(&self, key: CacheKey, slot: Arc<Mutex<()>>) {
        let mut map = lock(&self.in_flight);
        // One reference in the map, one in `slot`.
        if Arc::strong_count(&slot) == 2 {
            map.remove(&key);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
