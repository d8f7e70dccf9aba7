/*!
 * Reload coordinator: builds and atomically publishes translation state.
 *
 * The active `TranslationSnapshot` and `TextureCache` are owned here and
 * shared read-only with every consumer. A reload builds a brand-new pair
 * and swaps it in under a single write lock, so a lookup racing a reload
 * observes either the fully-old or the fully-new state, never a mix.
 * When asynchronous loading is enabled the build runs on a blocking
 * worker and only the final pointer swap touches shared state.
 */

use anyhow::{Context, Result};
use log::{info, warn};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::repository::{self, LoadSummary, TranslationSnapshot};
use crate::texture_cache::TextureCache;

/// The currently published snapshot/cache pair. Replaced wholesale, never
/// mutated in place.
struct Published {
    snapshot: Arc<TranslationSnapshot>,
    textures: Arc<TextureCache>,
}

/// Read handle onto the currently published translation state. Cheap to
/// clone; every clone observes the same publications.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<RwLock<Published>>,
}

impl SharedState {
    /// State with an empty snapshot and a fileless cache: lookups pass
    /// input through unchanged and texture requests always miss
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Published {
                snapshot: Arc::new(TranslationSnapshot::empty()),
                textures: Arc::new(TextureCache::empty(0)),
            })),
        }
    }

    /// The currently published translation snapshot
    pub fn snapshot(&self) -> Arc<TranslationSnapshot> {
        self.inner.read().snapshot.clone()
    }

    /// The currently published texture cache
    pub fn textures(&self) -> Arc<TextureCache> {
        self.inner.read().textures.clone()
    }

    /// Swap in a new snapshot/cache pair as a single unit
    fn publish(&self, snapshot: Arc<TranslationSnapshot>, textures: Arc<TextureCache>) {
        *self.inner.write() = Published { snapshot, textures };
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Owns the reload lifecycle: building fresh state from disk and
/// publishing it atomically
pub struct ReloadCoordinator {
    shared: SharedState,
    loading: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl ReloadCoordinator {
    /// Create a coordinator starting from empty published state
    pub fn new() -> Self {
        Self {
            shared: SharedState::empty(),
            loading: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A read handle for consumers; remains valid across reloads
    pub fn shared(&self) -> SharedState {
        self.shared.clone()
    }

    /// Whether a load pass is currently running
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    /// Request cancellation of an in-flight load pass. Honored between
    /// files; a cancelled pass publishes what it accumulated.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Cancel any in-flight load and publish empty state: lookups pass
    /// through unchanged and texture requests always miss
    pub fn unload(&self) {
        self.cancel();
        self.shared.publish(
            Arc::new(TranslationSnapshot::empty()),
            Arc::new(TextureCache::empty(0)),
        );
        info!("Translation state unloaded");
    }

    /// Rebuild the translation snapshot and texture cache from disk for
    /// the configured target language, then publish both as a single
    /// unit. Honors `config.enable_async_loading` for where the build
    /// runs. Missing directories degrade to empty state rather than
    /// failing the host.
    pub async fn reload(&self, config: &Config) -> Result<LoadSummary> {
        let text_dir = config.text_dir();
        let texture_dir = config.texture_dir();
        let capacity = config.texture_cache_capacity;

        // First-run convenience, mirrors the directory layout users expect
        for dir in [&text_dir, &texture_dir] {
            if let Err(e) = FileManager::ensure_dir(dir) {
                warn!("Could not create translation directory {:?}: {}", dir, e);
            }
        }

        self.cancel.store(false, Ordering::Relaxed);
        self.loading.store(true, Ordering::Relaxed);

        let built = if config.enable_async_loading {
            info!("Starting asynchronous translation loading");
            let cancel = self.cancel.clone();
            let result = tokio::task::spawn_blocking(move || {
                let (snapshot, summary) = repository::load_from_dir(&text_dir, Some(&cancel));
                let textures = TextureCache::build(&texture_dir, capacity);
                (snapshot, summary, textures)
            })
            .await
            .context("Translation load task failed");

            match result {
                Ok(built) => built,
                Err(e) => {
                    self.loading.store(false, Ordering::Relaxed);
                    return Err(e);
                }
            }
        } else {
            let (snapshot, summary) = repository::load_from_dir(&text_dir, Some(&self.cancel));
            let textures = TextureCache::build(&texture_dir, capacity);
            (snapshot, summary, textures)
        };

        let (snapshot, summary, textures) = built;
        self.shared.publish(Arc::new(snapshot), Arc::new(textures));
        self.loading.store(false, Ordering::Relaxed);

        info!(
            "Published translation snapshot for '{}': {} entries from {} files",
            config.target_language, summary.entries_loaded, summary.files_processed
        );

        Ok(summary)
    }
}

impl Default for ReloadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
