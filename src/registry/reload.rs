use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{error, info};

use super::loader::FileLoader;
use super::store::TranslationStore;
use crate::error::RegistryError;
use crate::format::Template;
use crate::locale::LocaleTag;
use crate::metrics::RegistryMetrics;

/// Populates a fresh store during reload.
///
/// Returning `Err` rejects the new store; the previous one stays live.
pub trait TranslationLoader: Send + Sync {
    fn load(&self, store: &TranslationStore) -> anyhow::Result<()>;
}

impl<F> TranslationLoader for F
where
    F: Fn(&TranslationStore) -> anyhow::Result<()> + Send + Sync,
{
    fn load(&self, store: &TranslationStore) -> anyhow::Result<()> {
        self(store)
    }
}

/// A translation registry whose whole contents can be hot-reloaded.
///
/// Readers always see one complete snapshot: either the one before a reload
/// or the one after it, never a partially loaded one.
pub struct TranslationRegistry {
    live: ArcSwap<TranslationStore>,
    loader: Box<dyn TranslationLoader>,
    metrics: RegistryMetrics,
}

impl TranslationRegistry {
    /// Create a registry and run the loader once.
    ///
    /// If that first load fails the registry starts out empty.
    pub fn new(default_locale: LocaleTag, loader: impl TranslationLoader + 'static) -> Self {
        let registry = Self {
            live: ArcSwap::from_pointee(TranslationStore::new(default_locale)),
            loader: Box::new(loader),
            metrics: RegistryMetrics::new(),
        };
        registry.reload();
        registry
    }

    /// Create a registry backed by a directory of `<locale>.properties` files.
    ///
    /// Single quotes in patterns are doubled while loading.
    pub fn from_dir(dir: impl Into<PathBuf>, default_locale: LocaleTag) -> Self {
        Self::new(default_locale, FileLoader::new(dir))
    }

    /// Rebuild the translation set from the loader and swap it in.
    ///
    /// The new store starts with the current default locale. On failure the
    /// error is logged and the current store keeps serving.
    ///
    /// # Returns
    /// `true` if the new store was installed.
    pub fn reload(&self) -> bool {
        let next = TranslationStore::new(self.live.load().default_locale());

        match self.loader.load(&next) {
            Ok(()) => {
                info!("Reloaded {} translation keys", next.len());
                self.live.store(Arc::new(next));
                self.metrics.record_reload_success();
                true
            }
            Err(e) => {
                error!("Failed to reload translations, keeping previous set: {:#}", e);
                self.metrics.record_reload_failure();
                false
            }
        }
    }

    /// The live store. Holding it pins that snapshot even across reloads.
    pub fn snapshot(&self) -> Arc<TranslationStore> {
        self.live.load_full()
    }

    /// Get the default locale of the live store.
    pub fn default_locale(&self) -> LocaleTag {
        self.live.load().default_locale()
    }

    /// Change the fallback locale. Later reloads keep it.
    pub fn set_default_locale(&self, locale: LocaleTag) {
        self.live.load().set_default_locale(locale);
    }

    /// Look up the template for `key` in `locale`, with locale fallback.
    pub fn translate(&self, key: &str, locale: &LocaleTag) -> Option<Arc<Template>> {
        let found = self.live.load().translate(key, locale);
        if found.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        found
    }

    /// Check whether `key` has a template for any locale.
    pub fn contains(&self, key: &str) -> bool {
        self.live.load().contains(key)
    }

    /// Check whether `key` resolves for `locale`, fallback included.
    pub fn contains_locale(&self, key: &str, locale: &LocaleTag) -> bool {
        self.live.load().contains_locale(key, locale)
    }

    /// Register into the live store.
    ///
    /// Not ordered against [`reload`](Self::reload): if a reload publishes
    /// while this runs, the registration may land in the discarded store.
    pub fn register(
        &self,
        key: &str,
        locale: LocaleTag,
        template: impl Into<Arc<Template>>,
    ) -> Result<(), RegistryError> {
        self.live.load().register(key, locale, template)
    }

    /// Remove `key` and all its locales from the live store.
    pub fn unregister(&self, key: &str) -> bool {
        self.live.load().unregister(key)
    }

    /// Remove one locale of `key` from the live store.
    pub fn unregister_locale(&self, key: &str, locale: &LocaleTag) -> bool {
        self.live.load().unregister_locale(key, locale)
    }

    /// Get the lookup and reload counters.
    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }
}

impl fmt::Debug for TranslationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRegistry")
            .field("live", &self.live.load_full())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
