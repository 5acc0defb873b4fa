//! Translation registry: compiled templates per key and locale.
//!
//! # Architecture
//!
//! - `entry`: Per-key map from locale to compiled template
//! - `resolver`: Four-step locale fallback used by every lookup
//! - `store`: One complete set of entries plus the default locale (a snapshot)
//! - `reload`: Live registry that swaps whole snapshots atomically on reload
//! - `loader`: Directory-of-properties-files loader used by reload
//!
//! # Concurrency
//!
//! Lookups and registrations go through `RwLock`-guarded maps inside the live
//! snapshot, so callers never hold a lock themselves. A reload builds a new
//! snapshot off to the side and publishes it with a single atomic swap.
//! Incremental `register`/`unregister` calls are not ordered against that
//! swap: a write that lands on the old snapshot while a reload is publishing
//! is lost with it.
//!
//! # Example
//!
//! ```rust
//! use translation_registry::{LocaleTag, Template, TranslationRegistry, TranslationStore};
//!
//! let loader = |store: &TranslationStore| -> anyhow::Result<()> {
//!     store.register("greeting", LocaleTag::new("en"), Template::compile("Hello {0}"))?;
//!     Ok(())
//! };
//! let registry = TranslationRegistry::new(LocaleTag::new("en"), loader);
//!
//! let template = registry.translate("greeting", &LocaleTag::with_region("en", "GB"));
//! assert_eq!(template.unwrap().format(&["World"]), "Hello World");
//! ```

mod entry;
mod loader;
mod reload;
mod resolver;
mod store;

pub use entry::TranslationEntry;
pub use loader::FileLoader;
pub use reload::{TranslationLoader, TranslationRegistry};
pub use resolver::resolve;
pub use store::TranslationStore;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// A panic while holding one of these locks cannot leave a map half-updated,
// so poisoning is ignored.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
