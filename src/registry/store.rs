use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::entry::TranslationEntry;
use super::{read, write};
use crate::error::RegistryError;
use crate::format::Template;
use crate::locale::LocaleTag;
use crate::properties;

/// One complete set of translations plus the default locale.
///
/// This is the unit a reload replaces. Both maps tolerate concurrent readers
/// and writers, so a store can be shared behind an `Arc` and mutated in place.
#[derive(Debug)]
pub struct TranslationStore {
    entries: RwLock<HashMap<String, Arc<TranslationEntry>>>,
    default_locale: RwLock<LocaleTag>,
}

impl TranslationStore {
    /// Create an empty store.
    pub fn new(default_locale: LocaleTag) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_locale: RwLock::new(default_locale),
        }
    }

    /// Get the locale used as the last resort during lookups.
    pub fn default_locale(&self) -> LocaleTag {
        read(&self.default_locale).clone()
    }

    /// Change the default locale. Applies to every lookup from now on.
    pub fn set_default_locale(&self, locale: LocaleTag) {
        *write(&self.default_locale) = locale;
    }

    /// Register a compiled template for `key` in `locale`.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(RegistryError::Duplicate)` if `key` already has a template for
    ///   exactly this locale; the existing one is never overwritten
    pub fn register(
        &self,
        key: &str,
        locale: LocaleTag,
        template: impl Into<Arc<Template>>,
    ) -> Result<(), RegistryError> {
        self.entry_or_insert(key).register(locale, template.into())
    }

    /// Register a template per key, continuing past failures.
    ///
    /// # Arguments
    /// * `locale` - Locale every template is registered under
    /// * `keys` - Keys to register
    /// * `supplier` - Produces the template for a key
    ///
    /// # Returns
    /// * `Ok(())` if every key registered
    /// * The failure itself if exactly one key failed
    /// * `Err(RegistryError::Bulk)` wrapping the first failure and the total
    ///   count if several failed
    pub fn register_all<I, K, F>(
        &self,
        locale: &LocaleTag,
        keys: I,
        mut supplier: F,
    ) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        F: FnMut(&str) -> Template,
    {
        let results = keys.into_iter().map(|key| {
            let key = key.as_ref();
            self.register(key, locale.clone(), supplier(key))
        });
        collect_failures(results)
    }

    /// Register already compiled templates from a key → template map.
    pub fn register_map(
        &self,
        locale: &LocaleTag,
        templates: HashMap<String, Template>,
    ) -> Result<(), RegistryError> {
        let results = templates
            .into_iter()
            .map(|(key, template)| self.register(&key, locale.clone(), template));
        collect_failures(results)
    }

    /// Compile and register raw key → pattern pairs.
    ///
    /// With `escape_single_quotes`, every `'` in a pattern is doubled before
    /// compiling.
    pub fn register_bundle<I, K, V>(
        &self,
        locale: &LocaleTag,
        patterns: I,
        escape_single_quotes: bool,
    ) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let results = patterns.into_iter().map(|(key, pattern)| {
            let pattern = pattern.as_ref();
            let template = if escape_single_quotes {
                Template::compile(&properties::escape_single_quotes(pattern))
            } else {
                Template::compile(pattern)
            };
            self.register(key.as_ref(), locale.clone(), template)
        });
        collect_failures(results)
    }

    /// Read a properties file and register every entry under `locale`.
    pub fn register_file(
        &self,
        locale: &LocaleTag,
        path: &Path,
        escape_single_quotes: bool,
    ) -> Result<(), RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let patterns = properties::parse(&content).map_err(|source| RegistryError::Properties {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Registering {} patterns for {} from {}",
            patterns.len(),
            locale,
            path.display()
        );
        self.register_bundle(locale, patterns, escape_single_quotes)
    }

    /// Remove every template registered under `key`.
    ///
    /// # Returns
    /// `true` if the key was registered.
    pub fn unregister(&self, key: &str) -> bool {
        write(&self.entries).remove(key).is_some()
    }

    /// Remove only the `locale` template of `key`.
    ///
    /// # Returns
    /// `true` if a template was removed.
    pub fn unregister_locale(&self, key: &str, locale: &LocaleTag) -> bool {
        self.entry(key)
            .and_then(|entry| entry.remove(locale))
            .is_some()
    }

    /// Look up the template for `key` in `locale`, with locale fallback.
    ///
    /// Returns `None` when nothing along the fallback chain is registered.
    pub fn translate(&self, key: &str, locale: &LocaleTag) -> Option<Arc<Template>> {
        let entry = self.entry(key)?;
        entry.resolve(locale, &self.default_locale())
    }

    /// Check whether `key` has an entry at all.
    pub fn contains(&self, key: &str) -> bool {
        read(&self.entries).contains_key(key)
    }

    /// Check whether `translate(key, locale)` would find a template.
    pub fn contains_locale(&self, key: &str, locale: &LocaleTag) -> bool {
        self.translate(key, locale).is_some()
    }

    /// The entry for `key`, if registered.
    pub fn entry(&self, key: &str) -> Option<Arc<TranslationEntry>> {
        read(&self.entries).get(key).cloned()
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = read(&self.entries).keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Locales registered for `key`, sorted. Empty if the key is unknown.
    pub fn locales(&self, key: &str) -> Vec<LocaleTag> {
        self.entry(key)
            .map(|entry| entry.locales())
            .unwrap_or_default()
    }

    /// Number of keys with at least one registered locale.
    pub fn len(&self) -> usize {
        read(&self.entries).len()
    }

    /// Check whether no key is registered.
    pub fn is_empty(&self) -> bool {
        read(&self.entries).is_empty()
    }

    fn entry_or_insert(&self, key: &str) -> Arc<TranslationEntry> {
        if let Some(entry) = self.entry(key) {
            return entry;
        }
        Arc::clone(
            write(&self.entries)
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(TranslationEntry::new(key))),
        )
    }
}

/// Drain `results`; surface the single failure, or wrap the first of many.
fn collect_failures(
    results: impl Iterator<Item = Result<(), RegistryError>>,
) -> Result<(), RegistryError> {
    let mut first = None;
    let mut count = 0;

    for result in results {
        if let Err(err) = result {
            count += 1;
            first.get_or_insert(err);
        }
    }

    match first {
        None => Ok(()),
        Some(err) if count == 1 => Err(err),
        Some(err) => Err(RegistryError::Bulk {
            first: Box::new(err),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn en() -> LocaleTag {
        LocaleTag::new("en")
    }

    fn store_with_english() -> TranslationStore {
        let store = TranslationStore::new(en());
        store
            .register("greeting", en(), Template::compile("Hello {0}"))
            .unwrap();
        store
            .register(
                "greeting",
                LocaleTag::with_region("en", "US"),
                Template::compile("Howdy {0}"),
            )
            .unwrap();
        store
    }

    // ==================== Registration Tests ====================

    #[test]
    fn test_register_duplicate_locale_fails() {
        let store = TranslationStore::new(en());
        store.register("k", en(), Template::compile("a")).unwrap();

        let err = store.register("k", en(), Template::compile("b")).unwrap_err();
        assert_eq!(err.to_string(), "Translation already exists: k for en");
        assert_eq!(store.translate("k", &en()).unwrap().text(), "a");
    }

    #[test]
    fn test_register_other_locale_succeeds() {
        let store = TranslationStore::new(en());
        store.register("k", en(), Template::compile("a")).unwrap();
        store
            .register("k", LocaleTag::new("fr"), Template::compile("b"))
            .expect("Different locale should register");
        assert_eq!(store.locales("k").len(), 2);
    }

    #[test]
    fn test_register_all_success() {
        let store = TranslationStore::new(en());
        store
            .register_all(&en(), ["a", "b", "c"], |key| Template::compile(key))
            .expect("Should register all");
        assert_eq!(store.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_register_all_single_failure_is_reraised() {
        let store = TranslationStore::new(en());
        store.register("b", en(), Template::compile("old")).unwrap();

        let err = store
            .register_all(&en(), ["a", "b", "c"], Template::compile)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { ref key, .. } if key == "b"));
        assert!(store.contains("a"));
        assert!(store.contains("c"));
    }

    #[test]
    fn test_register_all_multiple_failures_are_aggregated() {
        let store = TranslationStore::new(en());
        for key in ["a", "b", "c"] {
            store.register(key, en(), Template::compile("old")).unwrap();
        }

        let err = store
            .register_all(&en(), ["a", "b", "c", "d"], Template::compile)
            .unwrap_err();
        match err {
            RegistryError::Bulk { first, count } => {
                assert_eq!(count, 3);
                assert!(matches!(*first, RegistryError::Duplicate { ref key, .. } if key == "a"));
            }
            other => panic!("Expected bulk error, got {other:?}"),
        }
        assert!(store.contains("d"));
    }

    #[test]
    fn test_register_map() {
        let store = TranslationStore::new(en());
        let mut templates = HashMap::new();
        templates.insert("x".to_string(), Template::compile("X"));
        templates.insert("y".to_string(), Template::compile("Y"));

        store.register_map(&en(), templates).expect("Should register");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_register_bundle_escapes_quotes() {
        let store = TranslationStore::new(en());
        store
            .register_bundle(&en(), [("k", "Don't")], true)
            .expect("Should register");
        store
            .register_bundle(&LocaleTag::new("fr"), [("k", "l'eau")], false)
            .expect("Should register");

        assert_eq!(store.translate("k", &en()).unwrap().text(), "Don''t");
        assert_eq!(
            store.translate("k", &LocaleTag::new("fr")).unwrap().text(),
            "l'eau"
        );
    }

    #[test]
    fn test_register_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("en.properties");
        std::fs::write(&path, "# greetings\ngreeting=Hello {0}\nbye=Bye\n").unwrap();

        let store = TranslationStore::new(en());
        store.register_file(&en(), &path, false).expect("Should load");
        assert_eq!(store.keys(), vec!["bye", "greeting"]);
    }

    #[test]
    fn test_register_file_missing_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = TranslationStore::new(en());
        let err = store
            .register_file(&en(), &temp_dir.path().join("nope.properties"), false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_translate_fallback_chain() {
        let store = store_with_english();

        let gb = store.translate("greeting", &LocaleTag::with_region("en", "GB"));
        assert_eq!(gb.unwrap().text(), "Hello {0}");

        let fr = store.translate("greeting", &LocaleTag::new("fr"));
        assert_eq!(fr.unwrap().text(), "Hello {0}");

        let us = store.translate("greeting", &LocaleTag::with_region("en", "US"));
        assert_eq!(us.unwrap().text(), "Howdy {0}");
    }

    #[test]
    fn test_translate_unknown_key() {
        let store = store_with_english();
        assert!(store.translate("missing", &en()).is_none());
        assert!(!store.contains("missing"));
        assert!(!store.contains_locale("missing", &en()));
    }

    #[test]
    fn test_default_locale_change_applies_immediately() {
        let store = TranslationStore::new(en());
        store
            .register("k", LocaleTag::new("de"), Template::compile("Hallo"))
            .unwrap();
        assert!(!store.contains_locale("k", &LocaleTag::new("fr")));

        store.set_default_locale(LocaleTag::with_region("de", "CH"));
        assert_eq!(store.default_locale(), LocaleTag::with_region("de", "CH"));
        assert!(store.contains_locale("k", &LocaleTag::new("fr")));
    }

    #[test]
    fn test_contains_without_matching_locale() {
        let store = TranslationStore::new(en());
        store
            .register("k", LocaleTag::new("de"), Template::compile("Hallo"))
            .unwrap();
        assert!(store.contains("k"));
        assert!(!store.contains_locale("k", &LocaleTag::new("fr")));
    }

    // ==================== Unregister Tests ====================

    #[test]
    fn test_unregister_key() {
        let store = store_with_english();
        assert!(store.unregister("greeting"));
        assert!(!store.unregister("greeting"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unregister_locale_keeps_others() {
        let store = store_with_english();
        let us = LocaleTag::with_region("en", "US");

        assert!(store.unregister_locale("greeting", &us));
        assert!(!store.unregister_locale("greeting", &us));
        assert!(!store.unregister_locale("missing", &us));

        // en_US now falls back to en
        assert_eq!(store.translate("greeting", &us).unwrap().text(), "Hello {0}");
        assert!(store.contains("greeting"));
    }

    #[test]
    fn test_reregister_after_unregister_locale() {
        let store = store_with_english();
        store.unregister_locale("greeting", &en());
        store
            .register("greeting", en(), Template::compile("Hi"))
            .expect("Locale slot is free again");
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_reads_and_writes() {
        let store = Arc::new(store_with_english());
        let mut handles = Vec::new();

        for t in 0..4 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("key-{t}-{i}");
                    store.register(&key, en(), Template::compile("v")).unwrap();
                    assert!(store.contains_locale("greeting", &LocaleTag::new("fr")));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 401);
    }
}
