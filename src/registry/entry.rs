use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::resolver::resolve;
use super::{read, write};
use crate::error::RegistryError;
use crate::format::Template;
use crate::locale::LocaleTag;

/// All compiled templates registered under one key, one per locale.
#[derive(Debug)]
pub struct TranslationEntry {
    key: String,
    templates: RwLock<HashMap<LocaleTag, Arc<Template>>>,
}

impl TranslationEntry {
    /// Create an empty entry for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// The key this entry is registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add the template for `locale`.
    ///
    /// # Returns
    /// * `Ok(())` if the locale had no template yet
    /// * `Err(RegistryError::Duplicate)` otherwise; the existing template is kept
    pub fn register(&self, locale: LocaleTag, template: Arc<Template>) -> Result<(), RegistryError> {
        let mut templates = write(&self.templates);
        if templates.contains_key(&locale) {
            return Err(RegistryError::Duplicate {
                key: self.key.clone(),
                locale,
            });
        }
        templates.insert(locale, template);
        Ok(())
    }

    /// Remove the template for exactly `locale`, leaving other locales intact.
    pub fn remove(&self, locale: &LocaleTag) -> Option<Arc<Template>> {
        write(&self.templates).remove(locale)
    }

    /// The template registered for exactly `locale`, without fallback.
    pub fn get(&self, locale: &LocaleTag) -> Option<Arc<Template>> {
        read(&self.templates).get(locale).cloned()
    }

    /// The template for `locale` after locale fallback towards `default`.
    pub fn resolve(&self, locale: &LocaleTag, default: &LocaleTag) -> Option<Arc<Template>> {
        resolve(&read(&self.templates), locale, default).cloned()
    }

    /// Locales with a template, sorted.
    pub fn locales(&self) -> Vec<LocaleTag> {
        let mut locales: Vec<_> = read(&self.templates).keys().cloned().collect();
        locales.sort();
        locales
    }

    pub fn is_empty(&self) -> bool {
        read(&self.templates).is_empty()
    }
}
