use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::locale::LocaleTag;
use crate::registry::FileLoader;

#[derive(Debug, Clone)]
pub struct Config {
    // Source files
    pub translations_dir: PathBuf,
    pub extension: String,
    pub escape_single_quotes: bool,

    // Lookup
    pub default_locale: LocaleTag,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en_US".to_string());

        Ok(Self {
            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .context("TRANSLATIONS_DIR not set")?
                .into(),
            extension: std::env::var("TRANSLATIONS_EXTENSION")
                .unwrap_or_else(|_| "properties".to_string()),
            escape_single_quotes: std::env::var("ESCAPE_SINGLE_QUOTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            default_locale: LocaleTag::parse(&default_locale)
                .context("DEFAULT_LOCALE is not a valid locale tag")?,
        })
    }

    /// Build the file loader described by this configuration.
    pub fn loader(&self) -> FileLoader {
        FileLoader::new(&self.translations_dir)
            .with_extension(&self.extension)
            .with_escape_single_quotes(self.escape_single_quotes)
    }
}
