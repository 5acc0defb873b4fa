use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use super::reload::TranslationLoader;
use super::store::TranslationStore;
use crate::error::RegistryError;
use crate::locale::LocaleTag;

/// Loads one file per locale from a directory, e.g. `en_US.properties`.
#[derive(Debug, Clone)]
pub struct FileLoader {
    /// Directory holding the translation files
    dir: PathBuf,

    /// File extension to pick up, without the dot
    extension: String,

    /// Double `'` in every pattern before compiling
    escape_single_quotes: bool,
}

impl FileLoader {
    /// Create a loader for `.properties` files with quote escaping enabled.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "properties".to_string(),
            escape_single_quotes: true,
        }
    }

    /// Set the file extension to load
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable doubling of single quotes
    pub fn with_escape_single_quotes(mut self, escape: bool) -> Self {
        self.escape_single_quotes = escape;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Translation files in the directory, sorted by name.
    fn list_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.extension.as_str());
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl TranslationLoader for FileLoader {
    fn load(&self, store: &TranslationStore) -> Result<()> {
        let files = match self.list_files() {
            Ok(files) => files,
            Err(e) => {
                warn!("Failed to find translation files in {}: {}", self.dir.display(), e);
                return Err(e).with_context(|| format!("Failed to list {}", self.dir.display()));
            }
        };

        if files.is_empty() {
            warn!("No translation files found in {}", self.dir.display());
            bail!("No .{} files in {}", self.extension, self.dir.display());
        }

        let mut loaded = 0;
        for path in &files {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let locale = match LocaleTag::parse(stem) {
                Ok(locale) => locale,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            match store.register_file(&locale, path, self.escape_single_quotes) {
                Ok(()) => {
                    debug!("Loaded {} from {}", locale, path.display());
                    loaded += 1;
                }
                Err(e @ RegistryError::Io { .. }) => {
                    warn!("Skipping unreadable file: {}", e);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to load translation files in {}", self.dir.display())
                    });
                }
            }
        }

        info!(
            "Loaded {} of {} translation files from {}",
            loaded,
            files.len(),
            self.dir.display()
        );
        Ok(())
    }
}
