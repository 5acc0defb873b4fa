use std::path::PathBuf;

use thiserror::Error;

use crate::locale::LocaleTag;

/// Errors raised by registration and file loading.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A template already exists for this key and locale
    #[error("Translation already exists: {key} for {locale}")]
    Duplicate { key: String, locale: LocaleTag },

    /// More than one registration in a bulk call failed
    #[error("{first} (and {} more)", .count - 1)]
    Bulk {
        #[source]
        first: Box<RegistryError>,
        count: usize,
    },

    /// A translation file could not be read
    #[error("Failed to read translation file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A translation file could not be parsed
    #[error("Failed to parse translation file {}: {source}", .path.display())]
    Properties {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },
}

/// Errors raised while reading properties-style `key=value` text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertiesError {
    /// `\u` not followed by four hex digits
    #[error("Malformed \\uXXXX escape on line {line}")]
    InvalidUnicodeEscape { line: usize },
}

/// A string that is not a well-formed locale tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid locale tag: '{tag}'")]
pub struct LocaleParseError {
    pub tag: String,
}
