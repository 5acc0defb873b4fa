//! Locale tags: structured language/region/variant identifiers.
//!
//! A `LocaleTag` keeps its subtags exactly as they were provided (no case
//! folding), so `en_US` and `en_us` are different tags. Both `_` and `-` are
//! accepted as separators when parsing; `Display` always uses `_`.

use std::fmt;
use std::str::FromStr;

use crate::error::LocaleParseError;

/// A language tag with optional region and variant subtags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleTag {
    /// Language subtag (e.g., "en"). Empty only for [`LocaleTag::ROOT`].
    language: String,

    /// Region subtag (e.g., "US")
    region: Option<String>,

    /// Variant subtag (e.g., "POSIX")
    variant: Option<String>,
}

impl LocaleTag {
    /// The root locale: no language, no region, no variant.
    pub const ROOT: LocaleTag = LocaleTag {
        language: String::new(),
        region: None,
        variant: None,
    };

    /// Create a language-only tag.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: None,
            variant: None,
        }
    }

    /// Create a tag with a language and a region.
    pub fn with_region(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            region: Some(region.into()),
            variant: None,
        }
    }

    /// Attach a variant subtag.
    ///
    /// A variant without a region is allowed (`de__POSIX` style tags).
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Parse a tag such as `en`, `en_US`, `en-US` or `de_DE_POSIX`.
    ///
    /// # Arguments
    /// * `tag` - The tag string, typically a file stem
    ///
    /// # Returns
    /// * `Ok(LocaleTag)` if the string is a well-formed tag
    /// * `Err(LocaleParseError)` otherwise
    pub fn parse(tag: &str) -> Result<Self, LocaleParseError> {
        let invalid = || LocaleParseError {
            tag: tag.to_string(),
        };

        let mut parts = tag.splitn(3, |c: char| c == '_' || c == '-');
        let language = parts.next().unwrap_or_default();
        if language.is_empty()
            || language.len() > 8
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        let region = match parts.next() {
            None => None,
            Some("") => None,
            Some(region) if region.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Some(region.to_string())
            }
            Some(_) => return Err(invalid()),
        };

        let variant = match parts.next() {
            None => None,
            Some("") => return Err(invalid()),
            Some(variant) => Some(variant.to_string()),
        };

        // "en_" has a separator but nothing after it
        if region.is_none() && variant.is_none() && tag.len() != language.len() {
            return Err(invalid());
        }

        Ok(Self {
            language: language.to_string(),
            region,
            variant,
        })
    }

    /// Get the language subtag.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get the region subtag, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Get the variant subtag, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Check whether this tag carries only a language subtag.
    pub fn is_language_only(&self) -> bool {
        self.region.is_none() && self.variant.is_none()
    }

    /// Derive the language-only form of this tag (region and variant stripped).
    pub fn language_only(&self) -> LocaleTag {
        LocaleTag::new(self.language.clone())
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        match (&self.region, &self.variant) {
            (Some(region), Some(variant)) => write!(f, "_{}_{}", region, variant),
            (Some(region), None) => write!(f, "_{}", region),
            (None, Some(variant)) => write!(f, "__{}", variant),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for LocaleTag {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
