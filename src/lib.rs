//! Localized message templates with locale fallback and hot-reload.
//!
//! Patterns are compiled once into [`Template`]s, stored per key and locale in
//! a [`TranslationRegistry`], and formatted with positional arguments at
//! lookup time.

pub mod config;
pub mod error;
pub mod format;
pub mod locale;
pub mod metrics;
pub mod properties;
pub mod registry;
pub mod render;

pub use error::{LocaleParseError, PropertiesError, RegistryError};
pub use format::{Slot, Template};
pub use locale::LocaleTag;
pub use metrics::{MetricsReport, RegistryMetrics};
pub use registry::{
    FileLoader, TranslationEntry, TranslationLoader, TranslationRegistry, TranslationStore,
};
pub use render::{Component, Content, Decoration, Markup, PlainMarkup, Renderer, Style};
