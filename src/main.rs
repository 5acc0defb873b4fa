//! Render one translation key from a directory of translation files.
//!
//! Usage:
//!   translation-registry <key> [locale] [args...]
//!   translation-registry --metrics <key> [locale] [args...]
//!
//! Required environment variables:
//! - TRANSLATIONS_DIR
//!
//! Optional:
//! - DEFAULT_LOCALE (defaults to en_US)
//! - TRANSLATIONS_EXTENSION (defaults to properties)
//! - ESCAPE_SINGLE_QUOTES (defaults to true)

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use translation_registry::config::Config;
use translation_registry::{Component, LocaleTag, PlainMarkup, Renderer, TranslationRegistry};

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_registry=info".parse()?),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let show_metrics = args.iter().any(|a| a == "--metrics");
    args.retain(|a| a != "--metrics");

    let Some(key) = args.first().cloned() else {
        bail!("Usage: translation-registry [--metrics] <key> [locale] [args...]");
    };

    let config = Config::from_env()?;
    let locale = match args.get(1) {
        Some(tag) => LocaleTag::parse(tag).context("Invalid locale argument")?,
        None => config.default_locale.clone(),
    };

    info!("Loading translations from {}", config.translations_dir.display());
    let registry = TranslationRegistry::new(config.default_locale.clone(), config.loader());

    if !registry.contains_locale(&key, &locale) {
        warn!("No translation for '{}' in {}", key, locale);
    }

    let message = Component::translatable(
        key,
        args.iter().skip(2).map(Component::text).collect(),
    );
    let rendered = Renderer::new(&registry, PlainMarkup).render(&message, &locale);
    println!("{}", rendered.plain_text());

    if show_metrics {
        let report = registry.metrics().report();
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
