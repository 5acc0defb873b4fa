//! Locale fallback resolution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::format::Template;
use crate::locale::LocaleTag;

/// Find the template to use for `requested`, falling back towards `default`.
///
/// Tried in order, first hit wins:
/// 1. `requested` exactly
/// 2. `requested` without region/variant
/// 3. `default` exactly
/// 4. `default` without region/variant
///
/// A language-only template for the requested locale therefore beats the
/// default locale entirely.
pub fn resolve<'a>(
    templates: &'a HashMap<LocaleTag, Arc<Template>>,
    requested: &LocaleTag,
    default: &LocaleTag,
) -> Option<&'a Arc<Template>> {
    templates
        .get(requested)
        .or_else(|| templates.get(&requested.language_only()))
        .or_else(|| templates.get(default))
        .or_else(|| templates.get(&default.language_only()))
}
