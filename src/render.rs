//! Rendering of styled text trees with translatable leaves.
//!
//! A [`Component`] tree may contain translatable nodes that name a key and
//! carry their own argument subtrees. [`Renderer`] walks the tree and replaces
//! every translatable node that has a template with the formatted result,
//! parsed back into a tree by a [`Markup`] implementation.

use std::collections::BTreeSet;

use crate::locale::LocaleTag;
use crate::registry::TranslationRegistry;

/// Text decorations a style can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Decoration {
    Bold,
    Italic,
    Underlined,
    Strikethrough,
    Obfuscated,
}

/// Visual style attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub color: Option<String>,
    pub decorations: BTreeSet<Decoration>,
    /// Text inserted into the input line when the node is shift-clicked
    pub insertion: Option<String>,
    pub font: Option<String>,
}

impl Style {
    /// Fill the fields this style leaves unset from `parent`.
    ///
    /// Fields set here win; decorations are the union of both.
    pub fn merge(&self, parent: &Style) -> Style {
        Style {
            color: self.color.clone().or_else(|| parent.color.clone()),
            decorations: self.decorations.union(&parent.decorations).copied().collect(),
            insertion: self.insertion.clone().or_else(|| parent.insertion.clone()),
            font: self.font.clone().or_else(|| parent.font.clone()),
        }
    }
}

/// What a node displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Translatable {
        key: String,
        /// Shown instead of the key when no template exists
        fallback: Option<String>,
        args: Vec<Component>,
    },
}

/// A node in a styled text tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub content: Content,
    pub style: Style,
    pub children: Vec<Component>,
}

impl Component {
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_content(Content::Text(content.into()))
    }

    pub fn translatable(key: impl Into<String>, args: Vec<Component>) -> Self {
        Self::from_content(Content::Translatable {
            key: key.into(),
            fallback: None,
            args,
        })
    }

    fn from_content(content: Content) -> Self {
        Self {
            content,
            style: Style::default(),
            children: Vec::new(),
        }
    }

    /// Set the fallback text of a translatable node. No effect on text nodes.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        if let Content::Translatable { fallback, .. } = &mut self.content {
            *fallback = Some(text.into());
        }
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    pub fn decorate(mut self, decoration: Decoration) -> Self {
        self.style.decorations.insert(decoration);
        self
    }

    pub fn append(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Flatten the tree to its visible text, ignoring style.
    ///
    /// Unresolved translatable nodes show their fallback, or the key.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        match &self.content {
            Content::Text(text) => out.push_str(text),
            Content::Translatable { key, fallback, .. } => {
                out.push_str(fallback.as_deref().unwrap_or(key));
            }
        }
        for child in &self.children {
            child.write_plain(out);
        }
    }
}

/// Converts between text trees and the string form templates are written in.
pub trait Markup {
    fn serialize(&self, component: &Component) -> String;
    fn deserialize(&self, input: &str) -> Component;
}

/// Markup without any tags: strings are plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkup;

impl Markup for PlainMarkup {
    fn serialize(&self, component: &Component) -> String {
        component.plain_text()
    }

    fn deserialize(&self, input: &str) -> Component {
        Component::text(input)
    }
}

/// Resolves translatable nodes against a registry for one locale at a time.
#[derive(Debug)]
pub struct Renderer<'a, M> {
    registry: &'a TranslationRegistry,
    markup: M,
}

impl<'a, M: Markup> Renderer<'a, M> {
    pub fn new(registry: &'a TranslationRegistry, markup: M) -> Self {
        Self { registry, markup }
    }

    /// Render `component` for `locale`.
    ///
    /// For a translatable node with a template: its arguments are rendered
    /// first, serialized, and substituted; the result is parsed by the markup
    /// and rendered again so translatables it contains are resolved too. The
    /// node's style is merged onto the result and its children follow it.
    ///
    /// Without a template the node stays translatable, with its arguments and
    /// children rendered.
    pub fn render(&self, component: &Component, locale: &LocaleTag) -> Component {
        let children = self.render_all(&component.children, locale);

        let (key, fallback, args) = match &component.content {
            Content::Text(_) => {
                return Component {
                    content: component.content.clone(),
                    style: component.style.clone(),
                    children,
                };
            }
            Content::Translatable {
                key,
                fallback,
                args,
            } => (key, fallback, self.render_all(args, locale)),
        };

        let Some(template) = self.registry.translate(key, locale) else {
            return Component {
                content: Content::Translatable {
                    key: key.clone(),
                    fallback: fallback.clone(),
                    args,
                },
                style: component.style.clone(),
                children,
            };
        };

        let serialized: Vec<String> = args.iter().map(|arg| self.markup.serialize(arg)).collect();
        let translated = self.markup.deserialize(&template.format(serialized.as_slice()));

        let mut root = self.render(&translated, locale);
        root.style = root.style.merge(&component.style);

        let mut rendered = vec![root];
        rendered.extend(children);
        Component {
            content: Content::Text(String::new()),
            style: component.style.clone(),
            children: rendered,
        }
    }

    fn render_all(&self, components: &[Component], locale: &LocaleTag) -> Vec<Component> {
        components
            .iter()
            .map(|component| self.render(component, locale))
            .collect()
    }
}
