//! Message lookup and translatable option values.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Resolves message keys for the active locale.
pub trait Translator: Send + Sync {
    fn locale(&self) -> &str;

    fn translate(&self, key: &str) -> Option<String>;

    /// Translate `key` (or use the key itself) and replace `{name}` placeholders.
    fn template(&self, key: &str, data: &[(&str, String)]) -> String {
        let mut message = self.translate(key).unwrap_or_else(|| key.to_string());
        for (name, value) in data {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

/// Message form for a count: `singular` for exactly one, `plural` otherwise.
pub fn plural_form(count: u32) -> &'static str {
    if count == 1 { "singular" } else { "plural" }
}

/// An option that is either plain text or a per-locale table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TranslatableText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl TranslatableText {
    /// Text for the translator's locale. Plain text is looked up as a message
    /// key first, so `title` can resolve to `Title`.
    pub fn resolve(&self, translator: &dyn Translator) -> String {
        match self {
            TranslatableText::Plain(text) => {
                translator.translate(text).unwrap_or_else(|| text.clone())
            }
            TranslatableText::Localized(texts) => texts
                .get(translator.locale())
                .or_else(|| texts.get("en"))
                .or_else(|| texts.values().next())
                .cloned()
                .unwrap_or_default(),
        }
    }
}

impl From<&str> for TranslatableText {
    fn from(text: &str) -> Self {
        TranslatableText::Plain(text.to_string())
    }
}

/// In-memory message catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: String,
    messages: HashMap<String, String>,
}

const ENGLISH: &[(&str, &str)] = &[
    ("title", "Title"),
    ("filename", "Filename"),
    ("info", "Info"),
    (
        "error.section.files.max.singular",
        "You must not add more than {max} file to the \"{section}\" section",
    ),
    (
        "error.section.files.max.plural",
        "You must not add more than {max} files to the \"{section}\" section",
    ),
    (
        "error.section.files.min.singular",
        "The \"{section}\" section requires at least {min} file",
    ),
    (
        "error.section.files.min.plural",
        "The \"{section}\" section requires at least {min} files",
    ),
    (
        "error.section.pages.max.singular",
        "You must not add more than {max} page to the \"{section}\" section",
    ),
    (
        "error.section.pages.max.plural",
        "You must not add more than {max} pages to the \"{section}\" section",
    ),
    (
        "error.section.pages.min.singular",
        "The \"{section}\" section requires at least {min} page",
    ),
    (
        "error.section.pages.min.plural",
        "The \"{section}\" section requires at least {min} pages",
    ),
];

impl Catalog {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: HashMap::new(),
        }
    }

    /// Built-in English messages.
    pub fn english() -> Self {
        let mut catalog = Self::new("en");
        for (key, message) in ENGLISH {
            catalog.insert(key, *message);
        }
        catalog
    }

    pub fn insert(&mut self, key: &str, message: impl Into<String>) {
        self.messages.insert(key.to_string(), message.into());
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Translator for Catalog {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn translate(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}
