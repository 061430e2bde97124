//! Min/max item count validation.

use indexmap::IndexMap;
use serde::Serialize;

use crate::application::i18n::{Translator, plural_form};
use crate::domain::types::SectionKind;

/// Inclusive item count limits; `None` leaves a side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl ValidationBounds {
    pub fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn too_many(&self, count: usize) -> bool {
        self.max.is_some_and(|max| count > max as usize)
    }

    pub fn too_few(&self, count: usize) -> bool {
        self.min.is_some_and(|min| count < min as usize)
    }

    /// No room for another item.
    pub fn is_full(&self, count: usize) -> bool {
        self.max.is_some_and(|max| count >= max as usize)
    }
}

/// Errors of one section: its label plus one message per violated bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionErrors {
    pub label: String,
    pub message: IndexMap<&'static str, String>,
}

/// Section name → errors. Empty when nothing is violated.
pub type ErrorMap = IndexMap<String, SectionErrors>;

/// Check `count` against `bounds` and build translated messages for every violation.
pub fn validate(
    count: usize,
    bounds: ValidationBounds,
    name: &str,
    label: &str,
    kind: SectionKind,
    translator: &dyn Translator,
) -> ErrorMap {
    let mut messages = IndexMap::new();

    if let Some(max) = bounds.max.filter(|_| bounds.too_many(count)) {
        let key = format!("error.section.{}.max.{}", kind.as_str(), plural_form(max));
        let message = translator.template(
            &key,
            &[("max", max.to_string()), ("section", label.to_string())],
        );
        messages.insert("max", message);
    }

    if let Some(min) = bounds.min.filter(|_| bounds.too_few(count)) {
        let key = format!("error.section.{}.min.{}", kind.as_str(), plural_form(min));
        let message = translator.template(
            &key,
            &[("min", min.to_string()), ("section", label.to_string())],
        );
        messages.insert("min", message);
    }

    let mut errors = ErrorMap::new();
    if !messages.is_empty() {
        errors.insert(
            name.to_string(),
            SectionErrors {
                label: label.to_string(),
                message: messages,
            },
        );
    }
    errors
}
