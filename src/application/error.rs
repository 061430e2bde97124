use thiserror::Error;

use crate::domain::types::SectionKind;
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("the parent for the query `{query}` cannot be found in the section `{section}`")]
    ParentNotFound { query: String, section: String },
    #[error("the parent for the {kind} section `{section}` has to be {expected}")]
    InvalidParent {
        section: String,
        kind: &'static str,
        expected: &'static str,
    },
    #[error("failed to shape section payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SectionError {
    pub fn parent_not_found(query: impl Into<String>, section: impl Into<String>) -> Self {
        Self::ParentNotFound {
            query: query.into(),
            section: section.into(),
        }
    }

    pub fn invalid_parent(section: impl Into<String>, kind: SectionKind) -> Self {
        let expected = match kind {
            SectionKind::Files => "a page, the site or a user",
            SectionKind::Pages => "a page or the site",
        };
        Self::InvalidParent {
            section: section.into(),
            kind: kind.as_str(),
            expected,
        }
    }
}

/// Failures surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("section `{name}` is not configured")]
    UnknownSection { name: String },
    #[error("section `{name}` is not a {expected} section")]
    WrongSectionKind { name: String, expected: &'static str },
    #[error("model `{model}` cannot be found")]
    ModelNotFound { model: String },
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unknown_section(name: impl Into<String>) -> Self {
        Self::UnknownSection { name: name.into() }
    }

    pub fn wrong_section_kind(name: impl Into<String>, expected: SectionKind) -> Self {
        Self::WrongSectionKind {
            name: name.into(),
            expected: expected.as_str(),
        }
    }

    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
