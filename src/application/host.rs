//! Collaborator traits describing what sections need from the host CMS.

use serde::Serialize;
use thiserror::Error;

use crate::application::collection::ItemSet;
use crate::domain::entities::{ItemRecord, ModelRef};
use crate::domain::types::Layout;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("blueprint `{name}` not found")]
    BlueprintNotFound { name: String },
    #[error("blueprint `{name}` is invalid: {reason}")]
    InvalidBlueprint { name: String, reason: String },
}

/// Read access to the content tree.
pub trait ContentRepository: Send + Sync {
    /// Look up a page by id.
    fn page(&self, id: &str) -> Option<ModelRef>;

    /// Parent model of a page or file; `None` for the site and users.
    fn parent_of(&self, model: &ModelRef) -> Option<ModelRef>;

    /// Published (listed and unlisted) children in natural order.
    fn children(&self, parent: &ModelRef) -> ItemSet;

    fn drafts(&self, parent: &ModelRef) -> ItemSet;

    fn files(&self, parent: &ModelRef) -> ItemSet;
}

/// Text search over an item set.
pub trait SearchIndex: Send + Sync {
    fn search(&self, items: ItemSet, query: &str) -> ItemSet;
}

/// Preview image shown next to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    pub icon: String,
    pub ratio: String,
    pub back: String,
    pub cover: bool,
}

/// Configured look of preview images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub ratio: Option<String>,
    pub back: Option<String>,
    pub cover: bool,
}

/// URLs, drag text and previews as the panel builds them.
pub trait PanelLinks: Send + Sync {
    /// Panel URL of a model; absolute includes the panel root.
    fn model_url(&self, model: &ModelRef, absolute: bool) -> String;

    /// Panel path of a model, without the panel root.
    fn model_path(&self, model: &ModelRef) -> String;

    fn api_url(&self, model: &ModelRef, absolute: bool) -> String;

    fn item_url(&self, item: &ItemRecord, absolute: bool) -> String;

    /// Text inserted into an editor when the item is dragged.
    fn drag_text(&self, item: &ItemRecord, absolute: bool) -> String;

    fn image(&self, item: &ItemRecord, options: &ImageOptions, layout: Layout) -> ImageView;
}

/// Metadata of a page blueprint offered when creating pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlueprintInfo {
    pub name: String,
    pub title: String,
}

/// Blueprint lookups.
pub trait Blueprints: Send + Sync {
    /// Comma separated MIME types accepted by a file template, if restricted.
    fn accepted_mime(&self, file_template: &str) -> Option<String>;

    fn page_blueprint(&self, template: &str) -> Result<BlueprintInfo, HostError>;

    /// Every page template the host knows about.
    fn page_templates(&self) -> Vec<String>;
}
