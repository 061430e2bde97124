//! JSON-backed content host.
//!
//! A fixture describes the site tree, user files and blueprints:
//!
//! ```json
//! {
//!   "site": {
//!     "files": [{ "filename": "logo.png" }],
//!     "children": [
//!       { "slug": "blog", "status": "listed", "num": 1,
//!         "children": [{ "slug": "hello", "template": "article" }] }
//!     ]
//!   },
//!   "users": { "ada": { "files": [] } },
//!   "blueprints": {
//!     "pages": { "article": { "title": "Article" } },
//!     "files": { "image": { "accept": "image/*" } }
//!   }
//! }
//! ```
//!
//! Children keep their declared order; pages with status `draft` are served
//! as drafts.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::application::collection::ItemSet;
use crate::application::host::{BlueprintInfo, Blueprints, ContentRepository, HostError};
use crate::domain::entities::{ContentFields, FileAttributes, ItemRecord, ModelRef, Permissions};
use crate::domain::types::{ModelKind, PageStatus};

use super::error::InfraError;

const DEFAULT_ACTIONS: [&str; 6] = [
    "sort",
    "changeSlug",
    "changeStatus",
    "changeTitle",
    "update",
    "delete",
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFixture {
    site: RawSite,
    users: IndexMap<String, RawUser>,
    blueprints: RawBlueprints,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSite {
    files: Vec<RawFile>,
    children: Vec<RawPage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUser {
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    slug: String,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    status: Option<PageStatus>,
    #[serde(default)]
    num: Option<u32>,
    #[serde(default = "readable_default")]
    readable: bool,
    #[serde(default)]
    content: ContentFields,
    #[serde(default)]
    permissions: Option<Permissions>,
    #[serde(default)]
    files: Vec<RawFile>,
    #[serde(default)]
    children: Vec<RawPage>,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    filename: String,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    mime: Option<String>,
    #[serde(default = "readable_default")]
    readable: bool,
    #[serde(default)]
    content: ContentFields,
    #[serde(default)]
    permissions: Option<Permissions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlueprints {
    pages: IndexMap<String, RawPageBlueprint>,
    files: IndexMap<String, RawFileBlueprint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPageBlueprint {
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFileBlueprint {
    accept: Option<String>,
}

fn readable_default() -> bool {
    true
}

#[derive(Debug, Default)]
struct Node {
    children: Vec<String>,
    drafts: Vec<String>,
}

/// In-memory content tree loaded from a JSON fixture.
#[derive(Debug, Default)]
pub struct ContentFixture {
    pages: IndexMap<String, ItemRecord>,
    nodes: IndexMap<ModelRef, Node>,
    files: IndexMap<ModelRef, Vec<ItemRecord>>,
    page_blueprints: IndexMap<String, RawPageBlueprint>,
    file_accept: IndexMap<String, Option<String>>,
}

impl ContentFixture {
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let source = fs::read_to_string(path)?;
        let fixture = Self::from_json(&source)
            .map_err(|err| InfraError::fixture(path.display().to_string(), err.to_string()))?;
        debug!(
            target = "panel_sections::infra::fixture",
            path = %path.display(),
            pages = fixture.pages.len(),
            "content fixture loaded"
        );
        Ok(fixture)
    }

    pub fn from_json(source: &str) -> Result<Self, InfraError> {
        let raw: RawFixture = serde_json::from_str(source)
            .map_err(|err| InfraError::fixture("<inline>", err.to_string()))?;

        let mut fixture = Self {
            page_blueprints: raw.blueprints.pages,
            file_accept: raw
                .blueprints
                .files
                .into_iter()
                .map(|(name, blueprint)| (name, blueprint.accept))
                .collect(),
            ..Self::default()
        };

        let site = ModelRef::site();
        fixture.add_files(&site, raw.site.files)?;
        fixture.add_pages(&site, raw.site.children)?;
        for (id, user) in raw.users {
            fixture.add_files(&ModelRef::user(id), user.files)?;
        }

        Ok(fixture)
    }

    fn add_pages(&mut self, parent: &ModelRef, pages: Vec<RawPage>) -> Result<(), InfraError> {
        for raw in pages {
            if raw.slug.contains('/') {
                return Err(InfraError::fixture(
                    raw.slug.clone(),
                    "slugs must not contain `/`",
                ));
            }
            let id = match parent.id() {
                Some(parent_id) => format!("{parent_id}/{}", raw.slug),
                None => raw.slug.clone(),
            };
            if self.pages.contains_key(&id) {
                return Err(InfraError::fixture(id, "duplicate page id"));
            }

            let mut record = ItemRecord::page(&id)?;
            record.template = raw.template.unwrap_or_else(|| "default".to_string());
            record.status = Some(raw.status.unwrap_or(if raw.num.is_some() {
                PageStatus::Listed
            } else {
                PageStatus::Unlisted
            }));
            record.num = raw.num;
            record.readable = raw.readable;
            record.content = raw.content;
            record.permissions = raw
                .permissions
                .unwrap_or_else(|| Permissions::granting(DEFAULT_ACTIONS));

            let node = self.nodes.entry(parent.clone()).or_default();
            if record.status == Some(PageStatus::Draft) {
                node.drafts.push(id.clone());
            } else {
                node.children.push(id.clone());
            }
            self.pages.insert(id.clone(), record);

            let model = ModelRef::page(id);
            self.add_files(&model, raw.files)?;
            self.add_pages(&model, raw.children)?;
        }
        Ok(())
    }

    fn add_files(&mut self, parent: &ModelRef, files: Vec<RawFile>) -> Result<(), InfraError> {
        let mut records = Vec::with_capacity(files.len());
        for raw in files {
            let url = raw
                .url
                .unwrap_or_else(|| media_url(parent, &raw.filename));
            let mut record = ItemRecord::file(parent, &raw.filename, &url)?;
            record.template = raw.template.unwrap_or_else(|| "default".to_string());
            record.readable = raw.readable;
            record.content = raw.content;
            record.permissions = raw
                .permissions
                .unwrap_or_else(|| Permissions::granting(DEFAULT_ACTIONS));
            record.file = Some(FileAttributes {
                filename: raw.filename,
                url,
                mime: raw.mime,
            });
            records.push(record);
        }
        self.files.entry(parent.clone()).or_default().extend(records);
        Ok(())
    }

    fn records(&self, ids: &[String]) -> ItemSet {
        ids.iter()
            .filter_map(|id| self.pages.get(id))
            .cloned()
            .collect()
    }
}

fn media_url(parent: &ModelRef, filename: &str) -> String {
    match (parent.kind(), parent.id()) {
        (ModelKind::User, Some(id)) => format!("/media/users/{id}/{filename}"),
        (_, Some(id)) => format!("/media/pages/{id}/{filename}"),
        _ => format!("/media/site/{filename}"),
    }
}

impl ContentRepository for ContentFixture {
    fn page(&self, id: &str) -> Option<ModelRef> {
        let id = id.trim_matches('/');
        self.pages.contains_key(id).then(|| ModelRef::page(id))
    }

    fn parent_of(&self, model: &ModelRef) -> Option<ModelRef> {
        match (model.kind(), model.id()) {
            (ModelKind::Page, Some(id)) => self.pages.get(id).map(|page| page.parent.clone()),
            (ModelKind::File, Some(id)) => self
                .files
                .values()
                .flatten()
                .find(|file| file.id == id)
                .map(|file| file.parent.clone()),
            _ => None,
        }
    }

    fn children(&self, parent: &ModelRef) -> ItemSet {
        self.nodes
            .get(parent)
            .map(|node| self.records(&node.children))
            .unwrap_or_default()
    }

    fn drafts(&self, parent: &ModelRef) -> ItemSet {
        self.nodes
            .get(parent)
            .map(|node| self.records(&node.drafts))
            .unwrap_or_default()
    }

    fn files(&self, parent: &ModelRef) -> ItemSet {
        self.files
            .get(parent)
            .map(|files| ItemSet::new(files.clone()))
            .unwrap_or_default()
    }
}

impl Blueprints for ContentFixture {
    fn accepted_mime(&self, file_template: &str) -> Option<String> {
        self.file_accept.get(file_template).cloned().flatten()
    }

    fn page_blueprint(&self, template: &str) -> Result<BlueprintInfo, HostError> {
        let blueprint =
            self.page_blueprints
                .get(template)
                .ok_or_else(|| HostError::BlueprintNotFound {
                    name: template.to_string(),
                })?;
        let title = blueprint
            .title
            .clone()
            .ok_or_else(|| HostError::InvalidBlueprint {
                name: template.to_string(),
                reason: "missing title".to_string(),
            })?;

        Ok(BlueprintInfo {
            name: format!("pages/{template}"),
            title,
        })
    }

    fn page_templates(&self) -> Vec<String> {
        self.page_blueprints.keys().cloned().collect()
    }
}
