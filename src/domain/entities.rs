//! Read-only records describing the content models a section lists.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::types::{ModelKind, PageStatus};

/// Reference to a content model by kind and id. The site has no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    kind: ModelKind,
    id: Option<String>,
}

impl ModelRef {
    pub fn site() -> Self {
        Self {
            kind: ModelKind::Site,
            id: None,
        }
    }

    pub fn page(id: impl Into<String>) -> Self {
        Self {
            kind: ModelKind::Page,
            id: Some(id.into()),
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: ModelKind::User,
            id: Some(id.into()),
        }
    }

    pub fn file(id: impl Into<String>) -> Self {
        Self {
            kind: ModelKind::File,
            id: Some(id.into()),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Parent of a page id (`blog/hello` → `blog`), or the site for top-level pages.
    pub fn parent_of_page(id: &str) -> Self {
        match id.rsplit_once('/') {
            Some((parent, _)) => Self::page(parent),
            None => Self::site(),
        }
    }
}

/// Content fields of a model. Keys are stored lowercase and looked up
/// case-insensitively; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, String>")]
pub struct ContentFields(IndexMap<String, String>);

impl ContentFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_lowercase(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, String>> for ContentFields {
    fn from(raw: IndexMap<String, String>) -> Self {
        let mut fields = Self::new();
        for (key, value) in raw {
            fields.insert(&key, value);
        }
        fields
    }
}

/// Boolean grants a user holds on an item. Unknown actions are denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<String, bool>);

impl Permissions {
    /// Every listed action granted.
    pub fn granting<'a>(actions: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            actions
                .into_iter()
                .map(|action| (action.to_string(), true))
                .collect(),
        )
    }

    pub fn set(mut self, action: &str, allowed: bool) -> Self {
        self.0.insert(action.to_string(), allowed);
        self
    }

    pub fn can(&self, action: &str) -> bool {
        self.0.get(action).copied().unwrap_or(false)
    }
}

/// Attributes only files carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub mime: Option<String>,
}

impl FileAttributes {
    pub fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    /// Explicit MIME type, or the one guessed from the file extension.
    pub fn mime(&self) -> Option<String> {
        self.mime.clone().or_else(|| {
            mime_guess::from_path(&self.filename)
                .first()
                .map(|mime| mime.essence_str().to_string())
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime()
            .is_some_and(|mime| mime.starts_with("image/"))
    }
}

/// A page or file as the host CMS exposes it to a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub kind: ModelKind,
    pub parent: ModelRef,
    pub template: String,
    pub status: Option<PageStatus>,
    pub num: Option<u32>,
    pub readable: bool,
    pub content: ContentFields,
    pub permissions: Permissions,
    pub file: Option<FileAttributes>,
}

impl ItemRecord {
    /// A readable, unlisted page using the `default` template.
    pub fn page(id: &str) -> Result<Self, DomainError> {
        let id = id.trim_matches('/');
        if id.is_empty() {
            return Err(DomainError::validation("page id must not be empty"));
        }

        Ok(Self {
            id: id.to_string(),
            kind: ModelKind::Page,
            parent: ModelRef::parent_of_page(id),
            template: "default".to_string(),
            status: Some(PageStatus::Unlisted),
            num: None,
            readable: true,
            content: ContentFields::new(),
            permissions: Permissions::default(),
            file: None,
        })
    }

    /// A readable file attached to `parent`.
    pub fn file(parent: &ModelRef, filename: &str, url: &str) -> Result<Self, DomainError> {
        if filename.trim().is_empty() {
            return Err(DomainError::validation("filename must not be empty"));
        }
        if filename.contains('/') {
            return Err(DomainError::validation(format!(
                "filename `{filename}` must not contain a path separator"
            )));
        }

        let id = match parent.id() {
            Some(parent_id) => format!("{parent_id}/{filename}"),
            None => filename.to_string(),
        };

        Ok(Self {
            id,
            kind: ModelKind::File,
            parent: parent.clone(),
            template: "default".to_string(),
            status: None,
            num: None,
            readable: true,
            content: ContentFields::new(),
            permissions: Permissions::default(),
            file: Some(FileAttributes {
                filename: filename.to_string(),
                url: url.to_string(),
                mime: None,
            }),
        })
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    pub fn with_status(mut self, status: PageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    pub fn with_content(mut self, content: ContentFields) -> Self {
        self.content = content;
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Last id segment (the filename for files).
    pub fn slug(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    pub fn filename(&self) -> Option<&str> {
        self.file.as_ref().map(|file| file.filename.as_str())
    }

    pub fn title(&self) -> String {
        self.content
            .get("title")
            .map(str::to_string)
            .unwrap_or_else(|| self.slug().to_string())
    }

    /// Whitelisted scalar fields, falling back to the content field of the same name.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.clone()),
            "slug" => Some(self.slug().to_string()),
            "template" => Some(self.template.clone()),
            "status" => self.status.map(|status| status.as_str().to_string()),
            "num" | "sort" => self
                .num
                .map(|num| num.to_string())
                .or_else(|| self.content.get(name).map(str::to_string)),
            "title" => Some(self.title()),
            "parent" => self.parent.id().map(str::to_string),
            "filename" | "extension" | "mime" | "url" if self.file.is_some() => {
                let file = self.file.as_ref()?;
                match name {
                    "filename" => Some(file.filename.clone()),
                    "extension" => Some(file.extension()),
                    "mime" => file.mime(),
                    _ => Some(file.url.clone()),
                }
            }
            other => self.content.get(other).map(str::to_string),
        }
    }
}
