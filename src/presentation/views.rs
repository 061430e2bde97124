//! Serialized shapes of the section payload handed to the panel frontend.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::application::columns::ColumnSchema;
use crate::application::host::ImageView;
use crate::application::pagination::Pagination;
use crate::application::validate::ErrorMap;
use crate::domain::types::{CardSize, Layout, PageStatus};

/// A table row: built-in fields followed by custom cells.
pub type TableRow = IndexMap<String, Value>;

/// Primary table cell linking to the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCell {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItemView {
    pub drag_text: String,
    pub extension: String,
    pub filename: String,
    pub id: String,
    pub image: Option<ImageView>,
    pub info: String,
    pub link: String,
    pub mime: Option<String>,
    pub parent: String,
    pub template: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePermissionsView {
    pub sort: bool,
    pub change_slug: bool,
    pub change_status: bool,
    pub change_title: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageItemView {
    pub drag_text: String,
    pub id: String,
    pub image: Option<ImageView>,
    pub info: String,
    pub link: String,
    pub parent: Option<String>,
    pub permissions: PagePermissionsView,
    pub status: Option<PageStatus>,
    pub template: String,
    pub text: String,
}

/// Rows in the shape the configured layout expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionData<T> {
    Items(Vec<T>),
    Rows(Vec<TableRow>),
}

impl<T> SectionData<T> {
    pub fn len(&self) -> usize {
        match self {
            SectionData::Items(items) => items.len(),
            SectionData::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadView {
    pub accept: Option<String>,
    pub multiple: bool,
    pub max: Option<u32>,
    pub api: String,
    pub attributes: UploadAttributes,
}

/// Upload affordance; serialized as `false` when uploads are not possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    Disabled,
    Enabled(UploadView),
}

impl Upload {
    pub fn view(&self) -> Option<&UploadView> {
        match self {
            Upload::Disabled => None,
            Upload::Enabled(view) => Some(view),
        }
    }
}

impl Serialize for Upload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Upload::Disabled => serializer.serialize_bool(false),
            Upload::Enabled(view) => view.serialize(serializer),
        }
    }
}

/// Options every section sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonOptions {
    pub columns: ColumnSchema,
    pub empty: Option<String>,
    pub headline: String,
    pub help: Option<String>,
    pub layout: Layout,
    pub link: Option<String>,
    pub max: Option<u32>,
    pub min: Option<u32>,
    pub query: Option<String>,
    pub search: bool,
    pub size: CardSize,
    pub sortable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesOptions {
    pub accept: Option<String>,
    pub api_url: String,
    #[serde(flatten)]
    pub common: CommonOptions,
    pub upload: Upload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagesOptions {
    pub add: bool,
    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Complete payload of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView<T, O> {
    pub data: SectionData<T>,
    pub errors: ErrorMap,
    pub options: O,
    pub pagination: Pagination,
}

pub type FilesView = SectionView<FileItemView, FilesOptions>;
pub type PagesView = SectionView<PageItemView, PagesOptions>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_upload_serializes_as_false() {
        assert_eq!(
            serde_json::to_value(Upload::Disabled).expect("json"),
            Value::Bool(false)
        );
    }

    #[test]
    fn upload_attributes_skip_empty_values() {
        let upload = Upload::Enabled(UploadView {
            accept: None,
            multiple: true,
            max: None,
            api: "/api/site/files".into(),
            attributes: UploadAttributes {
                sort: None,
                template: None,
            },
        });
        insta::assert_json_snapshot!(upload, @r#"
        {
          "accept": null,
          "multiple": true,
          "max": null,
          "api": "/api/site/files",
          "attributes": {}
        }
        "#);
    }
}
