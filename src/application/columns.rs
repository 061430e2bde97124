//! Table column schema and per-item cell projection.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::application::i18n::{TranslatableText, Translator};
use crate::domain::entities::ItemRecord;
use crate::domain::template::render_safe;
use crate::domain::types::{ColumnType, SectionKind};

const ROW_HEIGHT_WIDTH: &str = "var(--table-row-height)";

/// A configured extra column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSettings {
    pub label: Option<TranslatableText>,
    pub column_type: ColumnType,
    pub width: Option<String>,
    /// Template rendered against the item instead of a field lookup.
    pub value: Option<String>,
    /// Content field to read; defaults to the column name.
    pub id: Option<String>,
}

/// One column of the table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Column {
    fn builtin(label: impl Into<String>, column_type: ColumnType, width: Option<&str>) -> Self {
        Self {
            label: label.into(),
            column_type,
            width: width.map(str::to_string),
            value: None,
            id: None,
        }
    }
}

/// Ordered column schema keyed by column identifier.
pub type ColumnSchema = IndexMap<String, Column>;

/// Which optional built-in columns a section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltIns {
    pub image: bool,
    pub info: bool,
}

/// Key of the primary text column for a section kind.
pub fn primary_column(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Files => "filename",
        SectionKind::Pages => "title",
    }
}

/// Built-ins first (image, primary, info), then custom columns as `<name>Cell`,
/// then the status flag for pages.
pub fn schema(
    kind: SectionKind,
    builtins: BuiltIns,
    custom: &IndexMap<String, ColumnSettings>,
    translator: &dyn Translator,
) -> ColumnSchema {
    let mut columns = ColumnSchema::new();

    if builtins.image {
        columns.insert(
            "image".to_string(),
            Column::builtin(" ", ColumnType::Image, Some(ROW_HEIGHT_WIDTH)),
        );
    }

    let primary = primary_column(kind);
    let primary_label = translator
        .translate(primary)
        .unwrap_or_else(|| ucfirst(primary));
    columns.insert(
        primary.to_string(),
        Column::builtin(primary_label, ColumnType::Url, None),
    );

    if builtins.info {
        let label = translator
            .translate("info")
            .unwrap_or_else(|| "Info".to_string());
        columns.insert(
            "info".to_string(),
            Column::builtin(label, ColumnType::Text, None),
        );
    }

    for (name, settings) in custom {
        let label = settings
            .label
            .as_ref()
            .map(|label| label.resolve(translator))
            .unwrap_or_else(|| ucfirst(name));
        columns
            .entry(format!("{name}Cell"))
            .or_insert_with(|| Column {
                label,
                column_type: settings.column_type,
                width: settings.width.clone(),
                value: settings.value.clone(),
                id: Some(name.clone()),
            });
    }

    if kind == SectionKind::Pages {
        columns.insert(
            "flag".to_string(),
            Column::builtin(" ", ColumnType::Flag, Some(ROW_HEIGHT_WIDTH)),
        );
    }

    columns
}

/// Value of one custom column for `item`: the rendered value template when
/// present, otherwise the raw content field. Missing fields are `null`.
pub fn cell_value(item: &ItemRecord, name: &str, settings: &ColumnSettings) -> Value {
    match settings.value.as_deref().filter(|value| !value.is_empty()) {
        Some(template) => Value::String(render_safe(template, item)),
        None => {
            let field = settings.id.as_deref().unwrap_or(name);
            item.content
                .get(field)
                .map_or(Value::Null, |value| Value::String(value.to_string()))
        }
    }
}

/// Append custom cells to a table row without touching keys it already has.
pub fn append_custom_cells(
    row: &mut IndexMap<String, Value>,
    item: &ItemRecord,
    custom: &IndexMap<String, ColumnSettings>,
) {
    for (name, settings) in custom {
        if row.contains_key(name) {
            continue;
        }
        row.insert(name.clone(), cell_value(item, name, settings));
    }
}

pub(crate) fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
