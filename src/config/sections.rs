//! Raw `[sections.<name>]` tables and their conversion into typed settings.

use std::num::NonZeroU32;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::application::columns::ColumnSettings;
use crate::application::host::ImageOptions;
use crate::application::i18n::TranslatableText;
use crate::application::sections::{
    CreateOption, FilesSectionSettings, PagesSectionSettings, SectionOptions, SectionSettings,
};
use crate::application::validate::ValidationBounds;
use crate::domain::types::{CardSize, ColumnType, Layout, StatusFilter};

use super::LoadError;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawSectionSettings {
    #[serde(rename = "type")]
    kind: Option<String>,
    headline: Option<TranslatableText>,
    label: Option<TranslatableText>,
    help: Option<TranslatableText>,
    empty: Option<TranslatableText>,
    layout: Option<String>,
    size: Option<String>,
    columns: IndexMap<String, RawColumn>,
    image: Option<RawImage>,
    info: Option<TranslatableText>,
    text: Option<TranslatableText>,
    limit: Option<u64>,
    min: Option<u32>,
    max: Option<u32>,
    search: Option<bool>,
    sortable: Option<bool>,
    #[serde(alias = "sortBy", alias = "sortby")]
    sort_by: Option<String>,
    flip: Option<bool>,
    parent: Option<String>,
    template: Option<String>,
    templates: Option<RawList>,
    status: Option<String>,
    create: Option<RawCreate>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawColumn {
    label: Option<TranslatableText>,
    #[serde(rename = "type")]
    column_type: Option<String>,
    width: Option<String>,
    value: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawImage {
    Toggle(bool),
    Options {
        #[serde(default)]
        ratio: Option<String>,
        #[serde(default)]
        back: Option<String>,
        #[serde(default)]
        cover: Option<bool>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawList {
    One(String),
    Many(Vec<String>),
}

impl RawList {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawList::One(value) => vec![value],
            RawList::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCreate {
    Toggle(bool),
    Templates(RawList),
}

pub(super) fn build_sections(
    raw: IndexMap<String, RawSectionSettings>,
) -> Result<IndexMap<String, SectionSettings>, LoadError> {
    raw.into_iter()
        .map(|(name, section)| {
            let settings = build_section(&name, section)?;
            Ok((name, settings))
        })
        .collect()
}

fn build_section(name: &str, raw: RawSectionSettings) -> Result<SectionSettings, LoadError> {
    // A section named `files` or `pages` may omit its type.
    let kind = raw.kind.clone().unwrap_or_else(|| name.to_string());

    match kind.trim() {
        "files" => {
            let options = build_options(name, &raw)?;
            Ok(SectionSettings::Files(FilesSectionSettings {
                options,
                template: raw.template.filter(|template| !template.trim().is_empty()),
            }))
        }
        "pages" => {
            let options = build_options(name, &raw)?;
            let templates = raw
                .templates
                .map(RawList::into_vec)
                .or_else(|| raw.template.map(|template| vec![template]))
                .unwrap_or_default();
            let create = match raw.create {
                None | Some(RawCreate::Toggle(true)) => CreateOption::Default,
                Some(RawCreate::Toggle(false)) => CreateOption::Disabled,
                Some(RawCreate::Templates(list)) => CreateOption::Templates(list.into_vec()),
            };

            Ok(SectionSettings::Pages(PagesSectionSettings {
                options,
                status: StatusFilter::coerce(raw.status.as_deref().unwrap_or_default()),
                templates,
                create,
            }))
        }
        other => Err(LoadError::invalid(
            format!("sections.{name}.type"),
            format!("unknown section type `{other}`; expected `files` or `pages`"),
        )),
    }
}

fn build_options(name: &str, raw: &RawSectionSettings) -> Result<SectionOptions, LoadError> {
    let mut options = SectionOptions::new(name);

    options.headline = raw.headline.clone().or_else(|| raw.label.clone());
    options.help = raw.help.clone();
    options.empty = raw.empty.clone();
    options.layout = raw.layout.as_deref().map(Layout::coerce).unwrap_or_default();
    options.size = raw.size.as_deref().map(CardSize::coerce).unwrap_or_default();
    options.columns = raw
        .columns
        .iter()
        .map(|(column, settings)| (column.clone(), build_column(settings)))
        .collect();
    options.image = match &raw.image {
        None | Some(RawImage::Toggle(true)) => Some(ImageOptions::default()),
        Some(RawImage::Toggle(false)) => None,
        Some(RawImage::Options { ratio, back, cover }) => Some(ImageOptions {
            ratio: ratio.clone(),
            back: back.clone(),
            cover: cover.unwrap_or(false),
        }),
    };
    options.info = raw.info.clone();
    options.text = raw.text.clone();
    if let Some(limit) = raw.limit {
        options.limit = non_zero_limit(name, limit)?;
    }
    options.bounds = ValidationBounds::new(raw.min, raw.max);
    options.search = raw.search.unwrap_or(false);
    options.sortable = raw.sortable.unwrap_or(true);
    options.sort_by = raw
        .sort_by
        .clone()
        .filter(|sort_by| !sort_by.trim().is_empty());
    options.flip = raw.flip.unwrap_or(false);
    options.parent = raw.parent.clone().filter(|parent| !parent.trim().is_empty());

    Ok(options)
}

fn build_column(raw: &RawColumn) -> ColumnSettings {
    ColumnSettings {
        label: raw.label.clone(),
        column_type: raw
            .column_type
            .as_deref()
            .map(ColumnType::coerce)
            .unwrap_or_default(),
        width: raw.width.clone(),
        value: raw.value.clone(),
        id: raw.id.clone(),
    }
}

fn non_zero_limit(name: &str, value: u64) -> Result<NonZeroU32, LoadError> {
    let key = format!("sections.{name}.limit");
    let value: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key.clone(), "value exceeds supported range for u32"))?;
    NonZeroU32::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
