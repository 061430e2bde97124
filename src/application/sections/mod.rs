//! Files and pages sections: typed settings and the service that turns them
//! into view models.

mod files;
mod pages;

use std::num::NonZeroU32;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::application::collection::ContentSearch;
use crate::application::columns::{BuiltIns, ColumnSettings, schema, ucfirst};
use crate::application::error::SectionError;
use crate::application::host::{
    Blueprints, ContentRepository, ImageOptions, PanelLinks, SearchIndex,
};
use crate::application::i18n::{TranslatableText, Translator};
use crate::application::ordering::SortSpec;
use crate::application::pagination::DEFAULT_PAGE_LIMIT;
use crate::application::validate::ValidationBounds;
use crate::domain::types::{CardSize, Layout, SectionKind, StatusFilter};
use crate::presentation::views::{CommonOptions, TableRow};

pub const METRIC_VIEWS_TOTAL: &str = "panel_sections_views_total";
pub const METRIC_BUILD_MS: &str = "panel_sections_build_ms";

/// Options shared by both section kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOptions {
    pub name: String,
    pub headline: Option<TranslatableText>,
    pub help: Option<TranslatableText>,
    pub empty: Option<TranslatableText>,
    pub layout: Layout,
    pub size: CardSize,
    pub columns: IndexMap<String, ColumnSettings>,
    /// `None` hides preview images.
    pub image: Option<ImageOptions>,
    pub info: Option<TranslatableText>,
    /// Main text template; the section kind supplies the default.
    pub text: Option<TranslatableText>,
    pub limit: NonZeroU32,
    pub bounds: ValidationBounds,
    pub search: bool,
    pub sortable: bool,
    pub sort_by: Option<String>,
    pub flip: bool,
    /// Query selecting another model than the hosting one.
    pub parent: Option<String>,
}

impl SectionOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headline: None,
            help: None,
            empty: None,
            layout: Layout::default(),
            size: CardSize::default(),
            columns: IndexMap::new(),
            image: Some(ImageOptions::default()),
            info: None,
            text: None,
            limit: NonZeroU32::new(DEFAULT_PAGE_LIMIT).unwrap_or(NonZeroU32::MIN),
            bounds: ValidationBounds::default(),
            search: false,
            sortable: true,
            sort_by: None,
            flip: false,
            parent: None,
        }
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_by.as_deref(), self.flip)
    }

    /// Configured headline, or the capitalised section name.
    pub fn headline(&self, translator: &dyn Translator) -> String {
        self.headline
            .as_ref()
            .map(|headline| headline.resolve(translator))
            .unwrap_or_else(|| ucfirst(&self.name))
    }

    fn text_template(&self, kind: SectionKind, translator: &dyn Translator) -> String {
        match &self.text {
            Some(text) => text.resolve(translator),
            None => match kind {
                SectionKind::Files => "{{ file.filename }}".to_string(),
                SectionKind::Pages => "{{ page.title }}".to_string(),
            },
        }
    }

    fn info_template(&self, translator: &dyn Translator) -> Option<String> {
        self.info
            .as_ref()
            .map(|info| info.resolve(translator))
            .filter(|info| !info.is_empty())
    }

    /// Options block shared by both payloads.
    fn common(
        &self,
        kind: SectionKind,
        headline: String,
        link: Option<String>,
        query: Option<String>,
        sortable: bool,
        translator: &dyn Translator,
    ) -> CommonOptions {
        let builtins = BuiltIns {
            image: self.image.is_some(),
            info: self.info_template(translator).is_some(),
        };

        CommonOptions {
            columns: schema(kind, builtins, &self.columns, translator),
            empty: self.empty.as_ref().map(|empty| empty.resolve(translator)),
            headline,
            help: self.help.as_ref().map(|help| help.resolve(translator)),
            layout: self.layout,
            link,
            max: self.bounds.max,
            min: self.bounds.min,
            query,
            search: self.search,
            size: self.size,
            sortable,
        }
    }
}

/// A files section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesSectionSettings {
    pub options: SectionOptions,
    /// Filters files by template and becomes the template of new uploads.
    pub template: Option<String>,
}

impl FilesSectionSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: SectionOptions::new(name),
            template: None,
        }
    }
}

/// Which templates the "add page" dialog offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CreateOption {
    /// Fall back to the section templates, then to every blueprint.
    #[default]
    Default,
    Disabled,
    Templates(Vec<String>),
}

/// A pages section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesSectionSettings {
    pub options: SectionOptions,
    pub status: StatusFilter,
    pub templates: Vec<String>,
    pub create: CreateOption,
}

impl PagesSectionSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            options: SectionOptions::new(name),
            status: StatusFilter::default(),
            templates: Vec::new(),
            create: CreateOption::default(),
        }
    }
}

/// A configured section of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionSettings {
    Files(FilesSectionSettings),
    Pages(PagesSectionSettings),
}

impl SectionSettings {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionSettings::Files(_) => SectionKind::Files,
            SectionSettings::Pages(_) => SectionKind::Pages,
        }
    }

    pub fn options(&self) -> &SectionOptions {
        match self {
            SectionSettings::Files(settings) => &settings.options,
            SectionSettings::Pages(settings) => &settings.options,
        }
    }
}

/// Per-request input: the page number and the search box contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRequest {
    pub page: u32,
    pub query: Option<String>,
}

impl SectionRequest {
    pub fn new(page: u32, query: Option<String>) -> Self {
        Self { page, query }
    }
}

impl Default for SectionRequest {
    fn default() -> Self {
        Self::new(1, None)
    }
}

/// Builds section view models from the host's collaborators.
#[derive(Clone)]
pub struct SectionService {
    repo: Arc<dyn ContentRepository>,
    panel: Arc<dyn PanelLinks>,
    blueprints: Arc<dyn Blueprints>,
    translator: Arc<dyn Translator>,
    search: Arc<dyn SearchIndex>,
}

impl SectionService {
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        panel: Arc<dyn PanelLinks>,
        blueprints: Arc<dyn Blueprints>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            repo,
            panel,
            blueprints,
            translator,
            search: Arc::new(ContentSearch),
        }
    }

    /// Replace the default content search.
    pub fn with_search(mut self, search: Arc<dyn SearchIndex>) -> Self {
        self.search = search;
        self
    }
}

fn to_row(view: &impl Serialize) -> Result<TableRow, SectionError> {
    let row = serde_json::from_value(serde_json::to_value(view)?)?;
    Ok(row)
}
