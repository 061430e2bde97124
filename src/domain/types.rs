//! Shared domain enumerations and the coercion rules for their raw values.

use serde::{Deserialize, Serialize};

/// Status filter of a pages section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Draft,
    Listed,
    Published,
    Unlisted,
    #[default]
    All,
}

impl StatusFilter {
    /// Parse a configured status, accepting `drafts` as an alias and falling
    /// back to [`StatusFilter::All`] for anything unknown.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim() {
            "draft" | "drafts" => StatusFilter::Draft,
            "listed" => StatusFilter::Listed,
            "published" => StatusFilter::Published,
            "unlisted" => StatusFilter::Unlisted,
            _ => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Draft => "draft",
            StatusFilter::Listed => "listed",
            StatusFilter::Published => "published",
            StatusFilter::Unlisted => "unlisted",
            StatusFilter::All => "all",
        }
    }

    /// New pages always start as drafts, so only filters that show drafts can offer creation.
    pub fn shows_drafts(self) -> bool {
        matches!(self, StatusFilter::Draft | StatusFilter::All)
    }

    /// Manual ordering only exists among listed pages.
    pub fn shows_listed(self) -> bool {
        matches!(
            self,
            StatusFilter::Listed | StatusFilter::Published | StatusFilter::All
        )
    }
}

/// Publication state of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Draft,
    Unlisted,
    Listed,
}

impl PageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Unlisted => "unlisted",
            PageStatus::Listed => "listed",
        }
    }
}

/// Visual arrangement of a section's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    List,
    Cardlets,
    Cards,
    Table,
}

impl Layout {
    pub fn coerce(raw: &str) -> Self {
        match raw.trim() {
            "cardlets" => Layout::Cardlets,
            "cards" => Layout::Cards,
            "table" => Layout::Table,
            _ => Layout::List,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::List => "list",
            Layout::Cardlets => "cardlets",
            Layout::Cards => "cards",
            Layout::Table => "table",
        }
    }
}

/// Card size hint; `auto` lets the grid fill the available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSize {
    #[default]
    Auto,
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl CardSize {
    pub fn coerce(raw: &str) -> Self {
        match raw.trim() {
            "tiny" => CardSize::Tiny,
            "small" => CardSize::Small,
            "medium" => CardSize::Medium,
            "large" => CardSize::Large,
            "huge" => CardSize::Huge,
            _ => CardSize::Auto,
        }
    }
}

/// How a table column renders its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Image,
    Url,
    #[default]
    Text,
    Flag,
}

impl ColumnType {
    pub fn coerce(raw: &str) -> Self {
        match raw.trim() {
            "image" => ColumnType::Image,
            "url" => ColumnType::Url,
            "flag" => ColumnType::Flag,
            _ => ColumnType::Text,
        }
    }
}

/// Kind of content model a section can live on or list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Site,
    Page,
    File,
    User,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Site => "site",
            ModelKind::Page => "page",
            ModelKind::File => "file",
            ModelKind::User => "user",
        }
    }
}

/// The two section flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Files,
    Pages,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Files => "files",
            SectionKind::Pages => "pages",
        }
    }
}
