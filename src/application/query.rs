//! Resolving a section's parent model and its candidate items.

use crate::application::collection::ItemSet;
use crate::application::error::SectionError;
use crate::application::host::{ContentRepository, SearchIndex};
use crate::domain::entities::ModelRef;
use crate::domain::types::{ModelKind, SectionKind, StatusFilter};

/// Filters applied to a pages section before ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub templates: Vec<String>,
    pub search: Option<String>,
}

/// The query to search with, only when search is enabled and the query has text.
pub fn active_search(enabled: bool, query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|query| enabled && !query.is_empty())
        .map(str::to_string)
}

/// Resolve the model whose items a section lists.
///
/// Without a query the hosting model is used. Supported queries: `site`,
/// `page`, `page.parent` (repeatable), `site.find("id")`, `site.page("id")`,
/// `page("id")`, `kirby.page("id")` and bare page ids.
pub fn parent_model(
    repo: &dyn ContentRepository,
    model: &ModelRef,
    query: Option<&str>,
    section: &str,
    kind: SectionKind,
) -> Result<ModelRef, SectionError> {
    let parent = match query.map(str::trim).filter(|query| !query.is_empty()) {
        None => model.clone(),
        Some(query) => evaluate_parent_query(repo, model, query)
            .ok_or_else(|| SectionError::parent_not_found(query, section))?,
    };

    let allowed = match kind {
        SectionKind::Pages => matches!(parent.kind(), ModelKind::Site | ModelKind::Page),
        SectionKind::Files => matches!(
            parent.kind(),
            ModelKind::Site | ModelKind::Page | ModelKind::User
        ),
    };
    if !allowed {
        return Err(SectionError::invalid_parent(section, kind));
    }

    Ok(parent)
}

fn evaluate_parent_query(
    repo: &dyn ContentRepository,
    model: &ModelRef,
    query: &str,
) -> Option<ModelRef> {
    if query == "site" {
        return Some(ModelRef::site());
    }

    for prefix in ["site.find(", "site.page(", "kirby.page(", "page("] {
        if let Some(argument) = query.strip_prefix(prefix) {
            let id = argument.strip_suffix(')')?.trim().trim_matches(['"', '\'']);
            return repo.page(id);
        }
    }

    if let Some(path) = query
        .strip_prefix("page")
        .filter(|path| path.is_empty() || path.starts_with('.'))
    {
        if model.kind() != ModelKind::Page {
            return None;
        }
        let mut current = model.clone();
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            if segment != "parent" {
                return None;
            }
            current = repo.parent_of(&current)?;
        }
        return Some(current);
    }

    repo.page(query)
}

/// Hosting model named by a path: `site`, `users/<id>` or an existing page id.
pub fn model_from_path(repo: &dyn ContentRepository, path: &str) -> Option<ModelRef> {
    let path = path.trim().trim_matches('/');
    if path.is_empty() || path == "site" {
        return Some(ModelRef::site());
    }
    if let Some(user) = path.strip_prefix("users/") {
        return (!user.is_empty() && !user.contains('/')).then(|| ModelRef::user(user));
    }
    repo.page(path)
}

/// Candidate pages: the status selects the base collection, then unreadable
/// pages, pages outside the template list and search misses are dropped.
pub fn resolve(
    repo: &dyn ContentRepository,
    search: &dyn SearchIndex,
    parent: &ModelRef,
    criteria: &FilterCriteria,
) -> ItemSet {
    let base = match criteria.status {
        StatusFilter::Draft => repo.drafts(parent),
        StatusFilter::Listed => repo.children(parent).listed(),
        StatusFilter::Published => repo.children(parent),
        StatusFilter::Unlisted => repo.children(parent).unlisted(),
        StatusFilter::All => repo.children(parent).merge(repo.drafts(parent)),
    };

    let filtered = base.readable().templates(&criteria.templates);

    match criteria.search.as_deref() {
        Some(query) => search.search(filtered, query),
        None => filtered,
    }
}

/// Candidate files of `parent`, optionally restricted to one template.
pub fn resolve_files(
    repo: &dyn ContentRepository,
    search: &dyn SearchIndex,
    parent: &ModelRef,
    template: Option<&str>,
    query: Option<&str>,
) -> ItemSet {
    let mut files = repo.files(parent).readable();
    if let Some(template) = template {
        files = files.filter(|file| file.template == template);
    }

    match query {
        Some(query) => search.search(files, query),
        None => files,
    }
}
