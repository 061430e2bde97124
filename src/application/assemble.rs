//! UI affordances derived from the resolved set: sortability, creation,
//! uploads and the jump-to-parent link.

use crate::application::ordering::SortSpec;
use crate::application::validate::ValidationBounds;
use crate::presentation::views::{Upload, UploadAttributes, UploadView};

/// Manual drag sorting only makes sense on the natural, unmodified order.
pub fn sortable(enabled: bool, query: Option<&str>, sort: &SortSpec) -> bool {
    if !enabled {
        return false;
    }
    if query.is_some_and(|query| !query.trim().is_empty()) {
        return false;
    }
    if sort.is_explicit() {
        return false;
    }
    !sort.flip
}

/// Whether the "add page" button is shown.
pub fn addable(
    create_enabled: bool,
    shows_drafts: bool,
    bounds: ValidationBounds,
    total: usize,
) -> bool {
    create_enabled && shows_drafts && !bounds.is_full(total)
}

/// Inputs of the upload descriptor that do not come from the item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub accept: Option<String>,
    pub api: String,
    pub template: Option<String>,
    pub sortable: bool,
}

/// Upload descriptor for a files section holding `total` files.
pub fn upload(bounds: ValidationBounds, total: usize, target: UploadTarget) -> Upload {
    if bounds.is_full(total) {
        return Upload::Disabled;
    }

    let remaining = bounds
        .max
        .map(|max| max.saturating_sub(u32::try_from(total).unwrap_or(u32::MAX)));
    let multiple = remaining != Some(1);
    let template = target.template.filter(|template| template != "default");

    Upload::Enabled(UploadView {
        accept: target.accept,
        multiple,
        max: remaining,
        api: target.api,
        attributes: UploadAttributes {
            sort: target.sortable.then_some(total + 1),
            template,
        },
    })
}

/// The parent's panel URL, only when it differs from the hosting model's.
pub fn parent_link(model_url: &str, parent_url: String) -> Option<String> {
    (model_url != parent_url).then_some(parent_url)
}
