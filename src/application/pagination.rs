//! Offset pagination over an already ordered item set.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::application::collection::ItemSet;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Page the caller asked for. Page numbers are 1-based; `0` is read as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: NonZeroU32,
}

impl PageRequest {
    pub fn new(page: u32, limit: NonZeroU32) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit.get() as usize
    }
}

/// Pagination summary sent alongside the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub offset: usize,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let limit = request.limit.get() as usize;
        Self {
            page: request.page,
            limit: request.limit.get(),
            offset: request.offset(),
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// Items of the requested page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub items: ItemSet,
    pub pagination: Pagination,
}

/// Slice `[offset, offset + limit)` out of `items`. Pages past the end are empty.
pub fn paginate(items: ItemSet, request: PageRequest) -> PageSlice {
    let total = items.len();
    let pagination = Pagination::new(request, total);
    let offset = request.offset();

    if offset >= total {
        return PageSlice {
            items: ItemSet::default(),
            pagination,
        };
    }

    let items = items
        .into_iter()
        .skip(offset)
        .take(request.limit.get() as usize)
        .collect();

    PageSlice { items, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ItemRecord;

    fn pages(count: usize) -> ItemSet {
        (0..count)
            .map(|n| ItemRecord::page(&format!("page-{n}")).expect("page"))
            .collect()
    }

    fn limit(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).expect("non-zero limit")
    }

    #[test]
    fn slices_requested_page() {
        let slice = paginate(pages(5), PageRequest::new(2, limit(2)));
        let ids: Vec<_> = slice.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["page-2", "page-3"]);
        assert_eq!(slice.pagination.total, 5);
        assert_eq!(slice.pagination.pages, 3);
        assert_eq!(slice.pagination.offset, 2);
    }

    #[test]
    fn last_page_is_clamped() {
        let slice = paginate(pages(5), PageRequest::new(3, limit(2)));
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.pagination.page, slice.pagination.pages as u32);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let slice = paginate(pages(4), PageRequest::new(9, limit(2)));
        assert!(slice.items.is_empty());
        assert_eq!(slice.pagination.total, 4);
        assert_eq!(slice.pagination.pages, 2);
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let request = PageRequest::new(0, limit(10));
        assert_eq!(request.page, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn empty_set_has_no_pages() {
        let slice = paginate(ItemSet::default(), PageRequest::new(1, limit(20)));
        assert!(slice.items.is_empty());
        assert_eq!(slice.pagination.total, 0);
        assert_eq!(slice.pagination.pages, 0);
    }
}
