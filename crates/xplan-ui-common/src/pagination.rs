//! Page windows over sorted result rows.

use serde::Serialize;

use crate::error::{Error, Result};

/// Page sizes offered by the views.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 25, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// `ceil(total / page_size)`; zero rows means zero pages.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Clamp a 1-based page into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(total, page_size).max(1))
}

/// One window of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Item count across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Slice `items` to the requested page, clamping out-of-range pages.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let page = clamp_page(page, total, page_size);
    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages: total_pages(total, page_size),
        total,
    }
}

/// Current page and page size of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page: usize,
    page_size: usize,
}

impl PaginationState {
    /// Start on page 1; `page_size` must be one of [`PAGE_SIZE_OPTIONS`].
    pub fn new(page_size: usize) -> Result<Self> {
        validate_page_size(page_size)?;
        Ok(Self { page: 1, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        validate_page_size(page_size)?;
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Jump to `page`, clamped against `total` items.
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.page = clamp_page(page, total, self.page_size);
    }

    pub fn next(&mut self, total: usize) {
        self.go_to(self.page.saturating_add(1), total);
    }

    pub fn previous(&mut self, total: usize) {
        self.go_to(self.page.saturating_sub(1), total);
    }

    /// Re-clamp after the item count changed.
    pub fn clamp(&mut self, total: usize) {
        self.go_to(self.page, total);
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total_pages(total, self.page_size)
    }

    pub fn apply<T: Clone>(&self, items: &[T]) -> Page<T> {
        paginate(items, self.page, self.page_size)
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn validate_page_size(page_size: usize) -> Result<()> {
    if PAGE_SIZE_OPTIONS.contains(&page_size) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "page size must be one of {PAGE_SIZE_OPTIONS:?}, got {page_size}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_windows() {
        let items: Vec<u32> = (1..=23).collect();

        let page = paginate(&items, 1, 10);
        assert_eq!(page.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.is_first());

        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23]);
        assert!(page.is_last());
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(paginate(&items, 9, 10).page, 3);
        assert_eq!(paginate(&items, 0, 10).page, 1);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 4, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_invariants_hold_for_many_shapes() {
        for total in 0..60usize {
            let items: Vec<usize> = (0..total).collect();
            for page_size in PAGE_SIZE_OPTIONS {
                for requested in 0..10 {
                    let page = paginate(&items, requested, page_size);
                    let max_page = total.div_ceil(page_size).max(1);
                    assert!((1..=max_page).contains(&page.page));
                    let expected = page_size.min(total.saturating_sub((page.page - 1) * page_size));
                    assert_eq!(page.items.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state = PaginationState::new(10).unwrap();
        state.go_to(3, 100);
        assert_eq!(state.page(), 3);

        state.set_page_size(50).unwrap();
        assert_eq!(state.page(), 1);
        assert!(state.set_page_size(7).is_err());
        assert_eq!(state.page_size(), 50);
    }

    #[test]
    fn test_clamp_after_total_shrinks() {
        let mut state = PaginationState::default();
        state.go_to(4, 100);
        assert_eq!(state.page(), 4);

        state.clamp(30);
        assert_eq!(state.page(), 2);

        state.previous(30);
        state.previous(30);
        assert_eq!(state.page(), 1);
    }
}
