//! Skip/limit pagination without total counts
//!
//! The backend never reports how many rows exist, so "is there a next page"
//! is inferred: a full page means there may be more, a short one means this
//! was the last.

pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    has_more: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self { page: 0, page_size: page_size.max(1), has_more: false }
    }

    /// Zero-based current page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// `(skip, limit)` for `page`; `None` when the offset overflows
    pub fn window_for(&self, page: usize) -> Option<(usize, usize)> {
        page.checked_mul(self.page_size).map(|skip| (skip, self.page_size))
    }

    pub fn window(&self) -> Option<(usize, usize)> {
        self.window_for(self.page)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.page.checked_add(1).filter(|_| self.has_more)
    }

    pub fn prev_page(&self) -> Option<usize> {
        self.page.checked_sub(1)
    }

    /// Record a successful fetch of `page` that returned `fetched` rows
    pub fn commit(&mut self, page: usize, fetched: usize) {
        self.page = page;
        self.has_more = fetched == self.page_size;
    }

    /// Back to the first page, e.g. after the filters changed
    pub fn reset(&mut self) {
        self.page = 0;
        self.has_more = false;
    }

    /// Human label, pages counted from 1
    pub fn label(&self) -> String {
        format!("Page {}", self.page + 1)
    }
}
