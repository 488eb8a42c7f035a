use std::cmp::{max, min};
use std::ops::RangeInclusive;

/// Most page numbers shown at once in the pagination footer.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One entry of the pagination footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    /// Skipped pages between the first or last page and the window.
    Gap,
}

/// Splits a row list into 1-based pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
}

/// Rows shown on one page, as 1-based positions in the full list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBounds {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { page_size: 50 }
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: max(page_size, 1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Returns the rows of page `page`. Pages outside `1..=total_pages` are empty.
    pub fn page<'a, T>(&self, rows: &'a [T], page: usize) -> &'a [T] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.page_size);
        if start >= rows.len() {
            return &[];
        }
        let end = min(start + self.page_size, rows.len());
        &rows[start..end]
    }

    pub fn page_bounds(&self, len: usize, page: usize) -> Option<PageBounds> {
        if page == 0 || page > self.total_pages(len) {
            return None;
        }
        let start = (page - 1) * self.page_size + 1;
        Some(PageBounds {
            start,
            end: min(page * self.page_size, len),
            total: len,
        })
    }

    /// Page numbers to show around `current`: at most [`MAX_VISIBLE_PAGES`],
    /// centred where possible and shifted to stay within `1..=total`.
    pub fn visible_pages(current: usize, total: usize) -> RangeInclusive<usize> {
        if total == 0 {
            return 1..=0;
        }
        let current = current.clamp(1, total);
        let mut start = max(1, current.saturating_sub(MAX_VISIBLE_PAGES / 2));
        let end = min(total, start + MAX_VISIBLE_PAGES - 1);
        if end - start < MAX_VISIBLE_PAGES - 1 {
            start = max(1, (end + 1).saturating_sub(MAX_VISIBLE_PAGES));
        }
        start..=end
    }

    /// The footer: the visible window, plus the first and last page when the
    /// window does not reach them, separated by a gap when pages are skipped.
    pub fn footer_links(current: usize, total: usize) -> Vec<PageLink> {
        let window = Self::visible_pages(current, total);
        if window.is_empty() {
            return Vec::new();
        }
        let (start, end) = (*window.start(), *window.end());
        let mut links = Vec::with_capacity(MAX_VISIBLE_PAGES + 4);
        if start > 1 {
            links.push(PageLink::Page(1));
            if start > 2 {
                links.push(PageLink::Gap);
            }
        }
        links.extend(window.map(PageLink::Page));
        if end < total {
            if end < total - 1 {
                links.push(PageLink::Gap);
            }
            links.push(PageLink::Page(total));
        }
        links
    }
}
