//! Fixed-size pages over a movie list, sized by what the terminal fits.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    columns: usize,
    rows: usize,
    /// 1-based.
    page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 5,
            page: 1,
        }
    }
}

impl Pager {
    /// Apply a new grid capacity and keep the current page in range for `len`.
    pub fn set_layout(&mut self, columns: usize, rows: usize, len: usize) {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
        self.clamp(len);
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn per_page(&self) -> usize {
        (self.columns * self.rows).max(1)
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.per_page()).max(1)
    }

    pub fn next(&mut self, len: usize) -> bool {
        if self.page < self.page_count(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Move to the page containing `index`.
    pub fn show(&mut self, index: usize) {
        self.page = index / self.per_page() + 1;
    }

    #[must_use]
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.per_page()).min(len);
        let end = (start + self.per_page()).min(len);
        start..end
    }

    /// Items of the current page split into grid rows.
    #[must_use]
    pub fn visible_rows<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        items[self.page_range(items.len())]
            .chunks(self.columns)
            .collect()
    }

    fn clamp(&mut self, len: usize) {
        self.page = self.page.clamp(1, self.page_count(len));
    }
}
