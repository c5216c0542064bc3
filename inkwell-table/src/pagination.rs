//! Pagination window and navigation.

use std::ops::Range;

/// Page sizes offered when none are configured.
pub const DEFAULT_ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Number of pages needed for `count` rows. Zero when there are no rows.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Row range shown for `page`.
///
/// Pages past the end are clamped to the last page.
pub fn window(count: usize, page: usize, page_size: usize) -> Range<usize> {
    let pages = total_pages(count, page_size);
    if pages == 0 {
        return 0..0;
    }
    let page = page.min(pages - 1);
    let start = page * page_size;
    let end = count.min(start + page_size);
    start..end
}

/// Pagination state, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of rows across all pages.
    pub count: usize,
    /// Zero-based page index.
    pub page: usize,
    /// Page size, always greater than zero.
    pub rows_per_page: usize,
    /// Page sizes the user can pick from.
    pub rows_per_page_options: Vec<usize>,
    /// Whether first/last buttons are shown.
    pub show_first_last_buttons: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            count: 0,
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE_OPTIONS[1],
            rows_per_page_options: DEFAULT_ROWS_PER_PAGE_OPTIONS.to_vec(),
            show_first_last_buttons: false,
        }
    }
}

impl Pagination {
    /// Create pagination for `count` rows at `rows_per_page`.
    pub fn new(count: usize, rows_per_page: usize) -> Self {
        Self {
            count,
            rows_per_page: rows_per_page.max(1),
            ..Self::default()
        }
    }

    /// Set the page sizes offered.
    pub fn with_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        let mut options: Vec<usize> = options.into().into_iter().filter(|&o| o > 0).collect();
        options.sort_unstable();
        options.dedup();
        self.rows_per_page_options = options;
        self
    }

    /// Show first/last buttons.
    pub fn with_first_last_buttons(mut self) -> Self {
        self.show_first_last_buttons = true;
        self
    }

    /// Number of pages.
    pub fn total_pages(&self) -> usize {
        total_pages(self.count, self.rows_per_page)
    }

    /// The current page clamped into range.
    pub fn current_page(&self) -> usize {
        self.page.min(self.total_pages().saturating_sub(1))
    }

    /// Row range of the current page.
    pub fn window(&self) -> Range<usize> {
        window(self.count, self.page, self.rows_per_page)
    }

    /// Slice `rows` down to the current page.
    ///
    /// Uses `rows.len()` as the count, so the slice is always in bounds.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[window(rows.len(), self.page, self.rows_per_page)]
    }

    /// Display label, e.g. `"6–10 of 12"`, or `"0 of 0"` with no rows.
    pub fn label(&self) -> String {
        if self.count == 0 {
            return "0 of 0".to_string();
        }
        let range = self.window();
        format!("{}–{} of {}", range.start + 1, range.end, self.count)
    }

    /// Target of the "first page" control, `None` when disabled.
    pub fn first(&self) -> Option<usize> {
        (self.count > 0 && self.current_page() > 0).then_some(0)
    }

    /// Target of the "previous page" control, `None` when disabled.
    pub fn previous(&self) -> Option<usize> {
        let page = self.current_page();
        (self.count > 0 && page > 0).then(|| page - 1)
    }

    /// Target of the "next page" control, `None` when disabled.
    pub fn next(&self) -> Option<usize> {
        let page = self.current_page();
        (page + 1 < self.total_pages()).then(|| page + 1)
    }

    /// Target of the "last page" control, `None` when disabled.
    pub fn last(&self) -> Option<usize> {
        let pages = self.total_pages();
        (pages > 0 && self.current_page() + 1 < pages).then(|| pages - 1)
    }

    /// Move to `page`, clamped to the available pages.
    /// Returns `true` if the page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let page = page.min(self.total_pages().saturating_sub(1));
        let changed = page != self.page;
        self.page = page;
        changed
    }

    /// Change the page size. Resets to the first page.
    ///
    /// A size of zero is ignored and returns `false`.
    pub fn set_rows_per_page(&mut self, size: usize) -> bool {
        if size == 0 {
            return false;
        }
        self.rows_per_page = size;
        self.page = 0;
        true
    }

    /// Update the row count, keeping the page in range.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.page = self.current_page();
    }

    /// The page size option after the current one, wrapping around.
    pub fn next_rows_per_page_option(&self) -> Option<usize> {
        let options = &self.rows_per_page_options;
        if options.is_empty() {
            return None;
        }
        let next = options
            .iter()
            .copied()
            .find(|&o| o > self.rows_per_page)
            .unwrap_or(options[0]);
        (next != self.rows_per_page).then_some(next)
    }

    /// The page size option before the current one, wrapping around.
    pub fn previous_rows_per_page_option(&self) -> Option<usize> {
        let options = &self.rows_per_page_options;
        let last = *options.last()?;
        let previous = options
            .iter()
            .rev()
            .copied()
            .find(|&o| o < self.rows_per_page)
            .unwrap_or(last);
        (previous != self.rows_per_page).then_some(previous)
    }

    /// Render the control strip as one line of text.
    ///
    /// Disabled controls are drawn as blanks of the same width so the strip
    /// does not shift while paging.
    pub fn render_line(&self) -> String {
        fn control(glyph: &str, target: Option<usize>) -> String {
            match target {
                Some(_) => glyph.to_string(),
                None => " ".repeat(glyph.chars().count()),
            }
        }

        let mut parts = vec![format!("Rows per page: {}", self.rows_per_page), self.label()];
        if self.show_first_last_buttons {
            parts.push(control("«", self.first()));
        }
        parts.push(control("‹", self.previous()));
        parts.push(control("›", self.next()));
        if self.show_first_last_buttons {
            parts.push(control("»", self.last()));
        }
        parts.join("  ")
    }
}
