//! Page-window math for pagination controls.
//!
//! Given a total, a page size and the current page, decide which page
//! buttons and ellipses a pagination bar shows. Everything here is pure;
//! [`PageControls`] only adds the page-change callback on top.

use serde::Serialize;

use crate::pagination::total_pages;

/// One slot of a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageToken {
    Page { number: u64 },
    Ellipsis,
}

impl PageToken {
    pub fn page_number(&self) -> Option<u64> {
        match self {
            PageToken::Page { number } => Some(*number),
            PageToken::Ellipsis => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindowRequest {
    pub total_items: u64,
    /// Not clamped; callers keep it within `1..=total_pages`.
    pub current_page: u64,
    pub page_size: u64,
    pub max_visible_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub total_pages: u64,
    pub current_page: u64,
    pub tokens: Vec<PageToken>,
}

impl PageWindowRequest {
    pub fn new(total_items: u64, current_page: u64, page_size: u64, max_visible_pages: u64) -> Self {
        Self {
            total_items,
            current_page,
            page_size,
            max_visible_pages,
        }
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_items, self.page_size)
    }

    /// Page to go to from "previous"; stays on 1 at the first page.
    pub fn previous_page(&self) -> u64 {
        self.current_page.saturating_sub(1).max(1)
    }

    /// Page to go to from "next"; stays on the last page at the end, and
    /// on page 1 for an empty listing.
    pub fn next_page(&self) -> u64 {
        self.current_page.saturating_add(1).min(self.total_pages().max(1))
    }

    /// Inclusive bounds of the contiguous run of page buttons around the
    /// current page, or `None` when there are no pages.
    fn visible_range(&self) -> Option<(u64, u64)> {
        let total = self.total_pages();
        if total == 0 {
            return None;
        }
        let span = self.max_visible_pages.max(1);

        let mut start = self.current_page.saturating_sub(span / 2).max(1);
        let end = (start + span - 1).min(total);

        // Near the end the window comes up short; pull the start back.
        if end + 1 < start + span {
            start = (end + 1).saturating_sub(span).max(1);
        }

        Some((start, end))
    }

    pub fn compute(&self) -> PageWindow {
        let total = self.total_pages();
        let mut tokens = Vec::new();

        if let Some((start, end)) = self.visible_range() {
            if start > 1 {
                tokens.push(PageToken::Page { number: 1 });
                if start > 2 {
                    tokens.push(PageToken::Ellipsis);
                }
            }

            tokens.extend((start..=end).map(|number| PageToken::Page { number }));

            if end < total {
                if end + 1 < total {
                    tokens.push(PageToken::Ellipsis);
                }
                tokens.push(PageToken::Page { number: total });
            }
        }

        PageWindow {
            total_pages: total,
            current_page: self.current_page,
            tokens,
        }
    }
}

/// A computed window bound to the callback that changes the page.
pub struct PageControls<F> {
    request: PageWindowRequest,
    window: PageWindow,
    on_page_change: F,
}

impl<F: Fn(u64)> PageControls<F> {
    pub fn new(request: PageWindowRequest, on_page_change: F) -> Self {
        Self {
            window: request.compute(),
            request,
            on_page_change,
        }
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn total_pages(&self) -> u64 {
        self.window.total_pages
    }

    pub fn go_to_previous(&self) {
        (self.on_page_change)(self.request.previous_page());
    }

    pub fn go_to_next(&self) {
        (self.on_page_change)(self.request.next_page());
    }

    /// Jump to a page button. Ellipses are not clickable.
    pub fn go_to(&self, token: PageToken) {
        if let Some(number) = token.page_number() {
            (self.on_page_change)(number);
        }
    }
}
