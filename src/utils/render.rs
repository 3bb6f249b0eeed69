use crate::page_window::{PageToken, PageWindow};

/// Text pagination bar, e.g. `‹ Prev  1 … 4 [5] 6 … 10  Next ›`.
/// The current page is bracketed.
pub fn render_page_bar(window: &PageWindow) -> String {
    let slots: Vec<String> = window
        .tokens
        .iter()
        .map(|token| match token {
            PageToken::Page { number } if *number == window.current_page => format!("[{number}]"),
            PageToken::Page { number } => number.to_string(),
            PageToken::Ellipsis => "…".to_string(),
        })
        .collect();

    if slots.is_empty() {
        "‹ Prev  Next ›".to_string()
    } else {
        format!("‹ Prev  {}  Next ›", slots.join(" "))
    }
}
