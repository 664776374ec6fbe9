//! Pagination bar arithmetic for listing pages.

/// Number of page links shown in the navigation bar.
pub const BAR_LENGTH: usize = 5;

/// Page numbers to render for the default bar length.
pub fn bar_numbers(current_page: usize, total_pages: usize) -> Vec<usize> {
    windowed(current_page, total_pages, BAR_LENGTH)
}

/// Page numbers for an arbitrary (odd) bar length.
///
/// The window centers on `current_page` and clips at both ends: it never
/// starts below zero and never runs past `total_pages`. Near the end the
/// window shrinks instead of shifting left.
pub fn windowed(current_page: usize, total_pages: usize, bar_length: usize) -> Vec<usize> {
    let start = current_page.saturating_sub(bar_length / 2);
    let end = (start + bar_length).min(total_pages);
    (start..end).collect()
}

/// The configured bar length, for templates that size the bar up front.
pub fn bar_length() -> usize {
    BAR_LENGTH
}
