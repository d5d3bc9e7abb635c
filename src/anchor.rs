pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Returns the selector to scroll to for an in-page link, or `None` when the
/// click should keep its default behavior (a bare `#` or an external href).
pub fn fragment_selector(href: &str) -> Option<&str> {
    if href.starts_with('#') && href.len() > 1 {
        Some(href)
    } else {
        None
    }
}
