pub const NAV_TOGGLE_SELECTOR: &str = ".nav-toggle";
pub const NAV_PANEL_SELECTOR: &str = ".nav";

const SHOWN_DISPLAY: &str = "block";

/// Next inline `display` value for the navigation panel. An empty string
/// hands control back to the stylesheet.
pub fn toggled_display(current: &str) -> &'static str {
    if current == SHOWN_DISPLAY {
        ""
    } else {
        SHOWN_DISPLAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_between_block_and_stylesheet_default() {
        assert_eq!(toggled_display(""), "block");
        assert_eq!(toggled_display("block"), "");
        assert_eq!(toggled_display(toggled_display("")), "");
    }

    #[test]
    fn any_other_inline_value_opens_the_panel() {
        assert_eq!(toggled_display("none"), "block");
        assert_eq!(toggled_display("flex"), "block");
    }
}
