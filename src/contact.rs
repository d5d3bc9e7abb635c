pub const FORM_ID: &str = "contactForm";
pub const NAME_SELECTOR: &str = "input[name=\"name\"]";
pub const EMAIL_SELECTOR: &str = "input[name=\"email\"]";
pub const MESSAGE_SELECTOR: &str = "textarea[name=\"message\"]";
pub const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";

/// Presence-only gating: the submit control is enabled once every required
/// field holds something other than whitespace.
pub fn submit_enabled(name: &str, email: &str, message: &str) -> bool {
    [name, email, message]
        .iter()
        .all(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn whitespace_only_field_disables_submit() {
        assert!(!submit_enabled(" ", "a@b.com", "hi"));
        assert!(!submit_enabled("A", "\t\n", "hi"));
        assert!(!submit_enabled("A", "a@b.com", ""));
    }

    #[test]
    fn all_fields_present_enables_submit() {
        assert!(submit_enabled("A", "a@b.com", "hi"));
        assert!(submit_enabled("  A ", "not-an-email", " hi"));
    }

    #[test]
    fn truth_table_matches_logical_and() {
        for mask in 0u8..8 {
            let pick = |bit: u8| if mask & bit != 0 { "x" } else { "   " };
            let expected = mask == 0b111;

            assert_eq!(submit_enabled(pick(1), pick(2), pick(4)), expected, "mask {mask:03b}");
        }
    }

    proptest! {
        #[test]
        fn padding_never_changes_the_outcome(
            name in "[ a-z]{0,6}",
            email in "[ a-z@.]{0,6}",
            message in "[ a-z]{0,6}",
            pad in "[ \t\n]{0,3}",
        ) {
            let padded = |value: &str| format!("{pad}{value}{pad}");

            prop_assert_eq!(
                submit_enabled(&padded(&name), &padded(&email), &padded(&message)),
                submit_enabled(&name, &email, &message)
            );
        }
    }
}
