//! Syntactic validators for incoming identifiers.
//!
//! Failing validation is a `Rejected` outcome, not an error: processing
//! stops, the response is returned unmodified and the invalid hook fires
//! with a descriptive reason.

/// Checks a class identifier: a leading letter or underscore followed by
/// letters, digits, underscores or dot separators.
#[must_use]
pub fn is_valid_class_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
}

/// Checks a method or function name: a leading letter or underscore
/// followed by letters, digits or underscores.
#[must_use]
pub fn is_valid_method_name(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::simple("Calc")]
    #[case::dotted("App.Sub.Calc")]
    #[case::underscored("App_Calc")]
    #[case::leading_underscore("_internal")]
    fn accepts_well_formed_class_identifiers(#[case] value: &str) {
        assert!(is_valid_class_identifier(value));
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading_digit("9Calc")]
    #[case::injection("; DROP")]
    #[case::space("App Calc")]
    #[case::slash("App/Calc")]
    fn rejects_malformed_class_identifiers(#[case] value: &str) {
        assert!(!is_valid_class_identifier(value));
    }

    #[rstest]
    #[case::simple("add")]
    #[case::underscored("add_two")]
    fn accepts_well_formed_method_names(#[case] value: &str) {
        assert!(is_valid_method_name(value));
    }

    #[rstest]
    #[case::empty("")]
    #[case::dotted("add.two")]
    #[case::injection("add; alert(1)")]
    fn rejects_malformed_method_names(#[case] value: &str) {
        assert!(!is_valid_method_name(value));
    }
}
