//! Client-side identifier separator handling.

use serde::{Deserialize, Serialize};

/// Separator inserted between namespace segments in client-side identifiers.
///
/// Only `.` and `_` are meaningful on the client; any other configured value
/// normalises to [`Separator::Dot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Separator {
    /// Dotted identifiers (`App.Calc.add`). The default.
    #[default]
    #[serde(rename = ".")]
    Dot,
    /// Underscored identifiers (`App_Calc_add`).
    #[serde(rename = "_")]
    Underscore,
}

impl Separator {
    /// Returns the separator character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dot => '.',
            Self::Underscore => '_',
        }
    }

    /// Normalises a configured separator string.
    ///
    /// `"_"` selects [`Separator::Underscore`]; every other value, including
    /// the empty string, falls back to [`Separator::Dot`].
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        if value.trim() == "_" {
            Self::Underscore
        } else {
            Self::Dot
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Dot => ".",
            Self::Underscore => "_",
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::underscore("_", Separator::Underscore)]
    #[case::dot(".", Separator::Dot)]
    #[case::padded(" _ ", Separator::Underscore)]
    #[case::arbitrary("::", Separator::Dot)]
    #[case::empty("", Separator::Dot)]
    fn normalize_accepts_only_known_separators(#[case] input: &str, #[case] expected: Separator) {
        assert_eq!(Separator::normalize(input), expected);
    }

    #[test]
    fn default_is_dot() {
        assert_eq!(Separator::default(), Separator::Dot);
        assert_eq!(Separator::default().as_char(), '.');
    }
}
