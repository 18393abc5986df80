/// Lookup strategy derived from a user-supplied account identifier.
///
/// Classification is pure string inspection; no catalog or network access
/// happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSelector {
    /// The identifier is a full account number (decimal digits only).
    Number(String),
    /// The identifier is an exact account name (lowercase letters, digits
    /// and hyphens only).
    Name(String),
    /// Anything else: a search expression matched against account names.
    Pattern(String),
}

impl AccountSelector {
    /// Classifies an identifier into a lookup strategy.
    ///
    /// Rules are applied in order: an all-digit string is a number; a string
    /// of lowercase letters, digits and hyphens is a name; everything else
    /// (including the empty string) is a search pattern.
    #[must_use]
    pub fn classify(identifier: &str) -> Self {
        if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
            return Self::Number(identifier.to_owned());
        }

        if !identifier.is_empty()
            && identifier
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Self::Name(identifier.to_owned());
        }

        Self::Pattern(identifier.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("123456789012"; "full account number")]
    #[test_case("0"; "single digit")]
    #[test_case("00012"; "leading zeros")]
    fn test_digit_identifiers_classify_by_number(identifier: &str) {
        assert_eq!(
            AccountSelector::classify(identifier),
            AccountSelector::Number(identifier.to_owned())
        );
    }

    #[test_case("prod-billing"; "name with hyphen")]
    #[test_case("sandbox"; "plain lowercase")]
    #[test_case("team-42-dev"; "digits mixed with letters")]
    #[test_case("-"; "lone hyphen")]
    fn test_lowercase_identifiers_classify_by_name(identifier: &str) {
        assert_eq!(
            AccountSelector::classify(identifier),
            AccountSelector::Name(identifier.to_owned())
        );
    }

    #[test_case("prod-.*"; "regex metacharacters")]
    #[test_case("Prod"; "uppercase")]
    #[test_case("name with spaces"; "whitespace")]
    #[test_case("über"; "non-ascii")]
    #[test_case(""; "empty string")]
    fn test_everything_else_classifies_by_pattern(identifier: &str) {
        assert_eq!(
            AccountSelector::classify(identifier),
            AccountSelector::Pattern(identifier.to_owned())
        );
    }

    #[test]
    fn test_digits_take_precedence_over_name_rule() {
        // "42" satisfies the name character set too; the number rule wins.
        assert_eq!(
            AccountSelector::classify("42"),
            AccountSelector::Number("42".to_owned())
        );
    }
}
