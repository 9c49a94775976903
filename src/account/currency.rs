//! Currency codes for accounts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::control::{Error, Validation, Validator};

/// An ISO 4217 style currency code: three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses `code`, reporting every rule it breaks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use transfold::account::CurrencyCode;
    ///
    /// assert!(CurrencyCode::parse("EUR").is_valid());
    /// assert_eq!(CurrencyCode::parse("euro").into_errors().len(), 2);
    /// ```
    pub fn parse(code: &str) -> Validation<Self> {
        let rules = Validator::harvest([
            Validator::predicate(
                |code: &String| code.chars().all(|c| c.is_ascii_uppercase()),
                |code| Error::with_code("INVALID_CURRENCY", format!("{code} should be upper case")),
            ),
            Validator::predicate(
                |code: &String| code.chars().count() == 3,
                |code| Error::with_code("INVALID_CURRENCY", format!("{code} should be of length 3")),
            ),
        ]);
        rules.check(code.to_string()).map(Self)
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `XXX`, the code for "no currency".
impl Default for CurrencyCode {
    fn default() -> Self {
        Self("XXX".to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("EUR", 0)]
    #[case("eur", 1)]
    #[case("EURO", 1)]
    #[case("us", 2)]
    fn parse_harvests_rule_violations(#[case] input: &str, #[case] expected_errors: usize) {
        assert_eq!(CurrencyCode::parse(input).into_errors().len(), expected_errors);
    }

    #[rstest]
    fn serializes_as_plain_string() {
        let code = CurrencyCode::parse("GBP").to_option().unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"GBP\"");
    }
}
