//! Validation type for multi-error domain checks.
//!
//! `Validation<T>` is either `Valid(T)` or `Invalid(Errors)`, where
//! [`Errors`] is a non-empty, ordered list of [`Error`] descriptors.
//!
//! Two combination disciplines are available and give different results on
//! the same input:
//!
//! - **Fail-fast** ([`Validation::bind`], [`Validator::fail_fast`],
//!   [`traverse_fail_fast`]): the first invalid step becomes the whole
//!   result; later steps are never evaluated.
//! - **Harvesting** ([`Validation::map2`], [`Validator::harvest`],
//!   [`traverse_harvest`]): every check is evaluated and the errors of all
//!   invalid checks are concatenated in check order.
//!
//! `map2` is the one harvesting primitive. Many rules over one value
//! ([`Validator::harvest`]) and one rule over many values
//! ([`traverse_harvest`]) are both folds over it, kept as separate,
//! explicitly named operations.
//!
//! # Examples
//!
//! ```rust
//! use transfold::control::{Error, Validation, Validator};
//!
//! let lower_case = Validator::predicate(
//!     |s: &String| *s == s.to_lowercase(),
//!     |s| Error::new(format!("{s} should be lower case")),
//! );
//! let length_two = Validator::predicate(
//!     |s: &String| s.chars().count() == 2,
//!     |s| Error::new(format!("{s} should be of length 2")),
//! );
//!
//! let harvest = Validator::harvest([lower_case.clone(), length_two.clone()]);
//! let fail_fast = Validator::fail_fast([lower_case, length_two]);
//!
//! assert_eq!(harvest.check("USA".to_string()).into_errors().len(), 2);
//! assert_eq!(fail_fast.check("USA".to_string()).into_errors().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use super::either::Either;
use super::exceptional::Exceptional;

/// Code attached to errors built without an explicit one.
pub const DEFAULT_ERROR_CODE: &str = "VALIDATION_ERROR";

// =============================================================================
// Error
// =============================================================================

/// A single, display-formattable validation error.
///
/// The algebra treats it as opaque; the `code` is for programmatic handling
/// at the outer boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Error {
    code: String,
    message: String,
}

impl Error {
    /// Creates an error with the default code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_code(DEFAULT_ERROR_CODE, message)
    }

    /// Creates an error with an explicit code.
    #[must_use]
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

// =============================================================================
// Errors
// =============================================================================

/// A non-empty, ordered collection of validation errors.
///
/// There is no way to build an empty `Errors`, so an `Invalid` validation
/// always carries at least one error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Error>", into = "Vec<Error>")]
pub struct Errors(SmallVec<[Error; 1]>);

impl Errors {
    /// Creates a collection holding a single error.
    #[must_use]
    pub fn single(error: Error) -> Self {
        Self(smallvec![error])
    }

    /// Creates a collection from a vector, or `None` if it is empty.
    #[must_use]
    pub fn from_vec(errors: Vec<Error>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(SmallVec::from_vec(errors)))
        }
    }

    /// Appends `other` after `self`, preserving both orders.
    #[must_use]
    pub fn concat(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }

    /// The first error detected.
    #[must_use]
    pub fn first(&self) -> &Error {
        &self.0[0]
    }

    /// Number of errors, always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the errors in detection order.
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    /// Converts into a vector of errors.
    #[must_use]
    pub fn into_vec(self) -> Vec<Error> {
        self.0.into_vec()
    }
}

impl From<Error> for Errors {
    fn from(error: Error) -> Self {
        Self::single(error)
    }
}

impl TryFrom<Vec<Error>> for Errors {
    type Error = &'static str;

    fn try_from(errors: Vec<Error>) -> Result<Self, Self::Error> {
        Self::from_vec(errors).ok_or("an error list must not be empty")
    }
}

impl From<Errors> for Vec<Error> {
    fn from(errors: Errors) -> Self {
        errors.into_vec()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(Error::message).collect();
        write!(formatter, "{}", messages.join(", "))
    }
}

impl std::error::Error for Errors {}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = smallvec::IntoIter<[Error; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Validation
// =============================================================================

/// The outcome of checking a value against domain rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validation<T> {
    /// Every rule passed.
    Valid(T),
    /// At least one rule failed.
    Invalid(Errors),
}

impl<T> Validation<T> {
    /// Creates a valid result.
    #[must_use]
    pub const fn valid(value: T) -> Self {
        Self::Valid(value)
    }

    /// Creates an invalid result with a single error.
    #[must_use]
    pub fn invalid(error: Error) -> Self {
        Self::Invalid(Errors::single(error))
    }

    /// Creates an invalid result from an existing error list.
    #[must_use]
    pub const fn invalid_many(errors: Errors) -> Self {
        Self::Invalid(errors)
    }

    /// Returns `true` if this is a valid result.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns `true` if this is an invalid result.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The errors, if invalid.
    #[must_use]
    pub const fn errors(&self) -> Option<&Errors> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    /// The errors as a vector; empty when valid.
    #[must_use]
    pub fn into_errors(self) -> Vec<Error> {
        match self {
            Self::Valid(_) => Vec::new(),
            Self::Invalid(errors) => errors.into_vec(),
        }
    }

    /// Collapses both cases into a single value.
    pub fn fold<R, FI, FV>(self, on_invalid: FI, on_valid: FV) -> R
    where
        FI: FnOnce(Errors) -> R,
        FV: FnOnce(T) -> R,
    {
        match self {
            Self::Valid(value) => on_valid(value),
            Self::Invalid(errors) => on_invalid(errors),
        }
    }

    /// Transforms the valid value.
    #[must_use]
    pub fn map<R, F>(self, function: F) -> Validation<R>
    where
        F: FnOnce(T) -> R,
    {
        self.fold(Validation::Invalid, |value| Validation::Valid(function(value)))
    }

    /// Transforms every error of an invalid result.
    #[must_use]
    pub fn map_errors<F>(self, mut function: F) -> Self
    where
        F: FnMut(Error) -> Error,
    {
        match self {
            Self::Valid(value) => Self::Valid(value),
            Self::Invalid(errors) => Self::Invalid(Errors(
                errors.into_iter().map(&mut function).collect(),
            )),
        }
    }

    /// Fail-fast sequencing: runs `function` only if this result is valid.
    ///
    /// An invalid result is returned unchanged; the continuation is never
    /// evaluated.
    #[must_use]
    pub fn bind<R, F>(self, function: F) -> Validation<R>
    where
        F: FnOnce(T) -> Validation<R>,
    {
        self.fold(Validation::Invalid, function)
    }

    /// Runs a side effect on the valid value and returns `self` unchanged.
    #[must_use]
    pub fn inspect<F>(self, function: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Self::Valid(value) = &self {
            function(value);
        }
        self
    }

    /// Error-harvesting combination of two independent results.
    ///
    /// Both sides are already evaluated; if both are invalid their errors
    /// are concatenated, left first.
    #[must_use]
    pub fn map2<B, R, F>(self, other: Validation<B>, function: F) -> Validation<R>
    where
        F: FnOnce(T, B) -> R,
    {
        match (self, other) {
            (Self::Valid(left), Validation::Valid(right)) => Validation::Valid(function(left, right)),
            (Self::Invalid(left), Validation::Invalid(right)) => {
                Validation::Invalid(left.concat(right))
            }
            (Self::Invalid(errors), Validation::Valid(_))
            | (Self::Valid(_), Validation::Invalid(errors)) => Validation::Invalid(errors),
        }
    }

    /// Error-harvesting combination of three independent results.
    #[must_use]
    pub fn map3<B, C, R, F>(
        self,
        second: Validation<B>,
        third: Validation<C>,
        function: F,
    ) -> Validation<R>
    where
        F: FnOnce(T, B, C) -> R,
    {
        self.map2(second, |a, b| (a, b))
            .map2(third, |(a, b), c| function(a, b, c))
    }

    /// Lossy conversion that drops the errors.
    #[must_use]
    pub fn to_option(self) -> Option<T> {
        self.fold(|_| None, Some)
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `Err(errors)` if this is an invalid result.
    pub fn to_result(self) -> Result<T, Errors> {
        self.fold(Err, Ok)
    }

    /// Converts into an `Either` with the errors on the left.
    #[must_use]
    pub fn to_either(self) -> Either<Errors, T> {
        self.fold(Either::Left, Either::Right)
    }

    /// Runs a fallible step on the valid value, moving the fault outward.
    ///
    /// An invalid result never calls `function` and is wrapped as
    /// `Exceptional::Ok(Invalid(..))`.
    pub fn traverse_exceptional<R, F>(self, function: F) -> Exceptional<Validation<R>>
    where
        F: FnOnce(T) -> Exceptional<R>,
    {
        match self {
            Self::Invalid(errors) => Exceptional::Ok(Validation::Invalid(errors)),
            Self::Valid(value) => function(value).map(Validation::Valid),
        }
    }
}

impl<T> From<Either<Errors, T>> for Validation<T> {
    fn from(either: Either<Errors, T>) -> Self {
        either.fold(Self::Invalid, Self::Valid)
    }
}

impl<T: fmt::Display> fmt::Display for Validation<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => write!(formatter, "Valid({value})"),
            Self::Invalid(errors) => write!(formatter, "Invalid([{errors}])"),
        }
    }
}

// =============================================================================
// Validator
// =============================================================================

type Rule<T> = dyn Fn(&T) -> Validation<()> + Send + Sync;

/// A reusable rule (or combination of rules) that checks a value.
///
/// Checking takes the value by ownership and hands it back inside a
/// `Valid`, so validators never need `T: Clone`.
pub struct Validator<T> {
    rule: Arc<Rule<T>>,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            rule: Arc::clone(&self.rule),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl<T: 'static> Validator<T> {
    /// Creates a validator from a rule over a borrowed value.
    pub fn new<F>(rule: F) -> Self
    where
        F: Fn(&T) -> Validation<()> + Send + Sync + 'static,
    {
        Self {
            rule: Arc::new(rule),
        }
    }

    /// Creates a validator from a predicate and an error builder.
    pub fn predicate<P, E>(predicate: P, error: E) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        E: Fn(&T) -> Error + Send + Sync + 'static,
    {
        Self::new(move |value| {
            if predicate(value) {
                Validation::Valid(())
            } else {
                Validation::invalid(error(value))
            }
        })
    }

    /// A validator that accepts everything.
    #[must_use]
    pub fn accept_all() -> Self {
        Self::new(|_| Validation::Valid(()))
    }

    /// Checks `value`, returning it unchanged when every rule passes.
    pub fn check(&self, value: T) -> Validation<T> {
        self.validate(&value).map(|()| value)
    }

    /// Checks a borrowed value, reporting only the verdict.
    pub fn validate(&self, value: &T) -> Validation<()> {
        (self.rule)(value)
    }

    /// Applies `rules` in order, stopping at the first failing rule.
    ///
    /// With no rules the value is valid.
    pub fn fail_fast<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let rules: Vec<Self> = rules.into_iter().collect();
        Self::new(move |value| {
            rules
                .iter()
                .fold(Validation::Valid(()), |outcome, rule| {
                    outcome.bind(|()| (rule.rule)(value))
                })
        })
    }

    /// Applies every rule to the same value and reports all failures in
    /// rule order.
    ///
    /// With no rules the value is valid.
    pub fn harvest<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let rules: Vec<Self> = rules.into_iter().collect();
        Self::new(move |value| {
            rules
                .iter()
                .fold(Validation::Valid(()), |outcome, rule| {
                    outcome.map2((rule.rule)(value), |(), ()| ())
                })
        })
    }
}

// =============================================================================
// Traversals
// =============================================================================

/// Checks every item with `function`, stopping at the first invalid one.
///
/// Only the first invalid item's errors are reported; items after it are
/// never checked. An empty input is `Valid(vec![])`.
///
/// # Examples
///
/// ```rust
/// use transfold::control::{Error, Validation, traverse_fail_fast};
///
/// let parse = |s: &str| {
///     s.parse::<f64>()
///         .map_or_else(|_| Validation::invalid(Error::new(format!("'{s}' is not a valid number"))), Validation::valid)
/// };
///
/// let result = traverse_fail_fast(["one", "two", "3"], parse);
/// assert_eq!(result.into_errors().len(), 1);
/// ```
pub fn traverse_fail_fast<I, T, R, F>(items: I, mut function: F) -> Validation<Vec<R>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Validation<R>,
{
    let items = items.into_iter();
    let mut outputs = Vec::with_capacity(items.size_hint().0);
    for item in items {
        match function(item) {
            Validation::Valid(output) => outputs.push(output),
            Validation::Invalid(errors) => return Validation::Invalid(errors),
        }
    }
    Validation::Valid(outputs)
}

/// Checks every item with `function` and harvests all failures.
///
/// Errors are concatenated in input order. On full success the outputs are
/// returned in input order. An empty input is `Valid(vec![])`.
pub fn traverse_harvest<I, T, R, F>(items: I, function: F) -> Validation<Vec<R>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Validation<R>,
{
    items
        .into_iter()
        .map(function)
        .fold(Validation::Valid(Vec::new()), |accumulated, next| {
            accumulated.map2(next, |mut outputs, output| {
                outputs.push(output);
                outputs
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn should_be_lower_case() -> Validator<String> {
        Validator::predicate(
            |s: &String| *s == s.to_lowercase(),
            |s| Error::new(format!("{s} should be lower case")),
        )
    }

    fn should_be_of_length(length: usize) -> Validator<String> {
        Validator::predicate(
            move |s: &String| s.chars().count() == length,
            move |s| Error::new(format!("{s} should be of length {length}")),
        )
    }

    #[fixture]
    fn country_code_rules() -> Vec<Validator<String>> {
        vec![should_be_lower_case(), should_be_of_length(2)]
    }

    fn messages<T>(validation: Validation<T>) -> Vec<String> {
        validation
            .into_errors()
            .into_iter()
            .map(|error| error.to_string())
            .collect()
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[rstest]
    fn errors_from_empty_vec_is_none() {
        assert!(Errors::from_vec(Vec::new()).is_none());
    }

    #[rstest]
    fn errors_deserialization_rejects_empty_list() {
        let parsed: Result<Errors, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());
    }

    #[rstest]
    fn errors_display_joins_messages() {
        let errors = Errors::single(Error::new("a")).concat(Errors::single(Error::new("b")));
        assert_eq!(errors.to_string(), "a, b");
    }

    #[rstest]
    fn error_with_code_keeps_code() {
        let error = Error::with_code("INVALID_BIC", "The beneficiary's BIC field is invalid");
        assert_eq!(error.code(), "INVALID_BIC");
        assert_eq!(Error::new("x").code(), DEFAULT_ERROR_CODE);
    }

    // =========================================================================
    // Validator
    // =========================================================================

    #[rstest]
    fn harvest_reports_every_failure_in_rule_order(country_code_rules: Vec<Validator<String>>) {
        let validator = Validator::harvest(country_code_rules);

        assert_eq!(
            messages(validator.check("USA".to_string())),
            vec!["USA should be lower case", "USA should be of length 2"]
        );
    }

    #[rstest]
    fn fail_fast_reports_first_failure_only(country_code_rules: Vec<Validator<String>>) {
        let validator = Validator::fail_fast(country_code_rules);

        assert_eq!(
            messages(validator.check("USA".to_string())),
            vec!["USA should be lower case"]
        );
    }

    #[rstest]
    #[case("us", 0)]
    #[case("US", 1)]
    #[case("usa", 1)]
    #[case("USA", 2)]
    fn harvest_country_codes(
        country_code_rules: Vec<Validator<String>>,
        #[case] input: &str,
        #[case] expected_errors: usize,
    ) {
        let outcome = Validator::harvest(country_code_rules).check(input.to_string());
        assert_eq!(outcome.into_errors().len(), expected_errors);
    }

    #[rstest]
    fn empty_rule_sets_accept() {
        let value = "anything".to_string();
        assert!(Validator::harvest(Vec::new()).check(value.clone()).is_valid());
        assert!(Validator::fail_fast(Vec::new()).check(value).is_valid());
    }

    #[rstest]
    fn fail_fast_does_not_evaluate_later_rules() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let evaluated = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evaluated);
        let counting = Validator::new(move |_: &i32| {
            counter.fetch_add(1, Ordering::SeqCst);
            Validation::Valid(())
        });
        let failing = Validator::new(|_: &i32| Validation::invalid(Error::new("Invalid")));

        let outcome = Validator::fail_fast([failing, counting]).check(1);

        assert!(outcome.is_invalid());
        assert_eq!(evaluated.load(Ordering::SeqCst), 0);
    }

    // =========================================================================
    // Validation combinators
    // =========================================================================

    #[rstest]
    fn map3_accumulates_all_errors() {
        let a: Validation<i32> = Validation::invalid(Error::new("a"));
        let b: Validation<i32> = Validation::valid(1);
        let c: Validation<i32> = Validation::invalid(Error::new("c"));

        assert_eq!(messages(a.map3(b, c, |x, y, z| x + y + z)), vec!["a", "c"]);
    }

    #[rstest]
    fn map_errors_rewrites_each_error() {
        let invalid: Validation<i32> = Validation::invalid(Error::new("x"));
        let prefixed = invalid.map_errors(|error| Error::new(format!("field: {error}")));
        assert_eq!(messages(prefixed), vec!["field: x"]);
    }

    #[rstest]
    fn traverse_exceptional_skips_function_when_invalid() {
        let invalid: Validation<i32> = Validation::invalid(Error::new("bad"));
        let result = invalid.traverse_exceptional(|_| -> Exceptional<i32> {
            unreachable!("must not run")
        });
        assert!(matches!(result, Exceptional::Ok(Validation::Invalid(_))));
    }

    #[rstest]
    fn display_lists_errors() {
        let invalid: Validation<i32> = Validation::invalid(Error::new("x"));
        assert_eq!(invalid.to_string(), "Invalid([x])");
        assert_eq!(Validation::valid(3).to_string(), "Valid(3)");
    }

    // =========================================================================
    // Traversals
    // =========================================================================

    fn parse_number(input: &str) -> Validation<f64> {
        input.trim().parse::<f64>().map_or_else(
            |_| Validation::invalid(Error::new(format!("'{}' is not a valid number", input.trim()))),
            Validation::valid,
        )
    }

    #[rstest]
    fn traverse_harvest_reports_all_invalid_items() {
        let result = traverse_harvest("one, two, 3".split(','), parse_number);
        assert_eq!(
            messages(result),
            vec!["'one' is not a valid number", "'two' is not a valid number"]
        );
    }

    #[rstest]
    fn traverse_fail_fast_reports_first_invalid_item() {
        let result = traverse_fail_fast("one, two, 3".split(','), parse_number);
        assert_eq!(messages(result), vec!["'one' is not a valid number"]);
    }

    #[rstest]
    fn traversals_preserve_order_on_success() {
        let expected = Validation::valid(vec![1.0, 2.0, 3.0]);
        assert_eq!(traverse_harvest("1, 2, 3".split(','), parse_number), expected);
        assert_eq!(traverse_fail_fast("1, 2, 3".split(','), parse_number), expected);
    }

    #[rstest]
    fn traversals_of_empty_input_are_valid_and_empty() {
        let empty: Vec<&str> = Vec::new();
        assert_eq!(
            traverse_harvest(empty.clone(), parse_number),
            Validation::valid(Vec::new())
        );
        assert_eq!(
            traverse_fail_fast(empty, parse_number),
            Validation::valid(Vec::new())
        );
    }
}
