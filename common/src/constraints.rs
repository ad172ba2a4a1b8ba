//! Per-field constraint sets derived from the manifest schema.
//!
//! A [`ConstraintSet`] is immutable once built. The schema layer constructs
//! one per field with the consuming builder methods and hands out shared
//! references; the validation engine only ever reads it.

use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Errors raised while building a [`ConstraintSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The supplied pattern is not a valid regular expression.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The rejected pattern source.
        pattern: String,
        /// The regex compiler's explanation.
        reason: String,
    },

    /// `min_length` exceeds `max_length`.
    #[error("minimum length {min} exceeds maximum length {max}")]
    InvertedBounds {
        /// Configured lower bound.
        min: usize,
        /// Configured upper bound.
        max: usize,
    },
}

/// A compiled pattern that must match a whole value.
///
/// The source text is kept verbatim for diagnostics; matching uses an
/// anchored copy so that partial matches never pass.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    /// Compile `source` into a full-match pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvalidPattern`] when `source` does not
    /// compile.
    pub fn new(source: &str) -> Result<Self, ConstraintError> {
        let anchored = Regex::new(&format!("^(?:{source})$")).map_err(|err| {
            ConstraintError::InvalidPattern {
                pattern: source.to_owned(),
                reason: err.to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_owned(),
            anchored,
        })
    }

    /// The pattern as supplied by the schema.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `value` matches the pattern in full.
    #[must_use]
    pub fn is_full_match(&self, value: &str) -> bool {
        self.anchored.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

/// Schema-derived bounds for a single manifest field.
///
/// # Examples
///
/// ```
/// use wingman_common::ConstraintSet;
///
/// let constraints = ConstraintSet::new()
///     .with_min_length(3)
///     .with_max_length(10)
///     .try_with_pattern("[a-z]+")
///     .expect("valid regex");
///
/// assert_eq!(constraints.min_length(), Some(3));
/// assert_eq!(constraints.pattern().map(|p| p.as_str()), Some("[a-z]+"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    label: Option<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    max_items: Option<usize>,
    pattern: Option<Pattern>,
    blank_allowed: bool,
    unique_items: bool,
    enum_values: Option<Vec<String>>,
}

impl ConstraintSet {
    /// An unconstrained set that rejects blank input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the field in diagnostics such as "Protocols cannot be blank".
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Require at least `min` characters (per item for lists).
    #[must_use]
    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Allow at most `max` characters (per item for lists).
    #[must_use]
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Allow at most `max` items in a list value.
    #[must_use]
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Require every value to match `source` in full.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvalidPattern`] if `source` does not
    /// compile.
    pub fn try_with_pattern(mut self, source: &str) -> Result<Self, ConstraintError> {
        self.pattern = Some(Pattern::new(source)?);
        Ok(self)
    }

    /// Accept blank input as a successful, empty value.
    #[must_use]
    pub fn allow_blank(mut self) -> Self {
        self.blank_allowed = true;
        self
    }

    /// Deduplicate list items when parsing input.
    #[must_use]
    pub fn with_unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    /// Restrict values to the given members, compared case-sensitively.
    #[must_use]
    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Check that the length bounds are coherent.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvertedBounds`] when the minimum length is
    /// greater than the maximum.
    pub fn validated(self) -> Result<Self, ConstraintError> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min > max => {
                Err(ConstraintError::InvertedBounds { min, max })
            }
            _ => Ok(self),
        }
    }

    /// Field label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Minimum character count.
    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum character count.
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Maximum number of list items.
    #[must_use]
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// Full-match pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Whether blank input is accepted.
    #[must_use]
    pub fn blank_allowed(&self) -> bool {
        self.blank_allowed
    }

    /// Whether list items are deduplicated.
    #[must_use]
    pub fn unique_items(&self) -> bool {
        self.unique_items
    }

    /// Permitted values, in schema order.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact("abc", true)]
    #[case::prefix_only("abcd", false)]
    #[case::suffix_only("xabc", false)]
    fn pattern_matches_whole_value(#[case] value: &str, #[case] expected: bool) {
        let pattern = Pattern::new("abc").expect("valid regex");
        assert_eq!(pattern.is_full_match(value), expected);
    }

    #[test]
    fn alternation_is_anchored_as_a_group() {
        let pattern = Pattern::new("a|b").expect("valid regex");
        assert!(pattern.is_full_match("a"));
        assert!(!pattern.is_full_match("ab"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let result = ConstraintSet::new().try_with_pattern("(unclosed");
        assert!(matches!(
            result,
            Err(ConstraintError::InvalidPattern { ref pattern, .. }) if pattern == "(unclosed"
        ));
    }

    #[test]
    fn pattern_displays_source_text() {
        let pattern = Pattern::new(r"^\d+$").expect("valid regex");
        assert_eq!(pattern.to_string(), r"^\d+$");
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = ConstraintSet::new()
            .with_min_length(10)
            .with_max_length(3)
            .validated();
        assert_eq!(
            result,
            Err(ConstraintError::InvertedBounds { min: 10, max: 3 })
        );
    }

    #[test]
    fn enum_values_keep_schema_order() {
        let constraints = ConstraintSet::new().with_enum_values(["x64", "x86", "arm64"]);
        assert_eq!(
            constraints.enum_values(),
            Some(["x64", "x86", "arm64"].map(String::from).as_slice())
        );
    }

    #[test]
    fn defaults_reject_blank() {
        let constraints = ConstraintSet::new();
        assert!(!constraints.blank_allowed());
        assert!(!constraints.unique_items());
        assert!(constraints.label().is_none());
    }
}
