//! Validation rule engine for manifest field values.
//!
//! Every function here is pure: the same value and constraint set always
//! produce the same [`ValidationOutcome`]. Checks run in a fixed order
//! (blank, length, pattern, enum, then response status) and the first
//! failure wins, so "too long" is reported ahead of "bad pattern".

use crate::constraints::ConstraintSet;
use crate::field::FieldValue;
use std::fmt;

/// A status line returned by a server for a URL-typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatus {
    code: u16,
    reason: Option<String>,
}

impl HttpStatus {
    /// Create a status from its numeric code and optional reason phrase.
    #[must_use]
    pub fn new(code: u16, reason: Option<String>) -> Self {
        Self { code, reason }
    }

    /// The numeric status code.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Whether the code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{} {reason}", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

/// An already-obtained response signal for a URL-typed field.
///
/// The engine never performs requests; callers request the URL and hand the
/// result over for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSignal {
    /// The server answered with this status.
    Status(HttpStatus),
    /// No response was received (connection failure, DNS error, timeout).
    NoResponse,
}

/// Result of validating one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The value satisfies every constraint.
    Success,

    /// The value is empty and the field does not accept blank input.
    Blank {
        /// Field label, when the schema provides one.
        label: Option<String>,
    },

    /// A length bound or the item-count bound was violated.
    InvalidLength {
        /// Lower bound in force, if any.
        min: Option<usize>,
        /// Upper bound in force, if any.
        max: Option<usize>,
        /// Offending list items; `None` for scalars and item-count failures.
        items: Option<Vec<String>>,
    },

    /// The value (or some list items) did not match the pattern.
    InvalidPattern {
        /// Pattern source text that must be matched.
        pattern: String,
        /// Offending list items; `None` for scalars.
        items: Option<Vec<String>>,
    },

    /// The value is not a member of the permitted set.
    InvalidEnum {
        /// Field label, when the schema provides one.
        label: Option<String>,
        /// Permitted values in schema order.
        permitted: Vec<String>,
    },

    /// The URL did not produce a successful response.
    UnsuccessfulResponse {
        /// The status received, or `None` when nothing came back.
        status: Option<HttpStatus>,
    },
}

impl ValidationOutcome {
    /// Whether this outcome lets the value be committed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Validate `value` against `constraints`.
///
/// List values are checked item-wise: the item count against `max_items`,
/// then every item against the length bounds, the pattern and the enum.
/// Every offending item is collected, not only the first.
///
/// # Examples
///
/// ```
/// use wingman_common::{ConstraintSet, FieldValue, ValidationOutcome, validate};
///
/// let constraints = ConstraintSet::new().with_min_length(3).with_max_length(10);
/// let outcome = validate(&FieldValue::Single("ab".into()), &constraints);
/// assert_eq!(
///     outcome,
///     ValidationOutcome::InvalidLength { min: Some(3), max: Some(10), items: None }
/// );
/// ```
#[must_use]
pub fn validate(value: &FieldValue, constraints: &ConstraintSet) -> ValidationOutcome {
    if value.is_empty() {
        return if constraints.blank_allowed() {
            ValidationOutcome::Success
        } else {
            ValidationOutcome::Blank {
                label: constraints.label().map(str::to_owned),
            }
        };
    }

    let is_list = matches!(value, FieldValue::List(_));
    let items = value.items();

    if let Some(outcome) = check_item_count(&items, constraints) {
        return outcome;
    }
    if let Some(outcome) = check_lengths(&items, constraints, is_list) {
        return outcome;
    }
    if let Some(outcome) = check_pattern(&items, constraints, is_list) {
        return outcome;
    }
    if let Some(outcome) = check_enum(&items, constraints) {
        return outcome;
    }
    ValidationOutcome::Success
}

/// Classify an externally obtained response signal.
#[must_use]
pub fn classify_response(signal: &ResponseSignal) -> ValidationOutcome {
    match signal {
        ResponseSignal::Status(status) if status.is_success() => ValidationOutcome::Success,
        ResponseSignal::Status(status) => ValidationOutcome::UnsuccessfulResponse {
            status: Some(status.clone()),
        },
        ResponseSignal::NoResponse => ValidationOutcome::UnsuccessfulResponse { status: None },
    }
}

/// Validate `value`, then classify `signal` if every other check passed.
///
/// The signal is produced lazily so callers only touch the network for
/// values that are otherwise acceptable.
pub fn validate_with_response<F>(
    value: &FieldValue,
    constraints: &ConstraintSet,
    signal: F,
) -> ValidationOutcome
where
    F: FnOnce() -> ResponseSignal,
{
    match validate(value, constraints) {
        ValidationOutcome::Success => classify_response(&signal()),
        failure => failure,
    }
}

fn check_item_count(items: &[&str], constraints: &ConstraintSet) -> Option<ValidationOutcome> {
    let max = constraints.max_items()?;
    (items.len() > max).then_some(ValidationOutcome::InvalidLength {
        min: None,
        max: Some(max),
        items: None,
    })
}

fn check_lengths(
    items: &[&str],
    constraints: &ConstraintSet,
    is_list: bool,
) -> Option<ValidationOutcome> {
    let min = constraints.min_length();
    let max = constraints.max_length();
    if min.is_none() && max.is_none() {
        return None;
    }
    let offending = collect(items, |item| {
        let length = item.chars().count();
        min.is_some_and(|min| length < min) || max.is_some_and(|max| length > max)
    });
    (!offending.is_empty()).then(|| ValidationOutcome::InvalidLength {
        min,
        max,
        items: is_list.then_some(offending),
    })
}

fn check_pattern(
    items: &[&str],
    constraints: &ConstraintSet,
    is_list: bool,
) -> Option<ValidationOutcome> {
    let pattern = constraints.pattern()?;
    let offending = collect(items, |item| !pattern.is_full_match(item));
    (!offending.is_empty()).then(|| ValidationOutcome::InvalidPattern {
        pattern: pattern.as_str().to_owned(),
        items: is_list.then_some(offending),
    })
}

fn check_enum(items: &[&str], constraints: &ConstraintSet) -> Option<ValidationOutcome> {
    let permitted = constraints.enum_values()?;
    let all_members = items
        .iter()
        .all(|item| permitted.iter().any(|member| member == item));
    (!all_members).then(|| ValidationOutcome::InvalidEnum {
        label: constraints.label().map(str::to_owned),
        permitted: permitted.to_vec(),
    })
}

fn collect(items: &[&str], mut offends: impl FnMut(&str) -> bool) -> Vec<String> {
    items
        .iter()
        .copied()
        .filter(|item| offends(item))
        .map(str::to_owned)
        .collect()
}
