//! Human-readable diagnostics for failed validations.
//!
//! Every message starts with [`ERROR_MARKER`] so callers can detect or
//! filter validation errors in captured output. Multi-item failures append
//! an itemised block, one offending item per line.

use crate::validation::{HttpStatus, ValidationOutcome};
use std::fmt::{self, Write as _};

/// Literal prefix shared by every validation diagnostic.
pub const ERROR_MARKER: &str = "[Error]";

const FALLBACK_BLANK_LABEL: &str = "Input";
const FALLBACK_ENUM_LABEL: &str = "Enum";

/// Render `outcome` as the standard diagnostic string.
///
/// [`ValidationOutcome::Success`] renders as an empty string.
///
/// # Examples
///
/// ```
/// use wingman_common::{ValidationOutcome, format_outcome};
///
/// let outcome = ValidationOutcome::InvalidLength { min: Some(3), max: Some(10), items: None };
/// assert_eq!(
///     format_outcome(&outcome),
///     "[Error] Invalid Length -length must be between 3 and 10"
/// );
/// ```
#[must_use]
pub fn format_outcome(outcome: &ValidationOutcome) -> String {
    match outcome {
        ValidationOutcome::Success => String::new(),
        ValidationOutcome::Blank { label } => blank_input(label.as_deref()),
        ValidationOutcome::InvalidLength { min, max, items } => {
            invalid_length(*min, *max, items.as_deref())
        }
        ValidationOutcome::InvalidPattern { pattern, items } => {
            invalid_pattern(pattern, items.as_deref())
        }
        ValidationOutcome::InvalidEnum { label, permitted } => {
            invalid_enum(label.as_deref(), permitted)
        }
        ValidationOutcome::UnsuccessfulResponse { status } => {
            unsuccessful_response(status.as_ref())
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_outcome(self))
    }
}

fn blank_input(label: Option<&str>) -> String {
    format!(
        "{ERROR_MARKER} {} cannot be blank",
        label.unwrap_or(FALLBACK_BLANK_LABEL)
    )
}

fn invalid_length(min: Option<usize>, max: Option<usize>, items: Option<&[String]>) -> String {
    let mut message = format!("{ERROR_MARKER} Invalid Length");
    let bound = match (min, max) {
        (Some(min), Some(max)) => Some(format!("between {min} and {max}")),
        (Some(min), None) => Some(format!("greater than {min}")),
        (None, Some(max)) => Some(format!("less than {max}")),
        (None, None) => None,
    };
    if let Some(bound) = bound {
        let subject = if items.is_some() {
            "Item Length"
        } else {
            "length"
        };
        let _ = write!(message, " -{subject} must be {bound}");
    }
    append_items(&mut message, items);
    message
}

fn invalid_pattern(pattern: &str, items: Option<&[String]>) -> String {
    let mut message = format!("{ERROR_MARKER} Invalid Pattern - Must match regex: {pattern}");
    append_items(&mut message, items);
    message
}

fn invalid_enum(label: Option<&str>, permitted: &[String]) -> String {
    format!(
        "{ERROR_MARKER} Invalid {} - Value must exist in the enum - {}",
        label.unwrap_or(FALLBACK_ENUM_LABEL),
        permitted.join(", ")
    )
}

fn unsuccessful_response(status: Option<&HttpStatus>) -> String {
    let detail = status.map_or_else(
        || "did not return a successful response".to_owned(),
        |status| format!("responded with {status}"),
    );
    format!("{ERROR_MARKER} Unsuccessful Response Code - The server {detail}")
}

fn append_items(message: &mut String, items: Option<&[String]>) {
    let Some(items) = items else {
        return;
    };
    message.push_str("\nItems that did not match:");
    for item in items {
        let _ = write!(message, "\n - {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::both(Some(3), Some(10), "[Error] Invalid Length -length must be between 3 and 10")]
    #[case::min_only(Some(3), None, "[Error] Invalid Length -length must be greater than 3")]
    #[case::max_only(None, Some(64), "[Error] Invalid Length -length must be less than 64")]
    #[case::unbounded(None, None, "[Error] Invalid Length")]
    fn length_message_names_bounds(
        #[case] min: Option<usize>,
        #[case] max: Option<usize>,
        #[case] expected: &str,
    ) {
        let outcome = ValidationOutcome::InvalidLength {
            min,
            max,
            items: None,
        };
        assert_eq!(format_outcome(&outcome), expected);
    }

    #[test]
    fn length_message_itemises_offenders() {
        let outcome = ValidationOutcome::InvalidLength {
            min: None,
            max: Some(5),
            items: Some(vec!["toolong".to_owned(), "waytoolong".to_owned()]),
        };
        assert_eq!(
            format_outcome(&outcome),
            concat!(
                "[Error] Invalid Length -Item Length must be less than 5\n",
                "Items that did not match:\n",
                " - toolong\n",
                " - waytoolong"
            )
        );
    }

    #[test]
    fn pattern_message_quotes_regex_and_items() {
        let outcome = ValidationOutcome::InvalidPattern {
            pattern: "[a-z]+".to_owned(),
            items: Some(vec!["ABC".to_owned()]),
        };
        assert_eq!(
            format_outcome(&outcome),
            "[Error] Invalid Pattern - Must match regex: [a-z]+\nItems that did not match:\n - ABC"
        );
    }

    #[rstest]
    #[case::labelled(Some("Short Description"), "[Error] Short Description cannot be blank")]
    #[case::unlabelled(None, "[Error] Input cannot be blank")]
    fn blank_message_names_field(#[case] label: Option<&str>, #[case] expected: &str) {
        let outcome = ValidationOutcome::Blank {
            label: label.map(str::to_owned),
        };
        assert_eq!(format_outcome(&outcome), expected);
    }

    #[test]
    fn enum_message_lists_members_in_order() {
        let outcome = ValidationOutcome::InvalidEnum {
            label: Some("Architecture".to_owned()),
            permitted: vec!["x86".to_owned(), "x64".to_owned(), "arm64".to_owned()],
        };
        assert_eq!(
            format_outcome(&outcome),
            "[Error] Invalid Architecture - Value must exist in the enum - x86, x64, arm64"
        );
    }

    #[test]
    fn response_message_reports_status() {
        let outcome = ValidationOutcome::UnsuccessfulResponse {
            status: Some(HttpStatus::new(404, Some("Not Found".to_owned()))),
        };
        assert_eq!(
            format_outcome(&outcome),
            "[Error] Unsuccessful Response Code - The server responded with 404 Not Found"
        );
    }

    #[test]
    fn response_message_without_response() {
        let outcome = ValidationOutcome::UnsuccessfulResponse { status: None };
        assert_eq!(
            format_outcome(&outcome),
            "[Error] Unsuccessful Response Code - The server did not return a successful response"
        );
    }

    #[test]
    fn success_renders_empty() {
        assert!(format_outcome(&ValidationOutcome::Success).is_empty());
    }

    #[test]
    fn display_matches_format() {
        let outcome = ValidationOutcome::Blank { label: None };
        assert_eq!(outcome.to_string(), format_outcome(&outcome));
    }
}
