//! Field values and the parsing of raw terminal input into them.

use std::fmt;

/// How a field's raw input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single free-text value.
    Scalar,
    /// A comma-separated list of values.
    List,
    /// A URL whose server response is checked after validation.
    Url,
    /// A path to a local file whose digest becomes the committed value.
    File,
    /// A single value drawn from the schema's enum.
    Enum,
}

impl FieldKind {
    /// Whether raw input is split into list items.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::List)
    }
}

/// A parsed or committed field value.
///
/// # Examples
///
/// ```
/// use wingman_common::{FieldKind, FieldValue};
///
/// let value = FieldValue::parse(" http, ftp ,http ", FieldKind::List, true);
/// assert_eq!(value, FieldValue::List(vec!["http".into(), "ftp".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single string.
    Single(String),
    /// An ordered list of strings.
    List(Vec<String>),
    /// A lowercase hexadecimal digest computed from a file.
    Hash(String),
}

impl FieldValue {
    /// Parse one line of raw input for a field of the given kind.
    ///
    /// Surrounding whitespace is trimmed. List input is split on commas,
    /// each item is trimmed, empty items are dropped, and duplicates are
    /// removed (keeping the first occurrence) when `unique_items` is set.
    #[must_use]
    pub fn parse(raw: &str, kind: FieldKind, unique_items: bool) -> Self {
        let trimmed = raw.trim();
        if !kind.is_list() {
            return Self::Single(trimmed.to_owned());
        }
        let mut items: Vec<String> = Vec::new();
        for item in trimmed.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if unique_items && items.iter().any(|seen| seen == item) {
                continue;
            }
            items.push(item.to_owned());
        }
        Self::List(items)
    }

    /// Whether the value carries no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) | Self::Hash(value) => value.trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// The value's items: one for scalars, all of them for lists.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Single(value) | Self::Hash(value) => vec![value.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Render the value the way it is shown as a prompt default.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Single(value) | Self::Hash(value) => value.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::scalar_trimmed("  hello  ", FieldKind::Scalar, "hello")]
    #[case::url_trimmed("\thttps://example.test\n", FieldKind::Url, "https://example.test")]
    #[case::commas_kept_for_scalars("a, b", FieldKind::Scalar, "a, b")]
    fn non_list_kinds_parse_to_single(
        #[case] raw: &str,
        #[case] kind: FieldKind,
        #[case] expected: &str,
    ) {
        assert_eq!(
            FieldValue::parse(raw, kind, false),
            FieldValue::Single(expected.to_owned())
        );
    }

    #[test]
    fn list_keeps_duplicates_without_unique_items() {
        let value = FieldValue::parse("a,b,a", FieldKind::List, false);
        assert_eq!(value.items(), vec!["a", "b", "a"]);
    }

    #[test]
    fn list_dedupes_preserving_first_occurrence() {
        let value = FieldValue::parse("b, a, b, c, a", FieldKind::List, true);
        assert_eq!(value.items(), vec!["b", "a", "c"]);
    }

    #[test]
    fn blank_list_input_is_empty() {
        let value = FieldValue::parse(" , ,", FieldKind::List, true);
        assert!(value.is_empty());
    }

    #[test]
    fn display_joins_list_items() {
        let value = FieldValue::List(vec!["http".to_owned(), "https".to_owned()]);
        assert_eq!(value.to_string(), "http, https");
    }
}
