//! Session-wide manifest state.
//!
//! One [`ManifestState`] lives for a whole interactive session. Only the
//! active prompt loop writes to it, and only through [`ManifestState::commit`]
//! or a per-field setter, so every stored value is one that passed
//! validation. The state serialises to a flat JSON object keyed by field
//! name, which is also the format previous-value files are read in.

use crate::schema::Field;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wingman_common::FieldValue;

/// A committed value as stored and serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// A scalar, enum member, URL or digest.
    Text(String),
    /// An ordered list.
    List(Vec<String>),
}

impl StoredValue {
    fn into_field_value(self, field: Field) -> FieldValue {
        match self {
            Self::Text(text) if field.is_digest() => FieldValue::Hash(text),
            Self::Text(text) => FieldValue::Single(text),
            Self::List(items) => FieldValue::List(items),
        }
    }
}

impl From<FieldValue> for StoredValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Single(text) | FieldValue::Hash(text) => Self::Text(text),
            FieldValue::List(items) => Self::List(items),
        }
    }
}

/// Committed field values for one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestState {
    values: BTreeMap<Field, StoredValue>,
}

/// Errors raised while reading or writing a state file.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The state file could not be read or written.
    #[error("failed to access state file {path}: {source}")]
    Io {
        /// Path of the state file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The state file is not a JSON object of field values.
    #[error("invalid state file {path}: {source}")]
    Json {
        /// Path of the state file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ManifestState {
    /// Store `value` for `field`, replacing any earlier value.
    ///
    /// Empty values (an optional field left blank) remove the field, so a
    /// skipped field is absent rather than stored as an empty string.
    pub fn commit(&mut self, field: Field, value: FieldValue) {
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, StoredValue::from(value));
        }
    }

    /// The committed value of `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        self.values
            .get(&field)
            .cloned()
            .map(|stored| stored.into_field_value(field))
    }

    /// The committed text of a scalar `field`.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.values.get(&field)? {
            StoredValue::Text(text) => Some(text),
            StoredValue::List(_) => None,
        }
    }

    /// Whether `field` has a committed value.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Number of committed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been committed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Package identifier, once acquired.
    #[must_use]
    pub fn package_identifier(&self) -> Option<&str> {
        self.text(Field::PackageIdentifier)
    }

    /// Package version, once acquired.
    #[must_use]
    pub fn package_version(&self) -> Option<&str> {
        self.text(Field::PackageVersion)
    }

    /// Default locale, once acquired.
    #[must_use]
    pub fn package_locale(&self) -> Option<&str> {
        self.text(Field::PackageLocale)
    }

    /// Installer protocols, once acquired.
    #[must_use]
    pub fn protocols(&self) -> Option<&[String]> {
        match self.values.get(&Field::Protocols)? {
            StoredValue::List(items) => Some(items),
            StoredValue::Text(_) => None,
        }
    }

    /// Set the installer protocols.
    pub fn set_protocols(&mut self, protocols: Vec<String>) {
        self.commit(Field::Protocols, FieldValue::List(protocols));
    }

    /// Set the short description.
    pub fn set_short_description(&mut self, description: impl Into<String>) {
        self.commit(Field::ShortDescription, FieldValue::Single(description.into()));
    }

    /// Set the full description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.commit(Field::Description, FieldValue::Single(description.into()));
    }

    /// Set the installer digest.
    pub fn set_installer_sha256(&mut self, digest: impl Into<String>) {
        self.commit(Field::InstallerSha256, FieldValue::Hash(digest.into()));
    }

    /// Set the package signature digest.
    pub fn set_signature_sha256(&mut self, digest: impl Into<String>) {
        self.commit(Field::SignatureSha256, FieldValue::Hash(digest.into()));
    }

    /// Render the state as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse state from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not an object of field values.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read state from the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the file cannot be read or parsed.
    pub fn read_from(path: &Utf8Path) -> Result<Self, StateError> {
        let text = std::fs::read_to_string(path).map_err(|source| StateError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| StateError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Write state as JSON to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if serialisation or the write fails.
    pub fn write_to(&self, path: &Utf8Path) -> Result<(), StateError> {
        let json = self.to_json().map_err(|source| StateError::Json {
            path: path.to_owned(),
            source,
        })?;
        std::fs::write(path, json + "\n").map_err(|source| StateError::Io {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn state() -> ManifestState {
        let mut state = ManifestState::default();
        state.commit(
            Field::PackageIdentifier,
            FieldValue::Single("Contoso.App".to_owned()),
        );
        state.set_protocols(vec!["contoso".to_owned(), "ms-contoso".to_owned()]);
        state
    }

    #[rstest]
    fn commit_replaces_previous_value(mut state: ManifestState) {
        state.commit(
            Field::PackageIdentifier,
            FieldValue::Single("Contoso.Other".to_owned()),
        );

        assert_eq!(state.package_identifier(), Some("Contoso.Other"));
    }

    #[rstest]
    fn empty_commit_removes_the_field(mut state: ManifestState) {
        state.commit(Field::Protocols, FieldValue::List(Vec::new()));

        assert!(!state.contains(Field::Protocols));
        assert_eq!(state.len(), 1);
    }

    #[rstest]
    fn digests_come_back_as_hash_values() {
        let mut state = ManifestState::default();
        state.set_installer_sha256("ab".repeat(32));

        assert_eq!(
            state.get(Field::InstallerSha256),
            Some(FieldValue::Hash("ab".repeat(32)))
        );
    }

    #[rstest]
    fn serialises_as_flat_object(state: ManifestState) {
        let json = state.to_json().expect("serialise state");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(
            parsed,
            serde_json::json!({
                "PackageIdentifier": "Contoso.App",
                "Protocols": ["contoso", "ms-contoso"],
            })
        );
    }

    #[rstest]
    fn file_round_trip_preserves_values(state: ManifestState) {
        let dir = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("state.json")).expect("utf-8 path");

        state.write_to(&path).expect("write state");
        let restored = ManifestState::read_from(&path).expect("read state");

        assert_eq!(restored, state);
    }

    #[rstest]
    fn rejects_unknown_field_names() {
        let outcome = ManifestState::from_json(r#"{"NotAField": "x"}"#);

        assert!(outcome.is_err());
    }
}
