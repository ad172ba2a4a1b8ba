//! Field schemas: the read-only constraint source consumed by the prompt
//! loop.
//!
//! [`BuiltinSchema::winget`] carries the constraints of the public package
//! manifest format. Other sources can be injected through
//! [`ConstraintSource`].

use serde::{Deserialize, Serialize};
use std::fmt;
use wingman::DigestAlgorithm;
use wingman_common::{ConstraintError, ConstraintSet, FieldKind};

/// Every field the acquisition core knows how to prompt for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Field {
    /// Dotted package identifier, e.g. `Publisher.App`.
    PackageIdentifier,
    /// Package version string.
    PackageVersion,
    /// BCP 47 locale of the default locale manifest.
    PackageLocale,
    /// Publisher display name.
    Publisher,
    /// Package display name.
    PackageName,
    /// License name or expression.
    License,
    /// One-line package description.
    ShortDescription,
    /// Full package description.
    Description,
    /// URL protocols the installer registers.
    Protocols,
    /// Download URL of the installer.
    InstallerUrl,
    /// SHA-256 of the installer file.
    InstallerSha256,
    /// SHA-256 of an MSIX/APPX package signature.
    SignatureSha256,
    /// Installer technology.
    InstallerType,
    /// Processor architecture the installer targets.
    Architecture,
}

impl Field {
    /// Fields in the order an interactive session asks for them.
    ///
    /// [`Field::SignatureSha256`] is absent: it is derived from the installer
    /// file rather than typed in.
    pub const PROMPTED: [Self; 13] = [
        Self::PackageIdentifier,
        Self::PackageVersion,
        Self::PackageLocale,
        Self::Publisher,
        Self::PackageName,
        Self::License,
        Self::ShortDescription,
        Self::Description,
        Self::InstallerUrl,
        Self::InstallerSha256,
        Self::InstallerType,
        Self::Architecture,
        Self::Protocols,
    ];

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PackageIdentifier => "Package Identifier",
            Self::PackageVersion => "Package Version",
            Self::PackageLocale => "Package Locale",
            Self::Publisher => "Publisher",
            Self::PackageName => "Package Name",
            Self::License => "License",
            Self::ShortDescription => "Short Description",
            Self::Description => "Description",
            Self::Protocols => "Protocols",
            Self::InstallerUrl => "Installer Url",
            Self::InstallerSha256 => "Installer Sha256",
            Self::SignatureSha256 => "Signature Sha256",
            Self::InstallerType => "Installer Type",
            Self::Architecture => "Architecture",
        }
    }

    /// Whether the field holds a computed digest.
    #[must_use]
    pub const fn is_digest(self) -> bool {
        matches!(self, Self::InstallerSha256 | Self::SignatureSha256)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Prompt metadata and constraints for one field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSchema {
    field: Field,
    description: String,
    kind: FieldKind,
    constraints: ConstraintSet,
}

impl FieldSchema {
    /// Describe `field` with prompt `description`, parse `kind` and
    /// `constraints`.
    ///
    /// The constraint label defaults to [`Field::label`] when unset.
    #[must_use]
    pub fn new(
        field: Field,
        description: impl Into<String>,
        kind: FieldKind,
        constraints: ConstraintSet,
    ) -> Self {
        let constraints = if constraints.label().is_none() {
            constraints.with_label(field.label())
        } else {
            constraints
        };
        Self {
            field,
            description: description.into(),
            kind,
            constraints,
        }
    }

    /// Field described by this schema.
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Prompt description, e.g. "Enter the package version".
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// How raw input is parsed and post-processed.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Validation constraints.
    #[must_use]
    pub const fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Whether a blank answer is rejected.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.constraints.blank_allowed()
    }

    /// Check the constraints for coherence.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvertedBounds`] when the length range is
    /// empty.
    pub fn validated(self) -> Result<Self, ConstraintError> {
        Ok(Self {
            constraints: self.constraints.validated()?,
            ..self
        })
    }
}

/// Read-only lookup of field schemas.
pub trait ConstraintSource {
    /// Schema for `field`, if this source defines one.
    fn schema_for(&self, field: Field) -> Option<&FieldSchema>;
}

/// Package identifier segments: 1 to 32 characters without dots,
/// whitespace, or path-hostile characters; two to eight segments.
pub const IDENTIFIER_PATTERN: &str = r#"[^.\s\\/:*?"<>|\x01-\x1f]{1,32}(\.[^.\s\\/:*?"<>|\x01-\x1f]{1,32}){1,7}"#;

/// Package version: no path-hostile characters.
pub const VERSION_PATTERN: &str = r#"[^\\/:*?"<>|\x01-\x1f]+"#;

/// BCP 47 style locale tag.
pub const LOCALE_PATTERN: &str = r"([a-zA-Z]{2,3}|[iI]-[a-zA-Z]+|[xX]-[a-zA-Z]{1,8})(-[a-zA-Z]{1,8})*";

/// HTTP or HTTPS URL.
pub const URL_PATTERN: &str = r"[Hh][Tt][Tt][Pp][Ss]?://.+";

/// 64-character hexadecimal SHA-256 digest.
pub const SHA256_PATTERN: &str = "[A-Fa-f0-9]{64}";

/// 128-character hexadecimal SHA-512 digest.
pub const SHA512_PATTERN: &str = "[A-Fa-f0-9]{128}";

/// Pattern a hex digest produced by `algorithm` must match.
#[must_use]
pub const fn digest_pattern(algorithm: DigestAlgorithm) -> &'static str {
    match algorithm {
        DigestAlgorithm::Sha256 => SHA256_PATTERN,
        DigestAlgorithm::Sha512 => SHA512_PATTERN,
    }
}

/// Installer technologies accepted by the manifest format.
pub const INSTALLER_TYPES: [&str; 11] = [
    "msix", "msi", "appx", "exe", "zip", "inno", "nullsoft", "wix", "burn", "pwa", "portable",
];

/// Architectures accepted by the manifest format.
pub const ARCHITECTURES: [&str; 5] = ["x86", "x64", "arm", "arm64", "neutral"];

/// Schema bundled with the tool.
#[derive(Clone, Debug)]
pub struct BuiltinSchema {
    fields: Vec<FieldSchema>,
}

impl BuiltinSchema {
    /// Build a schema from explicit field definitions.
    ///
    /// Later definitions of the same field replace earlier ones.
    #[must_use]
    pub fn from_fields(fields: impl IntoIterator<Item = FieldSchema>) -> Self {
        let mut collected: Vec<FieldSchema> = Vec::new();
        for schema in fields {
            collected.retain(|existing| existing.field() != schema.field());
            collected.push(schema);
        }
        Self { fields: collected }
    }

    /// Constraints of the public package manifest format, with SHA-256
    /// digest fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] if a bundled constraint is malformed.
    pub fn winget() -> Result<Self, ConstraintError> {
        Self::winget_for(DigestAlgorithm::Sha256)
    }

    /// Constraints of the public package manifest format, with digest
    /// fields matching the output of `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] if a bundled pattern fails to compile or
    /// a length range is inverted.
    pub fn winget_for(algorithm: DigestAlgorithm) -> Result<Self, ConstraintError> {
        let digest = digest_pattern(algorithm);
        let scalar = ConstraintSet::new;
        let fields = vec![
            FieldSchema::new(
                Field::PackageIdentifier,
                concat!(
                    "Enter the package identifier, in the following format ",
                    "<Publisher shortname.Application shortname>",
                ),
                FieldKind::Scalar,
                scalar()
                    .with_min_length(4)
                    .with_max_length(128)
                    .try_with_pattern(IDENTIFIER_PATTERN)?,
            ),
            FieldSchema::new(
                Field::PackageVersion,
                "Enter the package version",
                FieldKind::Scalar,
                scalar()
                    .with_max_length(128)
                    .try_with_pattern(VERSION_PATTERN)?,
            ),
            FieldSchema::new(
                Field::PackageLocale,
                "Enter the package locale",
                FieldKind::Scalar,
                scalar()
                    .with_max_length(20)
                    .try_with_pattern(LOCALE_PATTERN)?,
            ),
            FieldSchema::new(
                Field::Publisher,
                "Enter the publisher name",
                FieldKind::Scalar,
                scalar().with_min_length(2).with_max_length(256),
            ),
            FieldSchema::new(
                Field::PackageName,
                "Enter the package name",
                FieldKind::Scalar,
                scalar().with_min_length(2).with_max_length(256),
            ),
            FieldSchema::new(
                Field::License,
                "Enter the package license",
                FieldKind::Scalar,
                scalar().with_min_length(3).with_max_length(512),
            ),
            FieldSchema::new(
                Field::ShortDescription,
                description_prompt("The short package description"),
                FieldKind::Scalar,
                scalar().with_min_length(3).with_max_length(256),
            ),
            FieldSchema::new(
                Field::Description,
                description_prompt("The full package description"),
                FieldKind::Scalar,
                scalar()
                    .with_min_length(3)
                    .with_max_length(10_000)
                    .allow_blank(),
            ),
            FieldSchema::new(
                Field::Protocols,
                "List of protocols the package provides a handler for",
                FieldKind::List,
                scalar()
                    .with_max_items(64)
                    .with_max_length(2048)
                    .with_unique_items()
                    .allow_blank(),
            ),
            FieldSchema::new(
                Field::InstallerUrl,
                "Enter the download url to the installer",
                FieldKind::Url,
                scalar()
                    .with_max_length(2048)
                    .try_with_pattern(URL_PATTERN)?,
            ),
            FieldSchema::new(
                Field::InstallerSha256,
                "Enter the path to the downloaded installer file to hash",
                FieldKind::File,
                scalar().try_with_pattern(digest)?,
            ),
            FieldSchema::new(
                Field::SignatureSha256,
                "Digest of the package signature",
                FieldKind::Scalar,
                scalar().try_with_pattern(digest)?.allow_blank(),
            ),
            FieldSchema::new(
                Field::InstallerType,
                "Enter the installer type",
                FieldKind::Enum,
                scalar().with_enum_values(INSTALLER_TYPES),
            ),
            FieldSchema::new(
                Field::Architecture,
                "Enter the architecture",
                FieldKind::Enum,
                scalar().with_enum_values(ARCHITECTURES),
            ),
        ];
        let fields = fields
            .into_iter()
            .map(FieldSchema::validated)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_fields(fields))
    }

    /// All field schemas, in definition order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}

impl ConstraintSource for BuiltinSchema {
    fn schema_for(&self, field: Field) -> Option<&FieldSchema> {
        self.fields.iter().find(|schema| schema.field() == field)
    }
}

fn description_prompt(description: &str) -> String {
    format!("Enter {}", description.to_lowercase())
}
