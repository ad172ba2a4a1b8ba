//! A full interactive session: every field, one after another.
//!
//! Fields are acquired strictly in order; the next prompt only appears once
//! the previous field is committed. A file that cannot be hashed is
//! reported and asked for again, since the user can fix a mistyped path.

use crate::error::{CliError, Result};
use crate::naming::{ManifestNames, branch_rng};
use crate::prompt::{FieldAcquisition, PromptContext, PromptError};
use crate::schema::{ConstraintSource, Field};
use crate::state::ManifestState;
use log::{info, warn};
use wingman_common::{ERROR_MARKER, FieldKind, FieldValue};

/// Settings for one interactive session.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions<'a> {
    /// Fields to acquire, in order.
    pub fields: &'a [Field],
    /// Locale offered when no previous locale is known.
    pub default_locale: &'a str,
}

/// Acquire every field in `options.fields` into `ctx.manifest`.
///
/// # Errors
///
/// Returns [`CliError::MissingSchema`] for a field `source` does not define
/// and [`CliError::Prompt`] when input closes or the terminal fails.
pub fn run_session(
    source: &dyn ConstraintSource,
    options: SessionOptions<'_>,
    ctx: &mut PromptContext<'_>,
) -> Result<()> {
    for &field in options.fields {
        let schema = source
            .schema_for(field)
            .ok_or(CliError::MissingSchema { field })?;
        let previous = ctx.remote.previous_value(field).or_else(|| {
            (field == Field::PackageLocale)
                .then(|| FieldValue::Single(options.default_locale.to_owned()))
        });

        let signature_schema = source.schema_for(Field::SignatureSha256);

        loop {
            let mut acquisition = FieldAcquisition::new(schema, previous.clone());
            if let Some(signature_schema) = signature_schema {
                acquisition = acquisition.with_signature_schema(signature_schema);
            }
            match acquisition.run(ctx) {
                Ok(_) => break,
                Err(PromptError::Hash(error)) if schema.kind() == FieldKind::File => {
                    warn!("hashing failed for {field}: {error}");
                    ctx.terminal.println(&format!("{ERROR_MARKER} {error}"))?;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
    info!("session complete with {} fields", ctx.manifest.len());
    Ok(())
}

/// Derive manifest names from a completed session.
///
/// The branch suffix is drawn from `seed` when given, otherwise from the
/// operating system.
///
/// # Errors
///
/// Returns [`CliError::Incomplete`] if the identifier, version or locale is
/// missing.
pub fn names_for(state: &ManifestState, seed: Option<u64>) -> Result<ManifestNames> {
    let identifier = state.package_identifier().ok_or(CliError::Incomplete {
        field: Field::PackageIdentifier,
    })?;
    let version = state.package_version().ok_or(CliError::Incomplete {
        field: Field::PackageVersion,
    })?;
    let locale = state.package_locale().ok_or(CliError::Incomplete {
        field: Field::PackageLocale,
    })?;
    Ok(ManifestNames::new(
        identifier,
        version,
        locale,
        &mut branch_rng(seed),
    ))
}
