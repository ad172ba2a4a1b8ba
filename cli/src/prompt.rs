//! The prompt-retry loop that acquires one manifest field.
//!
//! [`FieldAcquisition`] is an explicit state machine:
//!
//! ```text
//! Prompting -> Validating -> Success
//!                  |
//!                  v
//!               Invalid -> Prompting
//! ```
//!
//! Validation failures never leave the loop: they are printed and the user
//! is asked again, with no attempt limit. Hashing failures and closed input
//! are returned to the caller. The manifest state is written exactly once,
//! on the transition into [`AcquisitionState::Success`], so an abandoned
//! acquisition leaves no trace.

use crate::hashing::{
    HashError, HexDigest, hash_file_in_background, hash_msix_signature, is_container_path,
};
use crate::remote::RemoteLookup;
use crate::schema::{Field, FieldSchema};
use crate::state::ManifestState;
use crate::terminal::Terminal;
use camino::Utf8Path;
use log::{debug, info};
use std::io;
use thiserror::Error;
use wingman::DigestAlgorithm;
use wingman_common::{
    FieldKind, FieldValue, ValidationOutcome, format_outcome, validate, validate_with_response,
};

/// Marker printed before the description of a field that must be answered.
pub const REQUIRED_MARKER: &str = "[Required]";

/// Marker printed before the description of a field that may be left blank.
pub const OPTIONAL_MARKER: &str = "[Optional]";

/// Errors that end an acquisition without committing a value.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The input stream closed before a valid answer was given.
    #[error("input closed while waiting for {subject}")]
    InputClosed {
        /// What was being asked for.
        subject: String,
    },

    /// Hashing the named file failed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

/// Collaborators one acquisition needs.
pub struct PromptContext<'a> {
    /// Where prompts are shown and answers read.
    pub terminal: &'a mut dyn Terminal,
    /// Source of URL response statuses.
    pub remote: &'a dyn RemoteLookup,
    /// Session state receiving the committed value.
    pub manifest: &'a mut ManifestState,
    /// Digest used for file-typed fields.
    pub algorithm: DigestAlgorithm,
}

/// Where a [`FieldAcquisition`] currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionState {
    /// About to show the instruction and read a line.
    Prompting,
    /// Holding a parsed submission that has not been checked yet.
    Validating {
        /// The submission.
        value: FieldValue,
    },
    /// The last submission failed; the diagnostic is printed next.
    Invalid {
        /// Why it failed.
        outcome: ValidationOutcome,
    },
    /// A value passed validation and has been committed.
    Success {
        /// The committed value.
        value: FieldValue,
    },
}

/// State machine acquiring one field.
#[derive(Debug)]
pub struct FieldAcquisition<'s> {
    schema: &'s FieldSchema,
    signature_schema: Option<&'s FieldSchema>,
    previous: Option<FieldValue>,
    state: AcquisitionState,
}

impl<'s> FieldAcquisition<'s> {
    /// Start acquiring the field described by `schema`.
    ///
    /// `previous` is offered as the default; an empty answer resubmits it.
    #[must_use]
    pub fn new(schema: &'s FieldSchema, previous: Option<FieldValue>) -> Self {
        Self {
            schema,
            signature_schema: None,
            previous: previous.filter(|value| !value.is_empty()),
            state: AcquisitionState::Prompting,
        }
    }

    /// Check package signatures found while hashing against `schema`.
    ///
    /// Without one, signatures are checked against this field's own
    /// constraints.
    #[must_use]
    pub fn with_signature_schema(mut self, schema: &'s FieldSchema) -> Self {
        self.signature_schema = Some(schema);
        self
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &AcquisitionState {
        &self.state
    }

    /// Instruction line shown before each prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use wingman_cli::prompt::FieldAcquisition;
    /// use wingman_cli::schema::{Field, FieldSchema};
    /// use wingman_common::{ConstraintSet, FieldKind};
    ///
    /// let schema = FieldSchema::new(
    ///     Field::Protocols,
    ///     "List of protocols the package provides a handler for",
    ///     FieldKind::List,
    ///     ConstraintSet::new().with_max_items(64).allow_blank(),
    /// );
    /// let acquisition = FieldAcquisition::new(&schema, None);
    /// assert_eq!(
    ///     acquisition.instruction(),
    ///     "[Optional] List of protocols the package provides a handler for (Max 64)"
    /// );
    /// ```
    #[must_use]
    pub fn instruction(&self) -> String {
        let marker = if self.schema.is_required() {
            REQUIRED_MARKER
        } else {
            OPTIONAL_MARKER
        };
        let mut text = format!("{marker} {}", self.schema.description());
        let list_limit = self
            .schema
            .constraints()
            .max_items()
            .filter(|_| self.schema.kind().is_list());
        if let Some(max) = list_limit {
            text.push_str(&format!(" (Max {max})"));
        }
        text
    }

    /// Advance one transition.
    ///
    /// Stepping a finished acquisition is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InputClosed`] when the terminal has no more
    /// input, [`PromptError::Hash`] when a file-typed answer cannot be
    /// hashed, and [`PromptError::Terminal`] on terminal I/O failure. The
    /// state is left at `Prompting` in each case and nothing is committed.
    pub fn step(&mut self, ctx: &mut PromptContext<'_>) -> Result<&AcquisitionState, PromptError> {
        let current = std::mem::replace(&mut self.state, AcquisitionState::Prompting);
        self.state = match current {
            AcquisitionState::Prompting => self.read_submission(ctx)?,
            AcquisitionState::Validating { value } => self.evaluate(value, ctx)?,
            AcquisitionState::Invalid { outcome } => {
                ctx.terminal.println(&format_outcome(&outcome))?;
                AcquisitionState::Prompting
            }
            finished @ AcquisitionState::Success { .. } => finished,
        };
        Ok(&self.state)
    }

    /// Drive the machine until a value is committed.
    ///
    /// # Errors
    ///
    /// See [`FieldAcquisition::step`].
    pub fn run(mut self, ctx: &mut PromptContext<'_>) -> Result<FieldValue, PromptError> {
        loop {
            if let AcquisitionState::Success { value } = self.step(ctx)? {
                return Ok(value.clone());
            }
        }
    }

    fn read_submission(
        &self,
        ctx: &mut PromptContext<'_>,
    ) -> Result<AcquisitionState, PromptError> {
        ctx.terminal.println(&self.instruction())?;
        let default = self.previous.as_ref().map(FieldValue::display_text);
        if let Some(previous) = &default {
            ctx.terminal.println(&format!("Previous value: {previous}"))?;
        }
        let field = self.schema.field();
        let Some(raw) = ctx.terminal.prompt(field.label(), default.as_deref())? else {
            return Err(PromptError::InputClosed {
                subject: field.label().to_owned(),
            });
        };

        let value = match (&self.previous, raw.trim().is_empty()) {
            (Some(previous), true) => {
                debug!("resubmitting previous value for {field}");
                previous.clone()
            }
            _ => FieldValue::parse(
                &raw,
                self.schema.kind(),
                self.schema.constraints().unique_items(),
            ),
        };
        Ok(AcquisitionState::Validating { value })
    }

    fn evaluate(
        &self,
        value: FieldValue,
        ctx: &mut PromptContext<'_>,
    ) -> Result<AcquisitionState, PromptError> {
        let constraints = self.schema.constraints();
        let (value, signature) = match (self.schema.kind(), value) {
            (FieldKind::File, FieldValue::Single(path)) if !path.is_empty() => {
                let (digest, signature) = hash_installer(Utf8Path::new(&path), ctx)?;
                (FieldValue::Hash(digest.into_inner()), signature)
            }
            (_, other) => (other, None),
        };

        let outcome = match (self.schema.kind(), &value) {
            (FieldKind::Url, FieldValue::Single(url)) if !url.is_empty() => {
                validate_with_response(&value, constraints, || ctx.remote.response_status(url))
            }
            _ => validate(&value, constraints),
        };
        if !outcome.is_success() {
            return Ok(AcquisitionState::Invalid { outcome });
        }
        if let Some(signature) = &signature {
            let constraints = self
                .signature_schema
                .map_or(constraints, FieldSchema::constraints);
            let submitted = FieldValue::Hash(signature.as_str().to_owned());
            let outcome = validate(&submitted, constraints);
            if !outcome.is_success() {
                return Ok(AcquisitionState::Invalid { outcome });
            }
        }

        self.commit(&value, signature, ctx.manifest);
        Ok(AcquisitionState::Success { value })
    }

    fn commit(
        &self,
        value: &FieldValue,
        signature: Option<HexDigest>,
        manifest: &mut ManifestState,
    ) {
        let field = self.schema.field();
        manifest.commit(field, value.clone());
        if let Some(signature) = signature {
            manifest.set_signature_sha256(signature.into_inner());
        }
        info!("committed {field}");
    }
}

/// Acquire the field described by `schema` and commit it into
/// `ctx.manifest`.
///
/// The previous value is looked up through `ctx.remote`.
///
/// # Errors
///
/// See [`FieldAcquisition::step`].
pub fn acquire_field(
    schema: &FieldSchema,
    ctx: &mut PromptContext<'_>,
) -> Result<FieldValue, PromptError> {
    let previous = ctx.remote.previous_value(schema.field());
    FieldAcquisition::new(schema, previous).run(ctx)
}

/// Hash the installer at `path`, and its package signature when the file is
/// an msix-family package containing one.
fn hash_installer(
    path: &Utf8Path,
    ctx: &mut PromptContext<'_>,
) -> Result<(HexDigest, Option<HexDigest>), PromptError> {
    let mut progress_error = None;
    let terminal = &mut *ctx.terminal;
    let digest = hash_file_in_background(path, ctx.algorithm, |fraction| {
        if let Err(error) = terminal.progress(fraction) {
            progress_error.get_or_insert(error);
        }
    })?;
    if let Some(error) = progress_error {
        return Err(PromptError::Terminal(error));
    }

    if !is_container_path(path) {
        return Ok((digest, None));
    }
    let signature = hash_msix_signature(path, ctx.algorithm)?;
    if signature.is_empty_input_digest(ctx.algorithm) {
        debug!("{path} carries no {}", Field::SignatureSha256);
        return Ok((digest, None));
    }
    Ok((digest, Some(signature)))
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
