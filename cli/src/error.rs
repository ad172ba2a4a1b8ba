//! Error types for the wingman CLI.
//!
//! Each module keeps its own error enum; [`CliError`] gathers them at the
//! command boundary so the binary can print one message and exit non-zero.

use crate::hashing::HashError;
use crate::prompt::PromptError;
use crate::schema::Field;
use crate::state::StateError;
use thiserror::Error;
use wingman::ConfigError;
use wingman_common::ConstraintError;

/// Errors that can end a wingman command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be located or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A bundled field constraint is malformed.
    #[error("invalid field constraints: {0}")]
    Constraint(#[from] ConstraintError),

    /// The schema source has no definition for a field the session needs.
    #[error("no schema is defined for {field}")]
    MissingSchema {
        /// The undefined field.
        field: Field,
    },

    /// Interactive acquisition stopped early.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// Hashing failed outside a prompt.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// A state file could not be read or written.
    #[error(transparent)]
    State(#[from] StateError),

    /// A required value for name derivation was never acquired.
    #[error("cannot derive manifest names without {field}")]
    Incomplete {
        /// The missing field.
        field: Field,
    },

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
