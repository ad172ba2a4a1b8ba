//! wingman CLI library.
//!
//! Interactive acquisition of package manifest fields: each field is
//! prompted for, validated, and re-asked until the answer is acceptable.
//! Installer files are hashed locally. The `wingman` binary is a thin
//! wrapper over [`commands`].
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Command implementations
//! - [`error`] - Errors surfaced at the command boundary
//! - [`hashing`] - Streaming file and package-signature digests
//! - [`logging`] - Tracing subscriber setup
//! - [`naming`] - Manifest file names, paths and branch names
//! - [`output`] - Output formatting
//! - [`prompt`] - The per-field prompt-retry state machine
//! - [`remote`] - Previous values and URL probing
//! - [`schema`] - Field definitions and their constraints
//! - [`session`] - Acquisition of every field in order
//! - [`state`] - Collected values and their JSON form
//! - [`terminal`] - Terminal abstraction
//! - [`token`] - GitHub token handling

pub mod cli;
pub mod commands;
pub mod error;
pub mod hashing;
pub mod logging;
pub mod naming;
pub mod output;
pub mod prompt;
pub mod remote;
pub mod schema;
pub mod session;
pub mod state;
pub mod terminal;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod token;
