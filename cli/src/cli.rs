//! CLI argument definitions for wingman.
//!
//! Kept apart from the entrypoint so argument parsing can be tested without
//! running any command.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use wingman::DigestAlgorithm;

/// Author package manifests interactively.
#[derive(Parser, Debug)]
#[command(name = "wingman")]
#[command(version, about)]
#[command(long_about = concat!(
    "Author package manifests interactively.\n\n",
    "wingman asks for each manifest field in turn, validates every answer ",
    "against the manifest schema, and re-asks until the answer is valid. ",
    "Installer files are hashed locally, and MSIX/APPX packages also have ",
    "their signature hashed.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Collect a new manifest and save the answers:\n",
    "    $ wingman new --output state.json\n\n",
    "  Reuse answers from an earlier session as defaults:\n",
    "    $ wingman new --previous state.json\n\n",
    "  Hash an installer and its package signature:\n",
    "    $ wingman hash App.msix --signature\n\n",
    "  Show manifest paths and a branch name:\n",
    "    $ wingman names --identifier Contoso.App --version 1.0.0\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file [default: $WINGMAN_CONFIG, then the platform config directory].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Interactively collect every manifest field.
    New(NewArgs),

    /// Hash an installer file.
    Hash(HashArgs),

    /// Print manifest file paths and a branch name.
    Names(NamesArgs),

    /// Change the GitHub token used for publication.
    Token,
}

/// Arguments for the `new` command.
#[derive(Args, Debug, Clone, Default)]
pub struct NewArgs {
    /// JSON state file whose values are offered as defaults.
    #[arg(long, value_name = "FILE")]
    pub previous: Option<Utf8PathBuf>,

    /// Write the collected values to this JSON file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

/// Arguments for the `hash` command.
#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    /// File to hash.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Hash only the package signature entry (appx, appxbundle, msix, msixbundle).
    #[arg(long)]
    pub signature: bool,

    /// Digest algorithm [default: from configuration, else sha256].
    #[arg(long, value_name = "ALGORITHM")]
    pub algorithm: Option<DigestAlgorithm>,
}

/// Arguments for the `names` command.
#[derive(Args, Debug, Clone)]
pub struct NamesArgs {
    /// Package identifier, e.g. Contoso.App.
    #[arg(long)]
    pub identifier: String,

    /// Package version.
    #[arg(long)]
    pub version: String,

    /// Default locale [default: from configuration, else en-US].
    #[arg(long)]
    pub locale: Option<String>,

    /// Seed for the branch suffix [default: from configuration, else random].
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
