//! Command implementations behind the `wingman` binary.
//!
//! Each command takes its collaborators explicitly so it can run against
//! scripted terminals and in-memory remotes.

use crate::cli::{HashArgs, NamesArgs, NewArgs};
use crate::error::Result;
use crate::hashing::{hash_file_in_background, hash_msix_signature};
use crate::naming::{ManifestNames, branch_rng};
use crate::output::{digest_line, missing_signature_line, names_summary, saved_message};
use crate::prompt::PromptContext;
use crate::remote::RemoteLookup;
use crate::schema::{BuiltinSchema, Field};
use crate::session::{SessionOptions, names_for, run_session};
use crate::state::ManifestState;
use crate::terminal::Terminal;
use crate::token::{TokenChange, TokenStore, change_token};
use log::info;
use std::io::Write;
use wingman::SharedConfig;

/// Run an interactive session and report or save the result.
///
/// # Errors
///
/// Returns any session, state-file or output error.
pub fn run_new(
    args: &NewArgs,
    config: &SharedConfig,
    terminal: &mut dyn Terminal,
    remote: &dyn RemoteLookup,
) -> Result<ManifestState> {
    let schema = BuiltinSchema::winget_for(config.hashing.algorithm)?;
    let mut manifest = ManifestState::default();
    let mut ctx = PromptContext {
        terminal: &mut *terminal,
        remote,
        manifest: &mut manifest,
        algorithm: config.hashing.algorithm,
    };
    run_session(
        &schema,
        SessionOptions {
            fields: &Field::PROMPTED,
            default_locale: config.default_locale(),
        },
        &mut ctx,
    )?;

    let names = names_for(&manifest, config.branch.seed)?;
    terminal.println(&names_summary(&names))?;
    match &args.output {
        Some(path) => {
            manifest.write_to(path)?;
            terminal.println(&saved_message(manifest.len(), path))?;
        }
        None => {
            let json = manifest.to_json().map_err(std::io::Error::from)?;
            terminal.println(&json)?;
        }
    }
    Ok(manifest)
}

/// Load the previous-value state named by `args`, or an empty one.
///
/// # Errors
///
/// Returns [`crate::error::CliError::State`] if the file cannot be read.
pub fn load_previous(args: &NewArgs) -> Result<ManifestState> {
    let Some(path) = &args.previous else {
        return Ok(ManifestState::default());
    };
    let state = ManifestState::read_from(path)?;
    info!("loaded {} previous values from {path}", state.len());
    Ok(state)
}

/// Hash a file (or its package signature) and print the digest line.
///
/// # Errors
///
/// Returns any hashing or output error.
pub fn run_hash(args: &HashArgs, config: &SharedConfig, out: &mut dyn Write) -> Result<()> {
    let algorithm = args.algorithm.unwrap_or(config.hashing.algorithm);
    if args.signature {
        let digest = hash_msix_signature(&args.file, algorithm)?;
        if digest.is_empty_input_digest(algorithm) {
            writeln!(out, "{}", missing_signature_line(&args.file))?;
        }
        writeln!(out, "{}", digest_line(algorithm, &digest, &args.file))?;
        return Ok(());
    }
    let digest = hash_file_in_background(&args.file, algorithm, |_| {})?;
    writeln!(out, "{}", digest_line(algorithm, &digest, &args.file))?;
    Ok(())
}

/// Print manifest names for the given identifier and version.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn run_names(args: &NamesArgs, config: &SharedConfig, out: &mut dyn Write) -> Result<()> {
    let locale = args.locale.as_deref().unwrap_or_else(|| config.default_locale());
    let seed = args.seed.or(config.branch.seed);
    let names = ManifestNames::new(&args.identifier, &args.version, locale, &mut branch_rng(seed));
    writeln!(out, "{}", names_summary(&names))?;
    Ok(())
}

/// Run the token command.
///
/// # Errors
///
/// Returns any prompt error.
pub fn run_token(store: &mut dyn TokenStore, terminal: &mut dyn Terminal) -> Result<TokenChange> {
    Ok(change_token(store, terminal)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedTerminal, StaticRemote};
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;
    use wingman::DigestAlgorithm;

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[rstest]
    fn names_use_configured_locale_and_seed() {
        let config = SharedConfig::from_toml_str("locale = \"de-DE\"\n[branch]\nseed = 11\n")
            .expect("valid configuration");
        let args = NamesArgs {
            identifier: "Contoso.App".to_owned(),
            version: "3.1".to_owned(),
            locale: None,
            seed: None,
        };
        let mut first = Vec::new();
        let mut second = Vec::new();

        run_names(&args, &config, &mut first).expect("names print");
        run_names(&args, &config, &mut second).expect("names print");

        let text = String::from_utf8(first).expect("utf-8 output");
        assert!(text.contains("Contoso.App.locale.de-DE.yaml"));
        assert_eq!(text.as_bytes(), second.as_slice(), "seeded branches repeat");
    }

    #[rstest]
    fn hash_prints_algorithm_digest_and_path() {
        let dir = TempDir::new().expect("create temp dir");
        let file = utf8_dir(&dir).join("setup.exe");
        std::fs::write(&file, b"hello").expect("write file");
        let args = HashArgs {
            file: file.clone(),
            signature: false,
            algorithm: None,
        };
        let mut out = Vec::new();

        run_hash(&args, &SharedConfig::default(), &mut out).expect("hash succeeds");

        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            format!(
                "sha256  2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824  {file}\n"
            )
        );
    }

    #[rstest]
    fn signature_hash_rejects_non_packages() {
        let args = HashArgs {
            file: Utf8PathBuf::from("setup.zip"),
            signature: true,
            algorithm: Some(DigestAlgorithm::Sha512),
        };

        let result = run_hash(&args, &SharedConfig::default(), &mut Vec::new());

        assert!(matches!(
            result,
            Err(crate::error::CliError::Hash(
                crate::hashing::HashError::InvalidArgument { .. }
            ))
        ));
    }

    #[rstest]
    fn new_session_saves_state_and_prints_names() {
        let dir = TempDir::new().expect("create temp dir");
        let root = utf8_dir(&dir);
        let installer = root.join("setup.exe");
        std::fs::write(&installer, b"installer").expect("write installer");
        let output = root.join("state.json");
        let mut terminal = ScriptedTerminal::new([
            "Contoso.App",
            "1.0.0",
            "",
            "Contoso",
            "Contoso App",
            "MIT",
            "An app for tests",
            "",
            "https://example.test/setup.exe",
            installer.as_str(),
            "exe",
            "x64",
            "contoso, contoso",
        ]);
        let config =
            SharedConfig::from_toml_str("[branch]\nseed = 4\n").expect("valid configuration");
        let args = NewArgs {
            previous: None,
            output: Some(output.clone()),
        };

        let manifest = run_new(&args, &config, &mut terminal, &StaticRemote::new())
            .expect("session completes");

        assert!(terminal.errors().is_empty(), "{:?}", terminal.errors());
        assert_eq!(manifest.protocols(), Some(["contoso".to_owned()].as_slice()));
        assert!(!manifest.contains(Field::Description));
        let saved = ManifestState::read_from(&output).expect("state saved");
        assert_eq!(saved, manifest);
        assert!(
            terminal
                .transcript()
                .iter()
                .any(|line| line.starts_with("Branch: Contoso.App-1.0.0-"))
        );
    }

    #[rstest]
    fn previous_state_is_loaded_from_file() {
        let dir = TempDir::new().expect("create temp dir");
        let path = utf8_dir(&dir).join("previous.json");
        std::fs::write(&path, r#"{"PackageVersion": "0.9"}"#).expect("write state");
        let args = NewArgs {
            previous: Some(path),
            output: None,
        };

        let state = load_previous(&args).expect("state loads");

        assert_eq!(state.package_version(), Some("0.9"));
    }
}
