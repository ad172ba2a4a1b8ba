//! wingman CLI entrypoint.
//!
//! Collects manifest fields interactively, hashes installers and prints
//! manifest names. Diagnostics go to stderr; command output goes to stdout.

use clap::Parser;
use log::debug;
use std::io::Write;
use wingman::SharedConfig;
use wingman_cli::cli::{Cli, Command};
use wingman_cli::commands::{load_previous, run_hash, run_names, run_new, run_token};
use wingman_cli::error::Result;
use wingman_cli::logging;
use wingman_cli::remote::HttpRemote;
use wingman_cli::terminal::StdTerminal;
use wingman_cli::token::SessionTokenStore;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity, cli.quiet);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = SharedConfig::discover(cli.config.as_deref())?;
    debug!("using {} digests", config.hashing.algorithm);

    match &cli.command {
        Command::New(args) => {
            let remote = HttpRemote::new(load_previous(args)?);
            let mut terminal = StdTerminal::stdio();
            run_new(args, &config, &mut terminal, &remote)?;
        }
        Command::Hash(args) => run_hash(args, &config, &mut std::io::stdout().lock())?,
        Command::Names(args) => run_names(args, &config, &mut std::io::stdout().lock())?,
        Command::Token => {
            let mut store = SessionTokenStore::from_env();
            let mut terminal = StdTerminal::stdio();
            let change = run_token(&mut store, &mut terminal)?;
            debug!("token command finished: {change:?}");
        }
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort; there is nowhere else to report.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_cli::error::CliError;
    use wingman_cli::schema::Field;

    #[test]
    fn success_exits_zero_without_output() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn failure_prints_error_and_exits_one() {
        let err = CliError::Incomplete {
            field: Field::PackageVersion,
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(
            stderr_text,
            "cannot derive manifest names without Package Version\n"
        );
    }
}
