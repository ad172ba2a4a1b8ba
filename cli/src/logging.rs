//! Diagnostic logging setup for the `wingman` binary.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter on stderr, which also receives `log`
//! records.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable overriding the log filter.
pub const LOG_ENV_VAR: &str = "WINGMAN_LOG";

/// Filter directive for the given verbosity flags.
///
/// `-q` wins over `-v` and limits output to errors.
///
/// # Examples
///
/// ```
/// use wingman_cli::logging::default_directive;
///
/// assert_eq!(default_directive(0, false), "warn");
/// assert_eq!(default_directive(2, false), "debug");
/// assert_eq!(default_directive(2, true), "error");
/// ```
#[must_use]
pub const fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber.
///
/// [`LOG_ENV_VAR`] takes precedence over the verbosity flags when it holds a
/// valid filter. Installing twice is harmless; the second call is ignored.
pub fn init(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    if installed.is_err() {
        log::debug!("log subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default(0, false, "warn")]
    #[case::verbose(1, false, "info")]
    #[case::very_verbose(3, false, "trace")]
    #[case::quiet(0, true, "error")]
    fn verbosity_maps_to_levels(
        #[case] verbosity: u8,
        #[case] quiet: bool,
        #[case] expected: &str,
    ) {
        assert_eq!(default_directive(verbosity, quiet), expected);
    }

    #[rstest]
    fn init_twice_is_harmless() {
        init(0, false);
        init(2, false);
    }
}
