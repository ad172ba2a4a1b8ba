//! Remote lookups: previously published field values and URL response
//! checks.
//!
//! The prompt loop never talks to the network directly. It asks a
//! [`RemoteLookup`] for a previous value to offer as the default and, for
//! URL fields, for the response status of the entered URL.

use crate::schema::Field;
use crate::state::ManifestState;
use log::debug;
use std::sync::OnceLock;
use std::time::Duration;
use wingman_common::{FieldValue, HttpStatus, ResponseSignal};

/// Network timeout for URL checks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Source of previous values and URL response statuses.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteLookup {
    /// Previously submitted value for `field`, used as the prompt default.
    fn previous_value(&self, field: Field) -> Option<FieldValue>;

    /// Request `url` and report what the server answered.
    fn response_status(&self, url: &str) -> ResponseSignal;
}

/// [`RemoteLookup`] that checks URLs over HTTP with `ureq`.
///
/// Previous values come from a manifest state captured earlier, typically a
/// JSON state file written by a past session.
///
/// # Examples
///
/// ```
/// use wingman_cli::remote::{HttpRemote, RemoteLookup};
/// use wingman_cli::schema::Field;
/// use wingman_cli::state::ManifestState;
///
/// let remote = HttpRemote::new(ManifestState::default());
/// assert!(remote.previous_value(Field::PackageVersion).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpRemote {
    previous: ManifestState,
}

impl HttpRemote {
    /// Offer values from `previous` as prompt defaults.
    #[must_use]
    pub const fn new(previous: ManifestState) -> Self {
        Self { previous }
    }
}

impl RemoteLookup for HttpRemote {
    fn previous_value(&self, field: Field) -> Option<FieldValue> {
        self.previous.get(field)
    }

    fn response_status(&self, url: &str) -> ResponseSignal {
        debug!("probing {url}");
        match http_agent().get(url).call() {
            Ok(response) => ResponseSignal::Status(status_from_code(response.status().as_u16())),
            Err(error) => signal_from_error(url, &error),
        }
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a response signal.
///
/// Non-2xx answers arrive as [`ureq::Error::StatusCode`]; everything else
/// means no usable response came back.
fn signal_from_error(url: &str, error: &ureq::Error) -> ResponseSignal {
    match error {
        ureq::Error::StatusCode(code) => ResponseSignal::Status(status_from_code(*code)),
        other => {
            debug!("no response from {url}: {other}");
            ResponseSignal::NoResponse
        }
    }
}

fn status_from_code(code: u16) -> HttpStatus {
    let reason = ureq::http::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(str::to_owned);
    HttpStatus::new(code, reason)
}
