//! Test doubles for the terminal and remote collaborators.

use crate::remote::RemoteLookup;
use crate::schema::Field;
use crate::terminal::Terminal;
use crate::token::TOKEN_ENV_VAR;
use std::collections::{HashMap, VecDeque};
use std::io;
use wingman_common::{FieldValue, HttpStatus, ResponseSignal};

/// A [`Terminal`] that replays scripted answers and records its output.
///
/// When the scripted lines run out, `prompt` reports closed input, which
/// lets tests exercise the end-of-input path.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    inputs: VecDeque<String>,
    confirmations: VecDeque<bool>,
    transcript: Vec<String>,
    prompts: Vec<(String, Option<String>)>,
    progress: Vec<f64>,
}

impl ScriptedTerminal {
    /// Creates a terminal that answers prompts with `inputs`, in order.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Queue answers for `confirm`, in order.
    #[must_use]
    pub fn with_confirmations(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(answers);
        self
    }

    /// Every line printed so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Every prompt shown so far, with the default it offered.
    pub fn prompts(&self) -> &[(String, Option<String>)] {
        &self.prompts
    }

    /// Every progress value reported so far.
    pub fn progress_reports(&self) -> &[f64] {
        &self.progress
    }

    /// Number of scripted answers not yet consumed.
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Printed lines that start with `[Error]`.
    pub fn errors(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with(wingman_common::ERROR_MARKER))
            .collect()
    }
}

impl Terminal for ScriptedTerminal {
    fn prompt(&mut self, text: &str, default: Option<&str>) -> io::Result<Option<String>> {
        self.prompts
            .push((text.to_owned(), default.map(str::to_owned)));
        Ok(self.inputs.pop_front())
    }

    fn println(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push(text.to_owned());
        Ok(())
    }

    fn confirm(&mut self, text: &str, default: bool) -> io::Result<Option<bool>> {
        self.prompts
            .push((text.to_owned(), Some(default.to_string())));
        Ok(self.confirmations.pop_front())
    }

    fn progress(&mut self, fraction: f64) -> io::Result<()> {
        self.progress.push(fraction);
        Ok(())
    }
}

/// A [`RemoteLookup`] with fixed previous values and URL responses.
///
/// URLs without a configured response report `200 OK`.
#[derive(Debug, Default)]
pub struct StaticRemote {
    previous: HashMap<Field, FieldValue>,
    responses: HashMap<String, ResponseSignal>,
}

impl StaticRemote {
    /// A remote with no previous values where every URL answers `200 OK`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `value` as the previous value of `field`.
    #[must_use]
    pub fn with_previous(mut self, field: Field, value: FieldValue) -> Self {
        self.previous.insert(field, value);
        self
    }

    /// Answer requests for `url` with `status`.
    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16, reason: &str) -> Self {
        self.responses.insert(
            url.to_owned(),
            ResponseSignal::Status(HttpStatus::new(status, Some(reason.to_owned()))),
        );
        self
    }

    /// Make requests for `url` produce no response at all.
    #[must_use]
    pub fn unreachable(mut self, url: &str) -> Self {
        self.responses
            .insert(url.to_owned(), ResponseSignal::NoResponse);
        self
    }
}

impl RemoteLookup for StaticRemote {
    fn previous_value(&self, field: Field) -> Option<FieldValue> {
        self.previous.get(&field).cloned()
    }

    fn response_status(&self, url: &str) -> ResponseSignal {
        self.responses.get(url).cloned().unwrap_or_else(|| {
            ResponseSignal::Status(HttpStatus::new(200, Some("OK".to_owned())))
        })
    }
}

/// Run `f` with the token environment variable set to `token`, or unset
/// when `token` is `None`.
pub fn with_token_env<F, R>(token: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    temp_env::with_var(TOKEN_ENV_VAR, token, f)
}
