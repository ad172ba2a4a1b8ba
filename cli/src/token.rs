//! The `token` command: replace the GitHub token used for publication.
//!
//! Storage is an opaque [`TokenStore`]. The bundled [`SessionTokenStore`]
//! only lives as long as the process and is seeded from `GITHUB_TOKEN`.

use crate::prompt::PromptError;
use crate::terminal::Terminal;
use log::debug;
use wingman_common::{ConstraintSet, FieldValue, format_outcome, validate};

/// Environment variable seeding [`SessionTokenStore`].
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Question asked before replacing an existing token.
pub const CHANGE_TOKEN_QUESTION: &str = "Would you like to change the currently stored token?";

/// Message printed once a token has been replaced.
pub const TOKEN_CHANGED_MESSAGE: &str = "Token changed successfully";

const TOKEN_PROMPT: &str = "Token";

/// Opaque credential storage.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore {
    /// The stored token, if any.
    fn stored_token(&self) -> Option<String>;

    /// Replace the stored token.
    fn put_token(&mut self, token: String);
}

/// [`TokenStore`] held in memory for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokenStore {
    token: Option<String>,
}

impl SessionTokenStore {
    /// Seed the store from `GITHUB_TOKEN`, ignoring blank values.
    #[must_use]
    pub fn from_env() -> Self {
        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        debug!(
            "session token {} from {TOKEN_ENV_VAR}",
            if token.is_some() { "seeded" } else { "not seeded" }
        );
        Self { token }
    }
}

impl TokenStore for SessionTokenStore {
    fn stored_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn put_token(&mut self, token: String) {
        self.token = Some(token);
    }
}

/// What [`change_token`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenChange {
    /// No token existed; one was entered and stored.
    Stored,
    /// The existing token was replaced.
    Changed,
    /// The user chose to keep the existing token.
    Kept,
}

/// Ask for a token until a non-blank one is entered.
///
/// # Errors
///
/// Returns [`PromptError::InputClosed`] if input ends first, or
/// [`PromptError::Terminal`] on terminal I/O failure.
pub fn prompt_for_token(terminal: &mut dyn Terminal) -> Result<String, PromptError> {
    let constraints = ConstraintSet::new().with_label(TOKEN_PROMPT);
    loop {
        let Some(raw) = terminal.prompt(TOKEN_PROMPT, None)? else {
            return Err(PromptError::InputClosed {
                subject: TOKEN_PROMPT.to_owned(),
            });
        };
        let token = raw.trim().to_owned();
        let outcome = validate(&FieldValue::Single(token.clone()), &constraints);
        if outcome.is_success() {
            return Ok(token);
        }
        terminal.println(&format_outcome(&outcome))?;
    }
}

/// Store a new token, confirming first when one already exists.
///
/// # Errors
///
/// See [`prompt_for_token`]. A closed input during confirmation is also
/// reported as [`PromptError::InputClosed`].
pub fn change_token(
    store: &mut dyn TokenStore,
    terminal: &mut dyn Terminal,
) -> Result<TokenChange, PromptError> {
    if store.stored_token().is_none() {
        let token = prompt_for_token(terminal)?;
        store.put_token(token);
        return Ok(TokenChange::Stored);
    }

    match terminal.confirm(CHANGE_TOKEN_QUESTION, true)? {
        None => Err(PromptError::InputClosed {
            subject: "confirmation".to_owned(),
        }),
        Some(false) => Ok(TokenChange::Kept),
        Some(true) => {
            let token = prompt_for_token(terminal)?;
            store.put_token(token);
            terminal.println(TOKEN_CHANGED_MESSAGE)?;
            Ok(TokenChange::Changed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedTerminal, with_token_env};
    use mockall::predicate::eq;
    use rstest::rstest;

    #[rstest]
    fn stores_a_first_token_without_confirmation() {
        let mut store = MockTokenStore::new();
        store.expect_stored_token().return_const(None);
        store
            .expect_put_token()
            .with(eq("ghp_first".to_owned()))
            .times(1)
            .return_const(());
        let mut terminal = ScriptedTerminal::new(["  ghp_first  "]);

        let change = change_token(&mut store, &mut terminal).expect("token stored");

        assert_eq!(change, TokenChange::Stored);
        assert!(terminal.transcript().is_empty());
    }

    #[rstest]
    fn confirms_before_replacing_and_reports_success() {
        let mut store = SessionTokenStore::default();
        store.put_token("old".to_owned());
        let mut terminal = ScriptedTerminal::new(["", "new"]).with_confirmations([true]);

        let change = change_token(&mut store, &mut terminal).expect("token changed");

        assert_eq!(change, TokenChange::Changed);
        assert_eq!(store.stored_token().as_deref(), Some("new"));
        assert_eq!(
            terminal.transcript(),
            ["[Error] Token cannot be blank", TOKEN_CHANGED_MESSAGE]
        );
        assert_eq!(
            terminal.prompts().first(),
            Some(&(CHANGE_TOKEN_QUESTION.to_owned(), Some("true".to_owned())))
        );
    }

    #[rstest]
    fn declining_keeps_the_existing_token() {
        let mut store = MockTokenStore::new();
        store
            .expect_stored_token()
            .return_const(Some("old".to_owned()));
        store.expect_put_token().never();
        let mut terminal = ScriptedTerminal::new(Vec::<String>::new()).with_confirmations([false]);

        let change = change_token(&mut store, &mut terminal).expect("nothing to do");

        assert_eq!(change, TokenChange::Kept);
    }

    #[rstest]
    fn closed_input_is_reported() {
        let mut terminal = ScriptedTerminal::default();

        let result = prompt_for_token(&mut terminal);

        assert!(matches!(result, Err(PromptError::InputClosed { .. })));
    }

    #[rstest]
    #[case::set(Some("ghp_env"), Some("ghp_env"))]
    #[case::blank(Some("   "), None)]
    #[case::unset(None, None)]
    fn session_store_is_seeded_from_the_environment(
        #[case] env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let store = with_token_env(env, SessionTokenStore::from_env);

        assert_eq!(store.stored_token().as_deref(), expected);
    }
}
