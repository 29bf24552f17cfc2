// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.

use itertools::Itertools;
use log::debug;
use std::env;
use thiserror::Error;

/// Environment variable holding the Reddit app's client ID.
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";

/// Environment variable holding the Reddit app's client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";

/// Environment variable holding the user agent sent with every request.
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";

/// Loads variables from a `.env` file in the current directory, if one
/// exists.
///
/// Variables already set in the process environment win over the ones
/// in the file. A missing file is not an error; the credentials may well
/// be set system-wide.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(err) => debug!("no .env loaded: {err}"),
    }
}

/// Credentials for a Reddit "script" or "web" app.
///
/// Create an app at <https://www.reddit.com/prefs/apps> to obtain a client
/// ID and secret.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    user_agent: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Reads credentials from `$REDDIT_CLIENT_ID`, `$REDDIT_CLIENT_SECRET`,
    /// and `$REDDIT_USER_AGENT`.
    ///
    /// Returns an error naming every variable that is unset or empty.
    pub fn from_env() -> Result<Self, CredentialsError> {
        let vars = [CLIENT_ID_VAR, CLIENT_SECRET_VAR, USER_AGENT_VAR];
        let values = vars.map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()));

        let missing = vars
            .iter()
            .zip(values.iter())
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(CredentialsError::Missing(missing));
        }

        let [client_id, client_secret, user_agent] = values.map(Option::unwrap_or_default);
        Ok(Self::new(client_id, client_secret, user_agent))
    }

    /// The app's client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The app's client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The user agent to identify ourselves with.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"********")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Indicates that credentials could not be read from the environment.
#[derive(Debug, Error, PartialEq)]
pub enum CredentialsError {
    /// One or more required environment variables are unset.
    #[error("Missing required environment variables: {}", .0.iter().join(", "))]
    Missing(Vec<&'static str>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_env::with_vars;

    #[test]
    fn it_reads_credentials_from_the_environment() {
        with_vars(
            [
                (CLIENT_ID_VAR, Some("id")),
                (CLIENT_SECRET_VAR, Some("secret")),
                (USER_AGENT_VAR, Some("subreport-test/0.1")),
            ],
            || {
                let creds = Credentials::from_env().unwrap();
                assert_eq!(creds.client_id(), "id");
                assert_eq!(creds.client_secret(), "secret");
                assert_eq!(creds.user_agent(), "subreport-test/0.1");
            },
        )
    }

    #[test]
    fn it_names_every_missing_variable() {
        with_vars(
            [
                (CLIENT_ID_VAR, Some("id")),
                (CLIENT_SECRET_VAR, None),
                (USER_AGENT_VAR, None),
            ],
            || {
                let err = Credentials::from_env().unwrap_err();
                assert_eq!(
                    err,
                    CredentialsError::Missing(vec![CLIENT_SECRET_VAR, USER_AGENT_VAR])
                );
                assert_eq!(
                    err.to_string(),
                    "Missing required environment variables: REDDIT_CLIENT_SECRET, REDDIT_USER_AGENT"
                );
            },
        )
    }

    #[test]
    fn it_treats_empty_variables_as_missing() {
        with_vars(
            [
                (CLIENT_ID_VAR, Some("")),
                (CLIENT_SECRET_VAR, Some("secret")),
                (USER_AGENT_VAR, Some("  ")),
            ],
            || {
                let err = Credentials::from_env().unwrap_err();
                assert_eq!(
                    err,
                    CredentialsError::Missing(vec![CLIENT_ID_VAR, USER_AGENT_VAR])
                );
            },
        )
    }

    #[test]
    fn it_hides_the_secret_when_debugging() {
        let creds = Credentials::new("id", "hunter2", "agent");
        let debugged = format!("{creds:?}");
        assert!(!debugged.contains("hunter2"));
    }
}
