//! Defines the core `Config` struct and related types for application configuration.
//!
//! This module consolidates all the settings parsed and validated from the CLI,
//! making them available to the rest of the application in a structured and
//! type-safe manner.

use crate::download::ErrorPolicy;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub use builder::ConfigBuilder;
mod builder;
mod validation;

/// The operation a run performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Download the file or directory behind a GitHub URL.
    Download { url: String },
    /// Report the authorization state and rate limit.
    Check,
    /// Report the user the token belongs to.
    Auth,
    /// Persist a token.
    SetToken(String),
    /// Remove the persisted token.
    UnsetToken,
    /// Nothing was requested; print usage.
    Help,
}

/// Represents the fully resolved configuration for a run.
///
/// Built from the CLI with [`ConfigBuilder::from_cli`] or programmatically
/// with [`ConfigBuilder::new`].
#[derive(Clone)]
pub struct Config {
    /// What to do.
    pub action: Action,
    /// Directory the downloaded folder is created in.
    pub output_dir: PathBuf,
    /// Upper bound for a whole download.
    pub timeout: Duration,
    /// How concurrent download failures are reported.
    pub error_policy: ErrorPolicy,
    /// Base URL of the GitHub REST API.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
}

// Custom Debug implementation for Config, so the token never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            Action::SetToken(_) => "SetToken(<redacted>)".to_string(),
            other => format!("{:?}", other),
        };
        f.debug_struct("Config")
            .field("action", &format_args!("{}", action))
            .field("output_dir", &self.output_dir)
            .field("timeout", &self.timeout)
            .field("error_policy", &self.error_policy)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Creates a download `Config` for testing purposes.
    ///
    /// This function is hidden from public documentation and is intended for
    /// use in tests and doc tests only.
    #[doc(hidden)]
    pub fn new_for_test(url: &str) -> Self {
        Self {
            action: Action::Download {
                url: url.to_string(),
            },
            output_dir: PathBuf::from("."),
            timeout: crate::constants::DEFAULT_DOWNLOAD_DEADLINE,
            error_policy: ErrorPolicy::FirstError,
            api_url: crate::constants::DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::new_for_test("github.com/o/r/tree/main/d");
        config.token = Some("ghp_secret_value".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("ghp_secret_value"));
        assert!(rendered.contains("<redacted>"));

        config.action = Action::SetToken("ghp_other_secret".to_string());
        assert!(!format!("{:?}", config).contains("ghp_other_secret"));
    }
}
