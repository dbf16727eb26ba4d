use super::{validation::validate_builder_options, Action, Config};
use crate::cli::Cli;
use crate::constants::{DEFAULT_API_URL, DEFAULT_DOWNLOAD_DEADLINE};
use crate::download::ErrorPolicy;
use crate::errors::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Builds a [`Config`] step by step.
///
/// Every setting left unset falls back to the same default the CLI uses.
///
/// # Examples
///
/// ```
/// use dirgrab::config::{Action, ConfigBuilder};
/// use std::time::Duration;
///
/// let config = ConfigBuilder::new()
///     .url("https://github.com/octo/widgets/tree/main/docs")
///     .output_dir("downloads")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
///
/// assert!(matches!(config.action, Action::Download { .. }));
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    pub(super) url: Option<String>,
    pub(super) check: Option<bool>,
    pub(super) auth: Option<bool>,
    pub(super) set_token: Option<String>,
    pub(super) unset_token: Option<bool>,
    pub(super) output_dir: Option<String>,
    pub(super) timeout: Option<Duration>,
    pub(super) collect_errors: Option<bool>,
    pub(super) api_url: Option<String>,
    pub(super) token: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder from parsed command line arguments.
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            url: cli.url,
            check: Some(cli.check),
            auth: Some(cli.auth),
            set_token: cli.set,
            unset_token: Some(cli.unset),
            output_dir: Some(cli.output_dir),
            timeout: Some(Duration::from_secs(cli.timeout)),
            collect_errors: Some(cli.collect_errors),
            api_url: Some(cli.api_url),
            token: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn check(mut self, check: bool) -> Self {
        self.check = Some(check);
        self
    }

    pub fn auth(mut self, auth: bool) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn set_token(mut self, token: impl Into<String>) -> Self {
        self.set_token = Some(token.into());
        self
    }

    pub fn unset_token(mut self, unset: bool) -> Self {
        self.unset_token = Some(unset);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn collect_errors(mut self, collect: bool) -> Self {
        self.collect_errors = Some(collect);
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// The bearer token to authenticate with, usually read from the credential store.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Validates the collected settings and builds the final `Config`.
    ///
    /// # Errors
    /// Returns [`Error::Config`](crate::errors::Error::Config) if more than one
    /// action was requested, the timeout is zero, or the API URL is not an
    /// http(s) URL.
    pub fn build(self) -> Result<Config> {
        validate_builder_options(&self)?;

        let action = if self.check.unwrap_or(false) {
            Action::Check
        } else if self.auth.unwrap_or(false) {
            Action::Auth
        } else if let Some(token) = self.set_token {
            Action::SetToken(token)
        } else if self.unset_token.unwrap_or(false) {
            Action::UnsetToken
        } else if let Some(url) = self.url {
            Action::Download { url }
        } else {
            Action::Help
        };

        let error_policy = if self.collect_errors.unwrap_or(false) {
            ErrorPolicy::CollectAll
        } else {
            ErrorPolicy::FirstError
        };

        Ok(Config {
            action,
            output_dir: PathBuf::from(self.output_dir.unwrap_or_else(|| ".".to_string())),
            timeout: self.timeout.unwrap_or(DEFAULT_DOWNLOAD_DEADLINE),
            error_policy,
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: self.token.filter(|t| !t.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::errors::Error;
    use clap::Parser;

    fn build_from(args: &[&str]) -> Result<Config> {
        ConfigBuilder::from_cli(Cli::parse_from(args)).build()
    }

    #[test]
    fn test_no_arguments_means_help() -> Result<()> {
        let config = build_from(&["dirgrab"])?;
        assert_eq!(config.action, Action::Help);
        Ok(())
    }

    #[test]
    fn test_download_config_from_cli() -> Result<()> {
        let config = build_from(&[
            "dirgrab",
            "github.com/o/r/tree/main/docs",
            "-o",
            "out",
            "-t",
            "5",
            "--collect-errors",
        ])?;
        assert_eq!(
            config.action,
            Action::Download {
                url: "github.com/o/r/tree/main/docs".to_string()
            }
        );
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.error_policy, ErrorPolicy::CollectAll);
        Ok(())
    }

    #[test]
    fn test_account_actions_from_cli() -> Result<()> {
        assert_eq!(build_from(&["dirgrab", "-c"])?.action, Action::Check);
        assert_eq!(build_from(&["dirgrab", "--auth"])?.action, Action::Auth);
        assert_eq!(build_from(&["dirgrab", "-u"])?.action, Action::UnsetToken);
        assert_eq!(
            build_from(&["dirgrab", "--set=ghp_x"])?.action,
            Action::SetToken("ghp_x".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = ConfigBuilder::new()
            .url("github.com/o/r/tree/main/d")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_token_is_ignored() -> Result<()> {
        let config = ConfigBuilder::new().token(Some("  ".to_string())).build()?;
        assert_eq!(config.token, None);
        Ok(())
    }
}
