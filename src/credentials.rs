// src/credentials.rs

//! Persistence of the GitHub bearer token used by the `--set` and `--unset`
//! commands.
//!
//! The token lives in a single file in the per-user configuration directory.
//! A `GH_TOKEN` environment variable, when present, takes precedence over the
//! stored value.

#[cfg(unix)]
use crate::constants::CREDENTIAL_FILE_MODE;
use crate::constants::TOKEN_ENV_KEY;
use crate::errors::{io_error_with_path, Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TOKEN_FILE_NAME: &str = "token";

/// Reads, stores and removes the bearer token.
pub trait CredentialStore {
    /// The token to authenticate with, if one is configured.
    fn get(&self) -> Result<Option<String>>;
    /// Persists `token`, replacing any stored value.
    fn set(&self, token: &str) -> Result<()>;
    /// Removes the stored token. Succeeds if none was stored.
    fn unset(&self) -> Result<()>;
}

/// A [`CredentialStore`] backed by a file readable only by the current user.
///
/// # Examples
///
/// ```
/// use dirgrab::credentials::{CredentialStore, FileCredentialStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = FileCredentialStore::with_path(dir.path().join("token"));
///
/// store.set("ghp_example").unwrap();
/// assert_eq!(store.get().unwrap().as_deref(), Some("ghp_example"));
///
/// store.unset().unwrap();
/// assert_eq!(store.get().unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    env_token: Option<String>,
}

impl FileCredentialStore {
    /// Opens the store in the per-user config directory, capturing the current
    /// value of the `GH_TOKEN` environment variable.
    ///
    /// # Errors
    /// Returns [`Error::Credential`] if no home directory can be determined.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", env!("CARGO_PKG_NAME")).ok_or_else(|| {
            Error::Credential("could not determine the user configuration directory".to_string())
        })?;
        let env_token = std::env::var(TOKEN_ENV_KEY)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(Self {
            path: dirs.config_dir().join(TOKEN_FILE_NAME),
            env_token,
        })
    }

    /// Opens a store at an explicit file path that ignores the environment.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_token: None,
        }
    }

    /// Overrides the token that takes precedence over the stored one.
    pub fn env_token(mut self, token: Option<String>) -> Self {
        self.env_token = token;
        self
    }

    /// Location of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        if let Some(token) = &self.env_token {
            log::debug!("Using token from the {} environment variable", TOKEN_ENV_KEY);
            return Ok(Some(token.clone()));
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error_with_path(e, &self.path)),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::Credential("token must not be empty".to_string()));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error_with_path(e, parent))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(CREDENTIAL_FILE_MODE);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| io_error_with_path(e, &self.path))?;
        writeln!(file, "{}", token).map_err(|e| io_error_with_path(e, &self.path))?;

        log::debug!("Stored token in '{}'", self.path.display());
        Ok(())
    }

    fn unset(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Removed token file '{}'", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error_with_path(e, &self.path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_then_get() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileCredentialStore::with_path(dir.path().join("nested").join("token"));
        assert_eq!(store.get()?, None);

        store.set("  ghp_first \n")?;
        assert_eq!(store.get()?.as_deref(), Some("ghp_first"));

        store.set("ghp_second")?;
        assert_eq!(store.get()?.as_deref(), Some("ghp_second"));
        Ok(())
    }

    #[test]
    fn test_env_token_takes_precedence() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileCredentialStore::with_path(dir.path().join("token"))
            .env_token(Some("from_env".to_string()));
        store.set("from_file")?;
        assert_eq!(store.get()?.as_deref(), Some("from_env"));
        Ok(())
    }

    #[test]
    fn test_unset_is_idempotent() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileCredentialStore::with_path(dir.path().join("token"));
        store.unset()?;
        store.set("ghp_x")?;
        store.unset()?;
        store.unset()?;
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::with_path(dir.path().join("token"));
        assert!(matches!(store.set("   "), Err(Error::Credential(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let store = FileCredentialStore::with_path(dir.path().join("token"));
        store.set("ghp_secret")?;
        let mode = fs::metadata(store.path())?.permissions().mode();
        assert_eq!(mode & 0o077, 0);
        Ok(())
    }
}
