// src/constants.rs

use std::time::Duration;

/// Accepted URL prefix including the scheme.
pub const GITHUB_HTTPS_PREFIX: &str = "https://github.com/";

/// Accepted URL prefix without a scheme.
pub const GITHUB_PREFIX: &str = "github.com/";

/// Base URL of the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding the bearer token.
pub const TOKEN_ENV_KEY: &str = "GH_TOKEN";

/// Environment variable overriding the API base URL (GitHub Enterprise, mock servers).
pub const API_URL_ENV_KEY: &str = "DIRGRAB_API_URL";

/// Number of requests per hour GitHub grants unauthenticated clients.
pub const BASE_RATE_LIMIT: u64 = 60;

/// Default upper bound for a whole download.
pub const DEFAULT_DOWNLOAD_DEADLINE: Duration = Duration::from_secs(60);

/// Media type requested from the REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Directory permissions for created output directories (unix only).
pub const DIR_MODE: u32 = 0o755;

/// File permissions for written files (unix only).
pub const FILE_MODE: u32 = 0o644;

/// File permissions for the persisted credential (unix only).
pub const CREDENTIAL_FILE_MODE: u32 = 0o600;
