// src/config/validation.rs

use super::ConfigBuilder;
use crate::errors::{Error, Result};
use url::Url;

/// Validates combinations of options on the `ConfigBuilder` that clap cannot
/// express, or that were set programmatically.
pub(super) fn validate_builder_options(builder: &ConfigBuilder) -> Result<()> {
    let requested = [
        builder.url.is_some(),
        builder.check.unwrap_or(false),
        builder.auth.unwrap_or(false),
        builder.set_token.is_some(),
        builder.unset_token.unwrap_or(false),
    ]
    .iter()
    .filter(|set| **set)
    .count();
    if requested > 1 {
        return Err(Error::Config(
            "only one of <URL>, --check, --auth, --set and --unset can be used at a time"
                .to_string(),
        ));
    }

    if builder.timeout.is_some_and(|t| t.is_zero()) {
        return Err(Error::Config("--timeout must be greater than 0".to_string()));
    }

    if let Some(api_url) = &builder.api_url {
        let parsed = Url::parse(api_url)
            .map_err(|e| Error::Config(format!("invalid API url '{}': {}", api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API url '{}' must use http or https",
                api_url
            )));
        }
    }

    Ok(())
}
