// src/status.rs

//! Human readable reports for the `--check` and `--auth` commands.

use crate::constants::BASE_RATE_LIMIT;
use crate::core_types::{RateLimit, UserIdentity};
use std::time::SystemTime;

/// Formats the authorization state and rate-limit counters as one line.
///
/// A client counts as authorized only when a token was supplied *and* the API
/// granted more than the anonymous request budget.
///
/// # Examples
///
/// ```
/// use dirgrab::core_types::RateLimit;
/// use dirgrab::status::format_status;
/// use std::time::{Duration, SystemTime};
///
/// let rate = RateLimit {
///     limit: 5000,
///     remaining: 4990,
///     reset: SystemTime::now() + Duration::from_secs(30 * 60),
/// };
/// let line = format_status(&rate, true);
/// assert!(line.starts_with("Status: Authorized | Remaining rate limit: 4990 | Reset in: "));
/// ```
pub fn format_status(rate: &RateLimit, has_token: bool) -> String {
    format_status_at(rate, has_token, SystemTime::now())
}

fn format_status_at(rate: &RateLimit, has_token: bool, now: SystemTime) -> String {
    let status = if has_token && rate.limit > BASE_RATE_LIMIT {
        "Authorized"
    } else {
        "NOT Authorized"
    };
    // A reset time in the past reads as zero minutes.
    let minutes = rate
        .reset
        .duration_since(now)
        .map(|d| d.as_secs_f64() / 60.0)
        .unwrap_or(0.0);
    format!(
        "Status: {} | Remaining rate limit: {} | Reset in: {:.0} mins",
        status, rate.remaining, minutes
    )
}

/// Formats the login of the authenticated user.
pub fn format_auth(user: &UserIdentity) -> String {
    format!("Authenticated as @{}", user.login)
}
