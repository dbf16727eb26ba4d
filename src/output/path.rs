// src/output/path.rs

//! Maps remote repository paths onto local destinations.

use crate::errors::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Splits a remote path into its segments, rejecting anything that could
/// escape the output root once joined onto a local path.
fn sanitized_segments<'a>(path: &'a str, base_dir: &str, remote_path: &str) -> Result<Vec<&'a str>> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            s if is_plain_name(s) => segments.push(s),
            _ => return Err(escape(base_dir, remote_path)),
        }
    }
    Ok(segments)
}

/// `true` if the host platform reads `segment` as exactly one file name.
///
/// Rejects `..` everywhere. On Windows it also rejects drive prefixes and
/// backslash separators, which are ordinary file name characters on unix.
fn is_plain_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn escape(base_dir: &str, remote_path: &str) -> Error {
    Error::PathEscape {
        path: remote_path.to_string(),
        base: base_dir.to_string(),
    }
}

/// Computes where a remote file lands relative to the output directory.
///
/// The result is the final segment of `base_dir` followed by the part of
/// `remote_path` below `base_dir`. Requesting `src/foo` therefore writes
/// `src/foo/bar/baz.rs` to `foo/bar/baz.rs`, and requesting the single file
/// `src/foo/main.rs` writes `main.rs`.
///
/// # Errors
/// Returns [`Error::PathEscape`] if `remote_path` is not inside `base_dir`, or
/// if either path contains a segment that is not a plain file name on this
/// platform (`..` anywhere; drive prefixes and backslashes on Windows).
///
/// # Examples
/// ```
/// use dirgrab::output::destination_path;
/// use std::path::{Component, Path, PathBuf};
///
/// assert_eq!(
///     destination_path("src/foo", "src/foo/bar/baz.rs").unwrap(),
///     PathBuf::from("foo").join("bar").join("baz.rs")
/// );
/// assert_eq!(
///     destination_path("src/foo/main.rs", "src/foo/main.rs").unwrap(),
///     PathBuf::from("main.rs")
/// );
/// assert!(destination_path("src/foo", "src/other/x.rs").is_err());
/// ```
pub fn destination_path(base_dir: &str, remote_path: &str) -> Result<PathBuf> {
    let base = sanitized_segments(base_dir, base_dir, remote_path)?;
    let remote = sanitized_segments(remote_path, base_dir, remote_path)?;

    if remote.len() < base.len() || remote[..base.len()] != base[..] {
        return Err(escape(base_dir, remote_path));
    }

    let mut destination: PathBuf = base.last().into_iter().collect();
    destination.extend(&remote[base.len()..]);

    if destination.as_os_str().is_empty() {
        // Only possible when both paths are empty: there is no file name to write.
        return Err(escape(base_dir, remote_path));
    }
    Ok(destination)
}
