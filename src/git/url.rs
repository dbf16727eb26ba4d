//! Handles parsing of GitHub file and folder URLs.

use crate::constants::{GITHUB_HTTPS_PREFIX, GITHUB_PREFIX};
use crate::core_types::RepoRef;
use crate::errors::{Error, Result};

/// Minimum number of `/` separators after the host: `owner/repo/tree/ref/path`.
const MIN_SEPARATORS: usize = 4;

/// Strips the GitHub host prefix, returning `owner/repo/...`.
fn strip_github_prefix(url: &str) -> Result<&str> {
    url.strip_prefix(GITHUB_HTTPS_PREFIX)
        .or_else(|| url.strip_prefix(GITHUB_PREFIX))
        .ok_or(Error::InvalidSource)
}

/// Parses a GitHub URL pointing at a file or directory into a [`RepoRef`].
///
/// The URL must look like `https://github.com/owner/repo/tree/ref/path` (or
/// the same without the scheme). The third segment is usually `tree` or
/// `blob`; it is not inspected. Everything after the ref is the root path.
///
/// # Errors
/// * [`Error::InvalidSource`] if the URL is not a `github.com` URL.
/// * [`Error::InvalidFormat`] if segments are missing or empty, or if the
///   path tries to walk upwards with `..`.
///
/// # Examples
/// ```
/// use dirgrab::git::resolve;
/// use dirgrab::errors::Error;
///
/// let repo = resolve("github.com/BurntSushi/ripgrep/blob/master/crates/ignore/src/lib.rs").unwrap();
/// assert_eq!(repo.root_path, "crates/ignore/src/lib.rs");
///
/// assert!(matches!(resolve("https://gitlab.com/a/b/tree/main/x"), Err(Error::InvalidSource)));
/// assert!(matches!(resolve("https://github.com/a/b/tree/main"), Err(Error::InvalidFormat)));
/// ```
pub fn resolve(url: &str) -> Result<RepoRef> {
    let rest = strip_github_prefix(url.trim())?;
    // A trailing slash (copied from the browser) does not add a segment.
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    if rest.matches('/').count() < MIN_SEPARATORS {
        return Err(Error::InvalidFormat);
    }

    let segments: Vec<&str> = rest.split('/').collect();
    let (owner, repo, git_ref) = (segments[0], segments[1], segments[3]);
    let path_segments = &segments[4..];

    if owner.is_empty() || repo.is_empty() || git_ref.is_empty() {
        return Err(Error::InvalidFormat);
    }
    if path_segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return Err(Error::InvalidFormat);
    }

    let repo = RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        git_ref: git_ref.to_string(),
        root_path: path_segments.join("/"),
    };
    log::debug!("Resolved '{}' to {}", url, repo);
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(owner: &str, name: &str, git_ref: &str, root_path: &str) -> RepoRef {
        RepoRef {
            owner: owner.to_string(),
            repo: name.to_string(),
            git_ref: git_ref.to_string(),
            root_path: root_path.to_string(),
        }
    }

    #[test]
    fn test_resolve_https_tree_url() {
        let url = "https://github.com/BurntSushi/ripgrep/tree/master/crates/ignore";
        assert_eq!(
            resolve(url).unwrap(),
            repo("BurntSushi", "ripgrep", "master", "crates/ignore")
        );
    }

    #[test]
    fn test_resolve_without_scheme() {
        let url = "github.com/worlpaker/go-syntax/tree/master/src";
        assert_eq!(
            resolve(url).unwrap(),
            repo("worlpaker", "go-syntax", "master", "src")
        );
    }

    #[test]
    fn test_resolve_blob_url_to_single_file() {
        let url = "https://github.com/user/repo/blob/v1.2.0/docs/guide/intro.md";
        assert_eq!(
            resolve(url).unwrap(),
            repo("user", "repo", "v1.2.0", "docs/guide/intro.md")
        );
    }

    #[test]
    fn test_resolve_ignores_marker_segment() {
        // The marker is not validated, only its position matters.
        let url = "https://github.com/user/repo/anything/abc123/dir";
        assert_eq!(resolve(url).unwrap(), repo("user", "repo", "abc123", "dir"));
    }

    #[test]
    fn test_resolve_tolerates_trailing_slash() {
        let url = "https://github.com/user/repo/tree/main/src/";
        assert_eq!(resolve(url).unwrap(), repo("user", "repo", "main", "src"));
    }

    #[test]
    fn test_resolve_rejects_other_hosts() {
        for url in [
            "https://gitlab.com/user/repo/tree/master/dir",
            "http://github.com/user/repo/tree/master/dir",
            "www.github.com/user/repo/tree/master/dir",
            "",
        ] {
            assert!(
                matches!(resolve(url), Err(Error::InvalidSource)),
                "expected InvalidSource for {url:?}"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_missing_segments() {
        for url in [
            "https://github.com/user/repo",
            "https://github.com/user/repo/tree/master",
            "github.com/user/repo/tree/master/",
            "https://github.com/",
        ] {
            assert!(
                matches!(resolve(url), Err(Error::InvalidFormat)),
                "expected InvalidFormat for {url:?}"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_empty_and_traversal_segments() {
        for url in [
            "https://github.com//repo/tree/master/dir",
            "https://github.com/user/repo/tree//dir",
            "https://github.com/user/repo/tree/master/a//b",
            "https://github.com/user/repo/tree/master/../secrets",
            "https://github.com/user/repo/tree/master/a/./b",
        ] {
            assert!(
                matches!(resolve(url), Err(Error::InvalidFormat)),
                "expected InvalidFormat for {url:?}"
            );
        }
    }
}
