// src/git/api.rs
//! Talks to the GitHub REST API.

use super::client::RemoteClient;
use crate::constants::GITHUB_ACCEPT;
use crate::core_types::{ByteStream, Listing, ListingEntry, RateLimit, RepoRef, UserIdentity};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, UNIX_EPOCH};
use url::Url;

/// Represents a file or directory item from the GitHub Contents API.
#[derive(Deserialize, Debug)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    item_type: String,
    download_url: Option<String>,
}

impl ContentItem {
    fn into_file_entry(self) -> ListingEntry {
        ListingEntry::File {
            path: self.path,
            // An empty URL is reported by the engine as an invalid entry.
            download_url: self.download_url.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct RateLimitResponse {
    resources: RateLimitResources,
}

#[derive(Deserialize, Debug)]
struct RateLimitResources {
    core: CoreRateLimit,
}

#[derive(Deserialize, Debug)]
struct CoreRateLimit {
    limit: u64,
    remaining: u64,
    reset: u64,
}

#[derive(Deserialize, Debug)]
struct UserResponse {
    login: String,
}

/// A [`RemoteClient`] backed by the GitHub REST API.
///
/// The token, if any, is passed in explicitly and sent as a bearer token with
/// every request, including raw file downloads (needed for private repositories).
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
}

impl GitHubClient {
    /// Builds a client for the API at `api_url` (e.g. `https://api.github.com`).
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the URL cannot be parsed, the token is not a
    /// valid header value, or the HTTP client cannot be built.
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self> {
        let api_base = Url::parse(api_url)
            .map_err(|e| Error::Config(format!("invalid API url '{}': {}", api_url, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid API url '{}'", api_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("dirgrab/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::Config("token contains invalid characters".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            log::debug!("Using token for authentication.");
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, api_base })
    }

    /// Appends percent-encoded path segments to the API base URL.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn contents_url(&self, repo: &RepoRef, path: &str) -> Url {
        let fixed = ["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"];
        let rest = path.split('/').filter(|s| !s.is_empty());
        let mut url = self.endpoint(fixed.into_iter().chain(rest));
        url.query_pairs_mut().append_pair("ref", &repo.git_ref);
        url
    }

    async fn get(&self, url: &str) -> std::result::Result<Response, reqwest::Error> {
        self.http.get(url).send().await?.error_for_status()
    }
}

/// Turns a Contents API payload into a [`Listing`].
///
/// The API returns a single object if the path is a file, or an array for a
/// directory. Symlinks and submodules inside a directory are skipped.
fn parse_listing(path: &str, json_value: Value) -> Result<Listing> {
    let unavailable = |reason: String| Error::ContentsUnavailable {
        path: path.to_string(),
        reason,
    };

    match json_value {
        Value::Array(_) => {
            let items: Vec<ContentItem> =
                serde_json::from_value(json_value).map_err(|e| unavailable(e.to_string()))?;
            let entries = items
                .into_iter()
                .filter_map(|item| match item.item_type.as_str() {
                    "file" => Some(item.into_file_entry()),
                    "dir" => Some(ListingEntry::Directory { path: item.path }),
                    other => {
                        log::warn!("Skipping '{}' of unsupported type '{}'", item.path, other);
                        None
                    }
                })
                .collect();
            Ok(Listing::Directory(entries))
        }
        Value::Object(_) => {
            let item: ContentItem =
                serde_json::from_value(json_value).map_err(|e| unavailable(e.to_string()))?;
            match item.item_type.as_str() {
                "file" | "symlink" => Ok(Listing::File {
                    path: item.path,
                    download_url: item.download_url.unwrap_or_default(),
                }),
                other => Err(unavailable(format!("unsupported content type '{}'", other))),
            }
        }
        _ => Err(unavailable("unexpected response payload".to_string())),
    }
}

#[async_trait]
impl RemoteClient for GitHubClient {
    async fn list_path(&self, repo: &RepoRef, path: &str) -> Result<Listing> {
        let url = self.contents_url(repo, path);
        log::debug!("Fetching directory contents from: {}", url);

        let unavailable = |e: reqwest::Error| Error::ContentsUnavailable {
            path: path.to_string(),
            reason: e.to_string(),
        };
        let response = self.get(url.as_str()).await.map_err(unavailable)?;
        let json_value: Value = response.json().await.map_err(unavailable)?;
        parse_listing(path, json_value)
    }

    async fn fetch(&self, download_url: &str) -> Result<ByteStream> {
        log::debug!("Downloading file from: {}", download_url);
        let response = self
            .get(download_url)
            .await
            .map_err(|e| Error::FetchFailed {
                url: download_url.to_string(),
                reason: e.to_string(),
            })?;

        let url = download_url.to_string();
        let stream = response.bytes_stream().map(move |chunk| {
            chunk.map(|bytes| bytes.to_vec()).map_err(|e| Error::FetchFailed {
                url: url.clone(),
                reason: e.to_string(),
            })
        });
        Ok(stream.boxed())
    }

    async fn rate_limit(&self) -> Result<RateLimit> {
        let url = self.endpoint(["rate_limit"]);
        let unavailable = |e: reqwest::Error| Error::RateLimitUnavailable(e.to_string());

        let response = self.get(url.as_str()).await.map_err(unavailable)?;
        let body: RateLimitResponse = response.json().await.map_err(unavailable)?;
        let core = body.resources.core;
        Ok(RateLimit {
            limit: core.limit,
            remaining: core.remaining,
            reset: UNIX_EPOCH + Duration::from_secs(core.reset),
        })
    }

    async fn authenticated_user(&self) -> Result<UserIdentity> {
        let url = self.endpoint(["user"]);
        let unavailable = |e: reqwest::Error| Error::AuthUnavailable(e.to_string());

        let response = self.get(url.as_str()).await.map_err(unavailable)?;
        let body: UserResponse = response.json().await.map_err(unavailable)?;
        Ok(UserIdentity { login: body.login })
    }
}
