// src/git/mod.rs
//! Everything that deals with the remote repository.
//!
//! This module provides functionality to:
//! - Parse GitHub file/folder URLs into a [`RepoRef`](crate::core_types::RepoRef).
//! - Define the [`RemoteClient`] seam used by the download engine.
//! - Talk to the GitHub REST API with `reqwest` ([`GitHubClient`]).
//! - Serve a repository tree from memory ([`MemoryClient`]).

// Declare the sub-modules.
mod api;
mod client;
mod memory;
mod url;

// Re-export the public-facing API.
pub use api::GitHubClient;
pub use client::RemoteClient;
pub use memory::MemoryClient;
pub use url::resolve;
