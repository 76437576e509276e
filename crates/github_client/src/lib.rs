//! GitHub release API client - the `ReleaseHost` implementation that
//! talks to a real service.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the full
//! publish surface: create release, adopt an existing tag, fetch by tag,
//! delete asset, upload asset with a declared content length.

mod client;
mod wire;

pub use client::{is_tag_conflict, ClientConfig, GithubClient, DEFAULT_API_BASE};
pub use wire::{ReleasePayload, WireAsset, WireRelease};
