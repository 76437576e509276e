//! `relpub-engine` - release publication and asset reconciliation engine.
//!
//! Pure engine crate: receives a release spec and a file list, drives a
//! `ReleaseHost` implementation until every file is a verified,
//! correctly-sized asset on the remote release. No HTTP or CLI
//! dependencies; the host seam keeps the engine testable with an
//! in-memory mock.

pub mod error;
pub mod host;
pub mod model;
pub mod publish;
pub mod reconcile;

pub use error::PublishError;
pub use host::{HostError, ReleaseHost};
pub use model::{
    FileOutcome, PublishSummary, ReleaseSpec, RemoteAsset, ResolvedRelease, RetryPolicy,
};
pub use publish::{publish, Progress};
