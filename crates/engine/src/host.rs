use std::fmt;
use std::path::Path;

use crate::model::{ReleaseSpec, RemoteAsset, ResolvedRelease};

/// Failure of a single remote call.
///
/// HTTP failures keep the raw status code and response body so callers
/// can branch on the status class (5xx vs 4xx) or inspect the body
/// without re-parsing anything.
#[derive(Debug, Clone)]
pub enum HostError {
    /// Connection, TLS, or timeout failure before any status was received.
    Network(String),
    /// Non-success HTTP status; `body` is the raw response payload.
    Status { status: u16, body: String },
    /// Response body could not be decoded.
    Parse(String),
    /// Local file error while preparing a request body.
    Io(String),
}

impl HostError {
    /// Server-side (5xx) failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, HostError::Status { status, .. } if (500..600).contains(status))
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Network(msg) => write!(f, "network error: {msg}"),
            HostError::Status { status, body } => {
                write!(f, "HTTP {status}: {}", body.trim())
            }
            HostError::Parse(msg) => write!(f, "parse error: {msg}"),
            HostError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// The remote release service, as seen by the engine.
///
/// One implementation talks to the real API; tests use an in-memory
/// host. Every method is a single remote operation with no retry of its
/// own; the reconciliation loop owns all retry policy.
pub trait ReleaseHost {
    /// Create the release, or adopt the existing one keyed by the same
    /// tag. Any creation failure that is not a tag conflict is fatal.
    fn ensure_release(&self, spec: &ReleaseSpec) -> Result<ResolvedRelease, HostError>;

    /// Authoritative asset lookup: fetch the release fresh and scan its
    /// asset list for an exact name match. Absence is `Ok(None)`, never
    /// an error.
    fn find_asset(&self, tag: &str, name: &str) -> Result<Option<RemoteAsset>, HostError>;

    /// Delete one asset by id.
    fn delete_asset(&self, asset_id: u64) -> Result<(), HostError>;

    /// Stream a local file to the release under `name`, declaring the
    /// exact byte length as content length.
    fn upload_asset(&self, upload_base: &str, name: &str, file: &Path) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_classification() {
        let err = HostError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(err.is_server_error());

        let err = HostError::Status {
            status: 422,
            body: "unprocessable".into(),
        };
        assert!(!err.is_server_error());

        assert!(!HostError::Network("timeout".into()).is_server_error());
    }

    #[test]
    fn test_status_display_keeps_code_and_body() {
        let err = HostError::Status {
            status: 404,
            body: "{\"message\":\"Not Found\"}\n".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("Not Found"));
    }
}
