use std::time::Duration;

use serde::Serialize;

/// Desired release, provided once per run.
#[derive(Debug, Clone)]
pub struct ReleaseSpec {
    /// Tag name; also used as the release's display name.
    pub tag: String,
    /// Branch or commit the tag is created from if it does not exist yet.
    pub target: String,
    /// Free-text release body.
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// A release as resolved on the remote side.
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    pub id: u64,
    pub tag: String,
    /// Upload base URL with the `{?name,label}` template segment already
    /// stripped by the resolver.
    pub upload_base: String,
    /// True when the tag was already released and the existing release
    /// was adopted instead of created.
    pub adopted: bool,
}

/// One asset attached to a release. Identity is by name within the release;
/// the remote service is the sole source of truth for this data.
#[derive(Debug, Clone)]
pub struct RemoteAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    /// Remote-reported state ("uploaded", "errored", ...). Informational only.
    pub state: String,
}

/// Retry budget and backoff base for a single file's reconciliation.
///
/// The base is configurable so tests can run with millisecond backoff;
/// production uses the defaults.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub limit: u32,
    pub base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: 5,
            base: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the next upload once `completed` attempts have been
    /// made: nothing before the first attempt, then base, 2x, 4x, 8x, ...
    pub fn backoff(&self, completed: u32) -> Option<Duration> {
        if completed == 0 {
            None
        } else {
            Some(self.base * 2u32.saturating_pow(completed - 1))
        }
    }
}

/// Per-file reconciliation report.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub name: String,
    pub size: u64,
    /// Upload attempts performed (0 when the asset was already correct).
    pub attempts: u32,
    /// Stale assets deleted along the way.
    pub deletes: u32,
    /// True when the first verify step found a correct asset, meaning the
    /// run made no mutating calls for this file.
    pub already_present: bool,
}

/// Terminal report for a whole publication run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishSummary {
    pub tag: String,
    pub release_id: u64,
    pub files: Vec<FileOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_none_before_first_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), None);
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            limit: 5,
            base: Duration::from_secs(1),
        };
        let delays: Vec<Duration> = (1..5).map(|n| policy.backoff(n).unwrap()).collect();
        assert_eq!(delays[0], Duration::from_secs(1));
        for pair in delays.windows(2) {
            assert_eq!(pair[1], pair[0] * 2);
        }
    }

    #[test]
    fn test_backoff_respects_custom_base() {
        let policy = RetryPolicy {
            limit: 3,
            base: Duration::from_millis(10),
        };
        assert_eq!(policy.backoff(1), Some(Duration::from_millis(10)));
        assert_eq!(policy.backoff(2), Some(Duration::from_millis(20)));
        assert_eq!(policy.backoff(3), Some(Duration::from_millis(40)));
    }
}
