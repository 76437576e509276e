//! CLI exit code registry.
//!
//! This is the single source of truth for all exit codes. They are part
//! of the shell contract: CI scripts branch on them.
//!
//! | Range | Domain    | Description                         |
//! |-------|-----------|-------------------------------------|
//! | 0     | Universal | Success                             |
//! | 1     | Universal | General error (unspecified)         |
//! | 2     | Universal | Usage error (bad args, no token)    |
//! | 10-19 | publish   | Release publication codes           |

use relpub_engine::{HostError, PublishError};

/// Success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error. Avoid using this; prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error: bad arguments, missing token, empty glob.
pub const EXIT_USAGE: u8 = 2;

/// Auth rejected by the API (401/403).
pub const EXIT_PUBLISH_AUTH: u8 = 10;

/// Network failure talking to the API.
pub const EXIT_PUBLISH_NETWORK: u8 = 11;

/// Release or asset operation rejected by the server for a reason other
/// than "tag already exists".
pub const EXIT_PUBLISH_REJECTED: u8 = 12;

/// A file's upload retry budget was exhausted.
pub const EXIT_PUBLISH_RETRY: u8 = 13;

/// A response body could not be decoded.
pub const EXIT_PUBLISH_PARSE: u8 = 14;

/// Map a fatal publish error to its exit code.
pub fn publish_exit_code(err: &PublishError) -> u8 {
    match err {
        PublishError::RetryExhausted { .. } => EXIT_PUBLISH_RETRY,
        PublishError::Io { .. } => EXIT_ERROR,
        PublishError::Host(host) => match host {
            HostError::Network(_) => EXIT_PUBLISH_NETWORK,
            HostError::Parse(_) => EXIT_PUBLISH_PARSE,
            HostError::Io(_) => EXIT_ERROR,
            HostError::Status { status: 401 | 403, .. } => EXIT_PUBLISH_AUTH,
            HostError::Status { .. } => EXIT_PUBLISH_REJECTED,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_exhaustion_maps_to_retry_code() {
        let err = PublishError::RetryExhausted {
            file: "tool.tar.gz".into(),
            attempts: 5,
        };
        assert_eq!(publish_exit_code(&err), EXIT_PUBLISH_RETRY);
    }

    #[test]
    fn test_auth_statuses_map_to_auth_code() {
        for status in [401, 403] {
            let err = PublishError::Host(HostError::Status {
                status,
                body: "denied".into(),
            });
            assert_eq!(publish_exit_code(&err), EXIT_PUBLISH_AUTH);
        }
    }

    #[test]
    fn test_other_statuses_map_to_rejected() {
        let err = PublishError::Host(HostError::Status {
            status: 422,
            body: "nope".into(),
        });
        assert_eq!(publish_exit_code(&err), EXIT_PUBLISH_REJECTED);
    }

    #[test]
    fn test_network_and_parse_codes() {
        let net = PublishError::Host(HostError::Network("timeout".into()));
        assert_eq!(publish_exit_code(&net), EXIT_PUBLISH_NETWORK);

        let parse = PublishError::Host(HostError::Parse("bad json".into()));
        assert_eq!(publish_exit_code(&parse), EXIT_PUBLISH_PARSE);
    }
}
