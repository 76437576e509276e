use std::fmt;

use crate::host::HostError;

/// Fatal publication failure.
///
/// Transient remote failures (network errors, 5xx, delete failures) are
/// retried inside the reconciliation loop and never surface here; what
/// does surface halts the whole run.
#[derive(Debug)]
pub enum PublishError {
    /// Release resolution or another unrecoverable remote call failed.
    Host(HostError),
    /// A file's retry budget ran out without a verified upload.
    RetryExhausted { file: String, attempts: u32 },
    /// Local file could not be read. Uploading a file we cannot stat is
    /// meaningless, so this is fatal rather than retried.
    Io { path: String, message: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Host(e) => write!(f, "{e}"),
            PublishError::RetryExhausted { file, attempts } => {
                write!(f, "retry limit of {attempts} reached for {file}")
            }
            PublishError::Io { path, message } => write!(f, "{path}: {message}"),
        }
    }
}

impl std::error::Error for PublishError {}

impl From<HostError> for PublishError {
    fn from(err: HostError) -> Self {
        PublishError::Host(err)
    }
}
