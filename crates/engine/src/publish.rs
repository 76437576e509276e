//! Publication orchestrator.
//!
//! Resolves the release once, then reconciles each file strictly in
//! input order, short-circuiting on the first fatal error. A
//! half-published release is unsafe to leave silently incomplete, so
//! there is no partial-success continuation across files. All retry
//! lives one level down in the reconciliation loop.

use std::path::PathBuf;

use crate::error::PublishError;
use crate::host::ReleaseHost;
use crate::model::{PublishSummary, ReleaseSpec, RetryPolicy};
use crate::reconcile::reconcile_file;

/// Where per-file and per-attempt progress lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Stderr,
    Silent,
}

impl Progress {
    pub(crate) fn note(&self, msg: impl AsRef<str>) {
        if matches!(self, Progress::Stderr) {
            eprintln!("{}", msg.as_ref());
        }
    }
}

/// Publish `spec` and drive every file in `files` to a verified asset.
pub fn publish<H: ReleaseHost>(
    host: &H,
    spec: &ReleaseSpec,
    files: &[PathBuf],
    policy: &RetryPolicy,
    progress: Progress,
) -> Result<PublishSummary, PublishError> {
    let release = host.ensure_release(spec)?;
    if release.adopted {
        progress.note(format!(
            "Release {} already exists, attaching assets to it",
            release.tag
        ));
    }
    progress.note(format!("Release {} ready (id {})", release.tag, release.id));

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        outcomes.push(reconcile_file(host, &release, file, policy, progress)?);
    }

    Ok(PublishSummary {
        tag: release.tag,
        release_id: release.id,
        files: outcomes,
    })
}
