//! Per-file reconciliation: converge the remote state to "asset exists
//! with the correct byte size" through a bounded verify/delete/upload
//! loop.
//!
//! The loop never trusts the upload call's own result. Ground truth is
//! re-derived from the remote asset listing on every pass, which makes
//! the loop convergent and safe to resume even if the process died
//! between attempts, at the cost of one extra read per retry.

use std::path::Path;
use std::thread;

use crate::error::PublishError;
use crate::host::ReleaseHost;
use crate::model::{FileOutcome, RemoteAsset, ResolvedRelease, RetryPolicy};
use crate::publish::Progress;

/// States of the per-file loop.
///
/// Transitions:
///   Checking  -> Success | Deleting | Backoff
///   Deleting  -> Backoff             (delete is best-effort cleanup)
///   Backoff   -> Uploading | Fatal   (budget check, then sleep)
///   Uploading -> Checking            (result untrusted either way)
enum State {
    Checking,
    Deleting(RemoteAsset),
    Backoff,
    Uploading,
    Success,
    Fatal,
}

pub(crate) fn reconcile_file<H: ReleaseHost>(
    host: &H,
    release: &ResolvedRelease,
    path: &Path,
    policy: &RetryPolicy,
    progress: Progress,
) -> Result<FileOutcome, PublishError> {
    let name = asset_name(path)?;
    let local_size = std::fs::metadata(path)
        .map_err(|e| PublishError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?
        .len();

    let mut attempts: u32 = 0;
    let mut deletes: u32 = 0;
    let mut state = State::Checking;

    loop {
        state = match state {
            State::Checking => match host.find_asset(&release.tag, &name) {
                Ok(Some(asset)) if asset.size == local_size => State::Success,
                Ok(Some(asset)) => {
                    progress.note(format!(
                        "{name}: remote size {} != local {local_size}, deleting stale asset",
                        asset.size
                    ));
                    State::Deleting(asset)
                }
                Ok(None) => State::Backoff,
                Err(e) => {
                    // Cannot confirm remote state; treat like absence and
                    // let the next verify pass settle it.
                    progress.note(format!("{name}: asset lookup failed ({e}), continuing"));
                    State::Backoff
                }
            },
            State::Deleting(asset) => {
                match host.delete_asset(asset.id) {
                    Ok(()) => deletes += 1,
                    Err(e) => {
                        progress.note(format!(
                            "{name}: failed to delete stale asset, ignoring: {e}"
                        ));
                    }
                }
                State::Backoff
            }
            State::Backoff => {
                if attempts >= policy.limit {
                    State::Fatal
                } else {
                    if let Some(delay) = policy.backoff(attempts) {
                        progress.note(format!(
                            "{name}: retrying in {delay:?} (attempt {}/{})",
                            attempts + 1,
                            policy.limit
                        ));
                        thread::sleep(delay);
                    }
                    State::Uploading
                }
            }
            State::Uploading => {
                progress.note(format!("Uploading {name}..."));
                attempts += 1;
                if let Err(e) = host.upload_asset(&release.upload_base, &name, path) {
                    progress.note(format!("{name}: upload attempt {attempts} failed: {e}"));
                }
                State::Checking
            }
            State::Success => {
                let already_present = attempts == 0;
                if already_present {
                    progress.note(format!(
                        "{name}: already present with correct size, skipping"
                    ));
                }
                return Ok(FileOutcome {
                    name,
                    size: local_size,
                    attempts,
                    deletes,
                    already_present,
                });
            }
            State::Fatal => {
                return Err(PublishError::RetryExhausted {
                    file: name,
                    attempts,
                });
            }
        };
    }
}

fn asset_name(path: &Path) -> Result<String, PublishError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| PublishError::Io {
            path: path.display().to_string(),
            message: "path has no usable file name".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_name_is_base_name() {
        let name = asset_name(Path::new("dist/tool-1.2.0.tar.gz")).unwrap();
        assert_eq!(name, "tool-1.2.0.tar.gz");
    }

    #[test]
    fn test_asset_name_rejects_bare_root() {
        assert!(asset_name(Path::new("/")).is_err());
    }
}
