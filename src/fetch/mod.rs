use crate::manifest::RemoteEntry;
use crate::remote::RemoteSource;
use crate::utils::compute_file_hash;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status code: got {status}, want 200 (body: {body})")]
    UnexpectedStatus { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0} has no download location")]
    NotDownloadable(String),

    #[error("Invalid file name in listing: {0:?}")]
    InvalidName(String),

    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}

/// Resolve the local path for a remote entry, rejecting names that would
/// escape `dir`.
pub fn target_path(dir: &Path, name: &str) -> Result<PathBuf, FetchError> {
    let plain = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if !plain || name == "." || name == ".." {
        return Err(FetchError::InvalidName(name.to_string()));
    }
    Ok(dir.join(name))
}

/// Download `entry` into `dir`, replacing any existing file of the same name.
///
/// Bytes are streamed into a hidden temporary file next to the target. The
/// target is only replaced (by rename) once the download has the advertised
/// size and blob hash. If this future fails or is dropped part way, the
/// temporary file is removed and the existing file is left untouched.
///
/// There is no separate cancellation token: the caller cancels a fetch by
/// dropping (or aborting the task running) this future, which stops it at
/// its next await point.
pub async fn fetch_entry(
    source: &dyn RemoteSource,
    entry: &RemoteEntry,
    dir: &Path,
) -> Result<PathBuf, FetchError> {
    let target = target_path(dir, &entry.name)?;

    let partial = tempfile::Builder::new()
        .prefix(".")
        .suffix(".partial")
        .tempfile_in(dir)?;

    let mut file = fs::File::from_std(partial.reopen()?);
    let written = source.download(entry, &mut file).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    if written != entry.size {
        return Err(FetchError::SizeMismatch {
            expected: entry.size,
            actual: written,
        });
    }

    let actual = compute_file_hash(partial.path()).await?;
    if actual != entry.sha {
        return Err(FetchError::HashMismatch {
            expected: entry.sha.clone(),
            actual,
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(partial.path(), std::fs::Permissions::from_mode(0o644)).await?;
    }

    partial.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path_accepts_plain_names() {
        let dir = Path::new("/var/lib/eeprom");
        assert_eq!(
            target_path(dir, "recovery.bin").unwrap(),
            dir.join("recovery.bin")
        );
    }

    #[test]
    fn test_target_path_rejects_traversal() {
        let dir = Path::new("/var/lib/eeprom");
        for name in ["../escape.bin", "sub/dir.bin", "/etc/passwd", "..", ".", ""] {
            assert!(
                matches!(target_path(dir, name), Err(FetchError::InvalidName(_))),
                "{name} should be rejected"
            );
        }
    }
}
