mod execute;
mod plan;
mod scan;

pub use execute::{
    apply_reconciliation_plan, execute_reconciliation, prepare_reconciliation,
    ReconciliationResult,
};
pub use plan::{build_reconciliation_plan, ReconciliationPlan};
pub use scan::{hash_local_files, scan_local_files, LocalFile};

use crate::fetch::FetchError;
use crate::manifest::ManifestError;
use crate::utils::GroupError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to scan local directory: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Failed to hash {}: {}", .path.display(), .source)]
    Hash {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to fetch listing: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Failed to fetch {name}: {source}")]
    Fetch { name: String, source: FetchError },

    #[error("Downloads did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Removing left-over file {}: {}", .path.display(), .source)]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Task did not complete: {0}")]
    Task(JoinError),
}

/// Coarse classification of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    /// Transport failure, or a download answered with a non-success status
    Network,
    /// The remote answered with something other than the expected listing or blob
    Protocol,
    Filesystem,
    DeadlineExceeded,
    /// A task panicked
    Internal,
}

impl SyncError {
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::Scan(_) | SyncError::Hash { .. } | SyncError::Delete { .. } => {
                SyncErrorKind::Filesystem
            }
            SyncError::Manifest(ManifestError::Network(_)) => SyncErrorKind::Network,
            SyncError::Manifest(_) => SyncErrorKind::Protocol,
            SyncError::Fetch { source, .. } => match source {
                FetchError::Network(_) | FetchError::UnexpectedStatus { .. } => {
                    SyncErrorKind::Network
                }
                FetchError::IoError(_) => SyncErrorKind::Filesystem,
                FetchError::NotDownloadable(_)
                | FetchError::InvalidName(_)
                | FetchError::SizeMismatch { .. }
                | FetchError::HashMismatch { .. } => SyncErrorKind::Protocol,
            },
            SyncError::DeadlineExceeded(_) => SyncErrorKind::DeadlineExceeded,
            SyncError::Task(_) => SyncErrorKind::Internal,
        }
    }
}

impl From<GroupError> for SyncError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::DeadlineExceeded(timeout) => SyncError::DeadlineExceeded(timeout),
            GroupError::Join(e) => SyncError::Task(e),
        }
    }
}
