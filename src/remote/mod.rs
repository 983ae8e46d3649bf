//! Remote collaborators: the directory listing and the file download
//! endpoints of the pinned snapshot.

mod github;

pub use github::GithubSource;

use crate::fetch::FetchError;
use crate::manifest::{Manifest, ManifestError, RemoteEntry};
use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Source of the pinned remote snapshot.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the complete listing of the configured directory.
    async fn fetch_manifest(&self) -> Result<Manifest, ManifestError>;

    /// Stream the raw bytes of `entry` into `sink`, returning the number of
    /// bytes written.
    async fn download(
        &self,
        entry: &RemoteEntry,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64, FetchError>;
}
