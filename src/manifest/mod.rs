mod types;

pub use types::{EntryKind, Manifest, RemoteEntry};

use crate::config::SyncConfig;
use crate::utils::has_extension;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status code: got {status}, want 200 (body: {body})")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to parse listing: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build the contents API URL for the configured directory at the pinned reference
pub fn contents_url(config: &SyncConfig) -> String {
    format!(
        "{}/repos/{}/contents/{}?ref={}",
        config.api_base.trim_end_matches('/'),
        config.repository,
        config.path.trim_matches('/'),
        config.reference
    )
}

/// Parse a contents API response body into a manifest keyed by file name.
///
/// A body that is not a JSON array of listing entries (for example the
/// single-object response returned when the path names a file) is a
/// parse error.
pub fn parse_listing(body: &[u8]) -> Result<Manifest, ManifestError> {
    let entries: Vec<RemoteEntry> = serde_json::from_slice(body)?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.name.clone(), entry))
        .collect())
}

/// Restrict a manifest to downloadable files carrying `extension`.
///
/// Only these names are ever seen by the local scan, so anything else in the
/// listing can never be reconciled.
pub fn select_entries(manifest: Manifest, extension: &str) -> Manifest {
    manifest
        .into_iter()
        .filter(|(name, entry)| {
            let keep = entry.is_downloadable() && has_extension(name, extension);
            if !keep {
                debug!(file = %name, kind = ?entry.kind, "Ignoring remote entry");
            }
            keep
        })
        .collect()
}
