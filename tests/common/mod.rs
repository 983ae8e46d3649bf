#![allow(dead_code)]

use async_trait::async_trait;
use eeprom_sync::{
    compute_blob_hash, EntryKind, FetchError, Manifest, ManifestError, RemoteEntry,
    RemoteSource, SyncConfig,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Create a temporary directory for a test
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Should create temp dir")
}

pub fn test_config() -> SyncConfig {
    SyncConfig {
        api_base: "https://api.example.invalid".to_string(),
        ..Default::default()
    }
}

pub async fn write_file(dir: &Path, name: &str, content: &[u8]) {
    tokio::fs::write(dir.join(name), content)
        .await
        .expect("Should write file");
}

pub async fn read_file(dir: &Path, name: &str) -> Vec<u8> {
    tokio::fs::read(dir.join(name))
        .await
        .expect("Should read file")
}

/// Sorted names of everything in `dir`, hidden files included
pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Should read dir")
        .map(|e| e.expect("Should read entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// In-memory stand-in for the remote snapshot
#[derive(Default)]
pub struct FakeSource {
    files: BTreeMap<String, Vec<u8>>,
    manifest_status: Option<u16>,
    stall: Option<Duration>,
    truncated: HashSet<String>,
    stalled: HashMap<String, Duration>,
    failing: HashMap<String, u16>,
    downloads: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, content: &[u8]) -> Self {
        self.files.insert(name.to_string(), content.to_vec());
        self
    }

    /// Answer the listing request with a non-success status
    pub fn failing_manifest(mut self, status: u16) -> Self {
        self.manifest_status = Some(status);
        self
    }

    /// Hold every download open for `duration` before sending any bytes
    pub fn stalling(mut self, duration: Duration) -> Self {
        self.stall = Some(duration);
        self
    }

    /// Hold only the download of `name` open for `duration`
    pub fn stalling_file(mut self, name: &str, duration: Duration) -> Self {
        self.stalled.insert(name.to_string(), duration);
        self
    }

    /// Answer the download of `name` with a non-success status
    pub fn failing_download(mut self, name: &str, status: u16) -> Self {
        self.failing.insert(name.to_string(), status);
        self
    }

    /// Cut the download of `name` off half way
    pub fn truncating(mut self, name: &str) -> Self {
        self.truncated.insert(name.to_string());
        self
    }

    pub fn entry(&self, name: &str) -> RemoteEntry {
        let content = &self.files[name];
        RemoteEntry {
            name: name.to_string(),
            sha: compute_blob_hash(content),
            size: content.len() as u64,
            download_url: Some(format!("https://raw.example.invalid/{name}")),
            kind: EntryKind::File,
        }
    }

    /// Names requested so far, sorted
    pub fn downloads(&self) -> Vec<String> {
        let mut downloads = self.downloads.lock().unwrap().clone();
        downloads.sort();
        downloads
    }
}

#[async_trait]
impl RemoteSource for FakeSource {
    async fn fetch_manifest(&self) -> Result<Manifest, ManifestError> {
        if let Some(status) = self.manifest_status {
            return Err(ManifestError::UnexpectedStatus {
                status,
                body: r#"{"message": "API rate limit exceeded"}"#.to_string(),
            });
        }
        Ok(self
            .files
            .keys()
            .map(|name| (name.clone(), self.entry(name)))
            .collect())
    }

    async fn download(
        &self,
        entry: &RemoteEntry,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64, FetchError> {
        self.downloads.lock().unwrap().push(entry.name.clone());

        if let Some(&status) = self.failing.get(&entry.name) {
            return Err(FetchError::UnexpectedStatus {
                status,
                body: "Server Error".to_string(),
            });
        }

        if let Some(stall) = self.stalled.get(&entry.name).copied().or(self.stall) {
            tokio::time::sleep(stall).await;
        }

        let content = self
            .files
            .get(&entry.name)
            .ok_or_else(|| FetchError::UnexpectedStatus {
                status: 404,
                body: "Not Found".to_string(),
            })?;
        let content = if self.truncated.contains(&entry.name) {
            &content[..content.len() / 2]
        } else {
            &content[..]
        };

        sink.write_all(content).await?;
        Ok(content.len() as u64)
    }
}
