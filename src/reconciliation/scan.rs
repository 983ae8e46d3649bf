use super::SyncError;
use crate::utils::{compute_file_hash, file_name_of, has_extension, TaskGroup};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use walkdir::WalkDir;

/// A local file considered for reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub name: String,
    pub path: PathBuf,
    /// Git blob hash of the contents at scan time
    pub hash: String,
}

/// List the files directly inside `dir` carrying `extension`, sorted by name.
pub fn scan_local_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| has_extension(name, extension));

        if matches && entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Hash every matching file in `dir` concurrently.
///
/// All or nothing: if any file cannot be read the whole scan fails, so a
/// plan is never built against a partially hashed directory.
pub async fn hash_local_files(
    dir: &Path,
    extension: &str,
) -> Result<HashMap<String, LocalFile>, SyncError> {
    let paths = scan_local_files(dir, extension)?;
    info!(count = paths.len(), dir = %dir.display(), "Found local files");

    let hashes = Arc::new(Mutex::new(HashMap::with_capacity(paths.len())));
    let mut group: TaskGroup<(), SyncError> = TaskGroup::new();

    for path in paths {
        let Some(name) = file_name_of(&path) else {
            continue;
        };
        let hashes = hashes.clone();

        group.spawn(async move {
            let hash = compute_file_hash(&path)
                .await
                .map_err(|e| SyncError::Hash {
                    path: path.clone(),
                    source: e,
                })?;
            debug!(file = %name, %hash, "Hashed");

            let file = LocalFile {
                name: name.clone(),
                path,
                hash,
            };
            hashes.lock().await.insert(name, file);
            Ok(())
        });
    }

    group.wait().await?;

    let mut hashes = hashes.lock().await;
    Ok(std::mem::take(&mut *hashes))
}
