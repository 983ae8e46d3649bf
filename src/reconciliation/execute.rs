use super::plan::{build_reconciliation_plan, ReconciliationPlan};
use super::scan::hash_local_files;
use super::SyncError;
use crate::config::SyncConfig;
use crate::fetch::fetch_entry;
use crate::manifest::select_entries;
use crate::remote::RemoteSource;
use crate::utils::TaskGroup;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

/// Result of a successful reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationResult {
    pub current: Vec<String>,
    pub fetched: Vec<String>,
    pub deleted: Vec<String>,
}

/// Hash the local directory, fetch the listing and build the plan.
///
/// Nothing on disk is modified.
pub async fn prepare_reconciliation(
    source: &dyn RemoteSource,
    dir: &Path,
    config: &SyncConfig,
) -> Result<ReconciliationPlan, SyncError> {
    let local = hash_local_files(dir, &config.extension).await?;

    let manifest = select_entries(source.fetch_manifest().await?, &config.extension);
    info!(entries = manifest.len(), "Fetched remote listing");

    Ok(build_reconciliation_plan(local, &manifest))
}

/// Carry out a plan: download everything in `needs_fetch` concurrently
/// within `fetch_timeout`, then remove the orphaned files one by one.
///
/// Orphans are only removed once every download has succeeded. There is no
/// rollback; a failure leaves the directory as it was at that point.
pub async fn apply_reconciliation_plan(
    source: Arc<dyn RemoteSource>,
    dir: &Path,
    plan: ReconciliationPlan,
    fetch_timeout: Duration,
) -> Result<ReconciliationResult, SyncError> {
    let mut group: TaskGroup<String, SyncError> = TaskGroup::with_deadline(fetch_timeout);

    for entry in plan.needs_fetch {
        let source = source.clone();
        let dir = dir.to_path_buf();

        group.spawn(async move {
            debug!(file = %entry.name, url = ?entry.download_url, "Fetching");
            fetch_entry(source.as_ref(), &entry, &dir)
                .await
                .map_err(|e| SyncError::Fetch {
                    name: entry.name.clone(),
                    source: e,
                })?;
            info!(file = %entry.name, size = entry.size, "Fetched");
            Ok(entry.name)
        });
    }

    if !group.is_empty() {
        info!(count = group.len(), timeout = ?fetch_timeout, "Fetching files");
    }
    let mut fetched = group.wait().await?;
    fetched.sort();

    let mut deleted = Vec::with_capacity(plan.orphaned.len());
    for orphan in plan.orphaned {
        fs::remove_file(&orphan.path)
            .await
            .map_err(|e| SyncError::Delete {
                path: orphan.path.clone(),
                source: e,
            })?;
        info!(file = %orphan.name, "Removed left-over file");
        deleted.push(orphan.name);
    }

    Ok(ReconciliationResult {
        current: plan.current,
        fetched,
        deleted,
    })
}

/// Run one full reconciliation pass of `dir` against the pinned listing.
pub async fn execute_reconciliation(
    source: Arc<dyn RemoteSource>,
    dir: &Path,
    config: &SyncConfig,
) -> Result<ReconciliationResult, SyncError> {
    let plan = prepare_reconciliation(source.as_ref(), dir, config).await?;

    if plan.is_up_to_date() {
        info!(files = plan.current.len(), "Already up to date");
    }

    let result = apply_reconciliation_plan(source, dir, plan, config.fetch_timeout()).await?;

    info!(
        current = result.current.len(),
        fetched = result.fetched.len(),
        deleted = result.deleted.len(),
        "Reconciliation complete"
    );

    Ok(result)
}
