use super::scan::LocalFile;
use crate::manifest::{Manifest, RemoteEntry};
use std::collections::HashMap;
use tracing::info;

/// The reconciliation plan
#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    /// Files whose local hash already matches the listing
    pub current: Vec<String>,

    /// Remote entries that are missing locally or differ from the local copy
    pub needs_fetch: Vec<RemoteEntry>,

    /// Local files that are not part of the listing
    pub orphaned: Vec<LocalFile>,
}

impl ReconciliationPlan {
    /// Check if the directory already matches the listing
    pub fn is_up_to_date(&self) -> bool {
        self.needs_fetch.is_empty() && self.orphaned.is_empty()
    }
}

/// Partition local and remote names into current, needs-fetch and orphaned.
///
/// Every remote name consumes its local counterpart, whether or not the
/// hashes match; whatever is left of `local` afterwards is orphaned.
pub fn build_reconciliation_plan(
    mut local: HashMap<String, LocalFile>,
    remote: &Manifest,
) -> ReconciliationPlan {
    let mut plan = ReconciliationPlan::default();

    let mut names: Vec<&String> = remote.keys().collect();
    names.sort();

    for name in names {
        let entry = &remote[name];
        match local.remove(name) {
            Some(file) if file.hash == entry.sha => plan.current.push(name.clone()),
            existing => {
                info!(
                    file = %name,
                    local = existing.as_ref().map(|f| f.hash.as_str()).unwrap_or(""),
                    remote = %entry.sha,
                    "Scheduling fetch"
                );
                plan.needs_fetch.push(entry.clone());
            }
        }
    }

    plan.orphaned = local.into_values().collect();
    plan.orphaned.sort_by(|a, b| a.name.cmp(&b.name));

    plan
}
