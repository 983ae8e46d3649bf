pub mod config;
pub mod fetch;
pub mod manifest;
pub mod reconciliation;
pub mod remote;
pub mod utils;

// Re-export commonly used types
pub use config::{read_config, ConfigError, Credentials, SyncConfig};
pub use fetch::{fetch_entry, FetchError};
pub use manifest::{parse_listing, EntryKind, Manifest, ManifestError, RemoteEntry};
pub use reconciliation::{
    apply_reconciliation_plan, build_reconciliation_plan, execute_reconciliation,
    hash_local_files, prepare_reconciliation, LocalFile, ReconciliationPlan,
    ReconciliationResult, SyncError, SyncErrorKind,
};
pub use remote::{GithubSource, RemoteSource};
pub use utils::{compute_blob_hash, compute_file_hash, GroupError, TaskGroup};
