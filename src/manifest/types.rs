use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Remote listing keyed by file name
pub type Manifest = HashMap<String, RemoteEntry>;

/// One entry of the remote directory listing at the pinned reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteEntry {
    pub name: String,
    /// Git blob hash of the file contents
    pub sha: String,
    pub size: u64,
    /// `None` for directories and submodules
    pub download_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    File,
    Dir,
    Symlink,
    Submodule,
}

impl RemoteEntry {
    /// Whether this entry is a regular file that can be downloaded
    pub fn is_downloadable(&self) -> bool {
        self.kind == EntryKind::File && self.download_url.is_some()
    }
}
