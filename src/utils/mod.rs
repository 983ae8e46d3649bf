mod group;
mod hash;

pub use group::{GroupError, TaskGroup};
pub use hash::{compute_blob_hash, compute_file_hash};

use std::path::Path;

/// Default directory listing endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Media type asking the contents API for raw file bytes
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// User agent sent with every request (the API rejects anonymous agents)
pub const USER_AGENT: &str = concat!("eeprom-sync/", env!("CARGO_PKG_VERSION"));

/// Returns the final path component as a string, if it is valid UTF-8
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

/// Check whether a file name carries the given extension (without the dot)
pub fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
}
