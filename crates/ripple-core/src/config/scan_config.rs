//! Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_FILE_SIZE, DEFAULT_SKIP_DIRS};

/// Configuration for the repository walker.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum file size in bytes. Default: 1MB.
    pub max_file_size: Option<u64>,
    /// Directory names skipped in addition to the built-in list.
    #[serde(default)]
    pub extra_skip_dirs: Vec<String>,
    /// Follow symbolic links. Default: false.
    pub follow_symlinks: Option<bool>,
}

impl ScanConfig {
    /// Returns the effective max file size, defaulting to 1MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    /// Built-in skip list followed by the configured extras.
    pub fn skip_dirs(&self) -> Vec<String> {
        DEFAULT_SKIP_DIRS
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_skip_dirs.iter().cloned())
            .collect()
    }
}
