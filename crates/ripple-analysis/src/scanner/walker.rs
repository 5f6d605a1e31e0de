//! Deterministic source file walker built on `ignore`.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ripple_core::config::ScanConfig;
use ripple_core::errors::ScanError;

use super::language_detect::Language;

/// A source file selected for parsing.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the walk root, `/`-separated.
    pub relative: String,
    pub language: Language,
    pub size: u64,
}

impl ScannedFile {
    /// Read the file as UTF-8, replacing invalid sequences.
    pub fn read_source(&self) -> Result<String, ScanError> {
        let bytes = std::fs::read(&self.path).map_err(|source| ScanError::IoError {
            path: self.path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Walks a repository root, yielding parseable source files in a stable order.
pub struct Walker {
    skip_dirs: Vec<String>,
    max_file_size: u64,
    follow_symlinks: bool,
}

impl Walker {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            skip_dirs: config.skip_dirs(),
            max_file_size: config.effective_max_file_size(),
            follow_symlinks: config.effective_follow_symlinks(),
        }
    }

    /// Collect every source file under `root`.
    ///
    /// A missing root yields no files. Unreadable entries and oversized files
    /// are skipped and logged; the walk itself never fails.
    pub fn collect(&self, root: &Path) -> Vec<ScannedFile> {
        if !root.exists() {
            tracing::warn!(root = %root.display(), "repository root does not exist");
            return Vec::new();
        }

        let skip_dirs = self.skip_dirs.clone();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !is_skipped_dir(&name, &skip_dirs)
            });

        let mut files = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let err = ScanError::WalkError {
                        root: root.to_path_buf(),
                        message: err.to_string(),
                    };
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let Some(language) = Language::from_path(path) else {
                continue;
            };
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "no metadata");
                    continue;
                }
            };
            if size > self.max_file_size {
                let err = ScanError::MaxFileSizeExceeded {
                    path: path.to_path_buf(),
                    size,
                    max: self.max_file_size,
                };
                tracing::debug!(error = %err, "skipping file");
                continue;
            }
            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative: relative_path(root, path),
                language,
                size,
            });
        }

        tracing::debug!(root = %root.display(), files = files.len(), "walk complete");
        files
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

fn is_skipped_dir(name: &str, skip_dirs: &[String]) -> bool {
    name.ends_with(".egg-info") || skip_dirs.iter().any(|d| d == name)
}

/// Root-relative path with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
