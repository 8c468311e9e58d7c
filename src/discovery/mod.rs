//! File discovery: recursive directory traversal with glob filtering.
//!
//! Discovery walks the tree rooted at the configured source directory and
//! collects every regular file whose base name matches a shell-style glob
//! (`*`, `?`, `[...]`). Directories are traversed but never emitted;
//! symlinks are neither followed nor emitted. The first unreadable entry or
//! a malformed pattern aborts the whole discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use log::debug;
use walkdir::WalkDir;

/// Walk `root` recursively and return every regular file whose base name
/// matches `pattern`.
///
/// Returns an empty vector (not an error) when nothing matches. No ordering
/// is guaranteed; callers must not rely on the order of the returned paths.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern)
        .context(format!("Invalid glob pattern: {}", pattern))?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.context(format!(
            "Failed to read directory entry under {}",
            root.display()
        ))?;

        // Symlinks are skipped along with every other non-regular entry.
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if matcher.matches(&name) {
            files.push(entry.into_path());
        }
    }

    debug!(
        "Discovered {} files under {} matching '{}'",
        files.len(),
        root.display(),
        pattern
    );

    Ok(files)
}
