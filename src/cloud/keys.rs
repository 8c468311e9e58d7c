//! Object-key derivation.
//!
//! Every uploaded file's key is its path relative to the source root,
//! normalized to forward slashes and joined under the configured prefix.
//! Two distinct files under the same root always derive distinct keys.

use std::path::Path;

/// Derive the destination object key for `path` relative to `root`.
///
/// Path separators are normalized to `/` regardless of platform. A trailing
/// slash on `prefix` is tolerated; an empty prefix yields the bare relative
/// path. Paths discovered under `root` always produce a key; a path outside
/// `root` falls back to its own components rather than failing.
pub fn derive_key(root: &Path, prefix: &str, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let slash_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        slash_path
    } else {
        format!("{}/{}", prefix, slash_path)
    }
}
