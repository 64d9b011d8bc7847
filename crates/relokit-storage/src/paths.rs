//! Shared path joining for storage backends and public locations.
//!
//! Every place that combines a storage directory with a file name uses this
//! helper, so relocation, deletion, presence checks and public locations
//! all address the same artifact the same way.

/// Join a directory (or URL prefix) and a file name with exactly one `/`.
pub fn join(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
