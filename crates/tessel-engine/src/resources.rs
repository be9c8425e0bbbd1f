//! Resource loading
//!
//! External stylesheets and scripts are read through a [`FileProvider`] so
//! hosts can serve them from disk, an archive or memory.

use std::collections::HashMap;
use std::path::Path;

/// Source of external resource text
pub trait FileProvider {
    /// Contents of `path`, or `None` if it does not exist
    fn read(&self, path: &str) -> Option<String>;
}

/// Reads from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileProvider;

impl FileProvider for FsFileProvider {
    fn read(&self, path: &str) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::trace!(path, error = %e, "read failed");
                None
            }
        }
    }
}

/// In-memory files keyed by resolved path
#[derive(Debug, Default, Clone)]
pub struct MemoryFileProvider {
    files: HashMap<String, String>,
}

impl MemoryFileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, contents: &str) {
        self.files.insert(collapse_slashes(path), contents.to_string());
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.insert(path, contents);
        self
    }
}

impl FileProvider for MemoryFileProvider {
    fn read(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

/// Resolve a resource reference against `base`.
///
/// Absolute paths pass through. Leading `./` segments are dropped and runs
/// of `/` collapse to one.
pub fn resolve_path(base: &str, path: &str) -> String {
    if path.starts_with('/') || Path::new(path).is_absolute() {
        return collapse_slashes(path);
    }

    let mut relative = path;
    while let Some(rest) = relative.strip_prefix("./") {
        relative = rest.trim_start_matches('/');
    }

    let joined = match base.trim_end_matches('/') {
        "" if base.starts_with('/') => format!("/{relative}"),
        "" | "." => relative.to_string(),
        base => format!("{base}/{relative}"),
    };
    collapse_slashes(&joined)
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path("assets", "./style.css"), "assets/style.css");
        assert_eq!(resolve_path("assets/", "css//main.css"), "assets/css/main.css");
        assert_eq!(resolve_path("assets", "/abs//x.js"), "/abs/x.js");
        assert_eq!(resolve_path(".", "././a.js"), "a.js");
        assert_eq!(resolve_path("", "a.js"), "a.js");
    }

    #[test]
    fn test_memory_provider() {
        let files = MemoryFileProvider::new().with_file("a//b.css", "p {}");
        assert_eq!(files.read("a/b.css").as_deref(), Some("p {}"));
        assert_eq!(files.read("missing.css"), None);
    }

    #[test]
    fn test_fs_provider_missing() {
        assert_eq!(FsFileProvider.read("/definitely/not/here.css"), None);
    }
}
