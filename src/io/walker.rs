use crate::io::normalize_path;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursive header discovery over one or more source roots.
pub struct HeaderWalker {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl HeaderWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            extensions: vec!["h".to_string(), "hpp".to_string()],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Every matching regular file under the roots, absolute, sorted and
    /// without duplicates from overlapping roots. Unreadable entries are
    /// logged and skipped.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                warn!(root = %root.display(), "Source directory does not exist, skipping");
                continue;
            }
            for entry in WalkDir::new(root) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        warn!("Skipping unreadable entry: {err}");
                        continue;
                    }
                };
                if entry.file_type().is_file() && self.should_process(entry.path()) {
                    files.push(normalize_path(entry.path()));
                }
            }
        }
        files.sort();
        files.dedup();
        debug!(count = files.len(), "Discovered header files");
        files
    }

    fn should_process(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                self.extensions.iter().any(|allowed| allowed.as_str() == ext.as_ref())
            })
            .unwrap_or(false)
    }
}

pub fn find_headers(roots: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    HeaderWalker::new(roots.to_vec())
        .with_extensions(extensions.to_vec())
        .walk()
}
