pub mod walker;

pub use walker::{find_headers, HeaderWalker};

use crate::errors::{Result, ResultExt};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_path("read", path)
}

/// Write `content` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).with_path("write", path)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).with_path("create directory", path)
}

/// Make `path` absolute and drop `.` and `..` components without touching
/// the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
