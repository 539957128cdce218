//! Public SDK header generation: copies annotated headers with the binding
//! marker invocations stripped.

use crate::errors::{Error, Result};
use crate::io::{normalize_path, read_file, write_file};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Strip the first `marker(...)` invocation from `line`.
///
/// Returns `None` when the line held nothing but the invocation (and
/// possibly a trailing `//` comment) and should be dropped. Lines whose
/// argument list does not close on the same line are returned unchanged.
pub fn sanitize_line(line: &[u8], marker: &[u8]) -> Option<Vec<u8>> {
    let Some(macro_pos) = find(line, marker, 0) else {
        return Some(line.to_vec());
    };
    let Some(open) = line[macro_pos..].iter().position(|&b| b == b'(').map(|p| p + macro_pos) else {
        return Some(line.to_vec());
    };

    let mut depth = 0usize;
    let mut close = None;
    for (offset, &byte) in line[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + offset);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(close) = close else {
        return Some(line.to_vec());
    };

    let before = &line[..macro_pos];
    let after = &line[close + 1..];
    if before.trim_ascii().is_empty() {
        let rest = after.trim_ascii();
        if rest.is_empty() || rest.starts_with(b"//") {
            return None;
        }
    }

    let mut out = Vec::with_capacity(before.len() + after.len());
    out.extend_from_slice(before);
    out.extend_from_slice(after);
    Some(out)
}

/// Sanitize a whole header. Every kept line is terminated by `\n`.
pub fn sanitize_content(content: &[u8], marker: &[u8]) -> Vec<u8> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    if content.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(content.len());
    for line in body.split(|&b| b == b'\n') {
        if let Some(kept) = sanitize_line(line, marker) {
            out.extend_from_slice(&kept);
            out.push(b'\n');
        }
    }
    out
}

/// Shared parent of the parents of `dirs`, compared component-wise.
///
/// Headers are laid out relative to this directory so that each source
/// root keeps its own top-level name in the SDK tree.
pub fn common_parent(dirs: &[PathBuf]) -> Option<PathBuf> {
    let mut parents = dirs
        .iter()
        .map(|dir| normalize_path(dir).parent().map(Path::to_path_buf));
    let mut common = parents.next()??;
    for parent in parents {
        let parent = parent?;
        let shared: PathBuf = common
            .components()
            .zip(parent.components())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect();
        common = shared;
    }
    if common.as_os_str().is_empty() {
        None
    } else {
        Some(common)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeaderReport {
    pub written: usize,
    pub failed: usize,
}

/// Write a sanitized copy of every file in `files` under `out_root`,
/// mirroring each file's path relative to [`common_parent`] of
/// `source_dirs`. Per-file failures are logged and counted.
pub fn generate_sdk_headers(
    source_dirs: &[PathBuf],
    files: &[PathBuf],
    out_root: &Path,
    marker: &str,
    pool: &ThreadPool,
) -> Result<HeaderReport> {
    let base = common_parent(source_dirs).ok_or_else(|| {
        Error::Configuration("source directories share no common parent".to_string())
    })?;
    debug!(base = %base.display(), out = %out_root.display(), "Generating SDK headers");

    let written = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    pool.install(|| {
        files.par_iter().for_each(|file| {
            match sanitize_file(file, &base, out_root, marker.as_bytes()) {
                Ok(()) => {
                    written.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    warn!("{err}");
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    });

    Ok(HeaderReport {
        written: written.into_inner(),
        failed: failed.into_inner(),
    })
}

fn sanitize_file(file: &Path, base: &Path, out_root: &Path, marker: &[u8]) -> Result<()> {
    let file = normalize_path(file);
    let relative = file
        .strip_prefix(base)
        .map_err(|_| Error::task(&file, format!("not under {}", base.display())))?;
    let content = read_file(&file)?;
    write_file(&out_root.join(relative), &sanitize_content(&content, marker))
}
