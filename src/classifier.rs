//! Cheap pre-filter that keeps only headers mentioning the binding marker
//! in code, so the expensive resolver never sees unrelated files.

use crate::errors::{Result, ResultExt};
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
}

fn is_ident_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// True when `token` occurs in `content` as a standalone identifier outside
/// comments and string or character literals.
pub fn contains_token(content: &[u8], token: &[u8]) -> bool {
    let Some(&first) = token.first() else {
        return false;
    };
    let n = content.len();
    let mut state = ScanState::Code;
    let mut i = 0;

    while i < n {
        let c = content[i];
        match state {
            ScanState::Code => {
                let next = content.get(i + 1).copied();
                if c == b'/' && next == Some(b'/') {
                    state = ScanState::LineComment;
                    i += 1;
                } else if c == b'/' && next == Some(b'*') {
                    state = ScanState::BlockComment;
                    i += 1;
                } else if c == b'"' {
                    state = ScanState::StringLiteral;
                } else if c == b'\'' {
                    state = ScanState::CharLiteral;
                } else if c == first && content[i..].starts_with(token) {
                    let prev_ok = i == 0 || !is_ident_char(content[i - 1]);
                    let next_ok = content
                        .get(i + token.len())
                        .is_none_or(|&b| !is_ident_char(b));
                    if prev_ok && next_ok {
                        return true;
                    }
                }
            }
            ScanState::LineComment => {
                if c == b'\n' {
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if c == b'*' && content.get(i + 1) == Some(&b'/') {
                    state = ScanState::Code;
                    i += 1;
                }
            }
            ScanState::StringLiteral | ScanState::CharLiteral => {
                let delimiter = if state == ScanState::StringLiteral { b'"' } else { b'\'' };
                if c == b'\\' {
                    i += 1;
                } else if c == delimiter {
                    state = ScanState::Code;
                }
            }
        }
        i += 1;
    }

    false
}

pub fn file_contains_token(path: &Path, token: &str) -> Result<bool> {
    let content = std::fs::read(path).with_path("read", path)?;
    Ok(contains_token(&content, token.as_bytes()))
}

/// Keep the files that contain `token`, scanning one task per file on
/// `pool`. Each retained file appears exactly once; order is unspecified.
/// Unreadable files are logged and dropped.
pub fn filter_files_by_token(files: &[PathBuf], token: &str, pool: &ThreadPool) -> Vec<PathBuf> {
    let retained = Mutex::new(Vec::new());
    pool.install(|| {
        files.par_iter().for_each(|file| match file_contains_token(file, token) {
            Ok(true) => retained.lock().push(file.clone()),
            Ok(false) => {}
            Err(err) => warn!("{err}"),
        });
    });
    let retained = retained.into_inner();
    debug!(
        scanned = files.len(),
        retained = retained.len(),
        "Filtered headers by marker"
    );
    retained
}
