//! Turns raw binding-annotation arguments into signature entries.
//!
//! Accepted argument shapes:
//!
//! - `("<versions>", "<pattern>")`
//! - `("<versions>", "<operations>", "<pattern>")`
//!
//! An annotation only ever yields an entry for the version currently being
//! processed; multi-version annotations are visited once per version pass.

use super::resolver::{Annotation, DeclKind, ResolvedDecl};
use crate::signature::{parse_operations, EntryKind, SigEntry, SigOperation};
use crate::version::{parse_version_list, TargetVersion};
use tracing::{debug, trace, warn};

/// Why an annotation produced no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The version list did not parse; the annotation is ignored for every
    /// version.
    InvalidVersions(String),
    /// The annotation does not list the version being processed.
    NotTargeted,
    /// Neither the two- nor the three-argument form.
    ArgumentCount(usize),
    EmptyPattern,
    /// The front end produced no symbol for the declaration.
    EmptySymbol,
    /// The entry was rejected on construction.
    InvalidEntry(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Entry(SigEntry),
    Skipped(SkipReason),
}

impl Interpretation {
    pub fn into_entry(self) -> Option<SigEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            Self::Skipped(_) => None,
        }
    }
}

/// Interpret one annotation of `decl` for `target`.
pub fn interpret(
    decl: &ResolvedDecl,
    annotation: &Annotation,
    target: TargetVersion,
) -> Interpretation {
    let args = &annotation.args;
    let Some(versions_arg) = args.first() else {
        return Interpretation::Skipped(SkipReason::ArgumentCount(0));
    };

    let versions_text = String::from_utf8_lossy(versions_arg);
    let versions = match parse_version_list(&versions_text) {
        Ok(versions) => versions,
        Err(_) => {
            return Interpretation::Skipped(SkipReason::InvalidVersions(versions_text.into_owned()))
        }
    };
    if !versions.contains(&target) {
        return Interpretation::Skipped(SkipReason::NotTargeted);
    }

    let (operations, pattern) = match args.as_slice() {
        [_, pattern] => (Vec::new(), pattern),
        [_, operations, pattern] => (parse_operations_lenient(decl, operations), pattern),
        _ => return Interpretation::Skipped(SkipReason::ArgumentCount(args.len())),
    };

    if pattern.is_empty() {
        return Interpretation::Skipped(SkipReason::EmptyPattern);
    }
    if decl.symbol.is_empty() {
        return Interpretation::Skipped(SkipReason::EmptySymbol);
    }

    let (kind, extra_symbol) = match &decl.kind {
        DeclKind::Function => (EntryKind::Function, None),
        DeclKind::Data => (EntryKind::Data, None),
        DeclKind::VirtualMethod { thunk_symbol } if !thunk_symbol.is_empty() => {
            (EntryKind::VirtualThunk, Some(thunk_symbol.clone()))
        }
        DeclKind::VirtualMethod { .. } => return Interpretation::Skipped(SkipReason::EmptySymbol),
    };

    match SigEntry::new(kind, decl.symbol.clone(), extra_symbol, pattern.clone(), operations) {
        Ok(entry) => Interpretation::Entry(entry),
        // Not reached after the checks above.
        Err(err) => Interpretation::Skipped(SkipReason::InvalidEntry(err.to_string())),
    }
}

/// Interpret every annotation on `decl`, logging diagnostics for the
/// skipped ones, and return the entries for `target` in annotation order.
pub fn interpret_declaration(decl: &ResolvedDecl, target: TargetVersion) -> Vec<SigEntry> {
    decl.annotations
        .iter()
        .filter_map(|annotation| match interpret(decl, annotation, target) {
            Interpretation::Entry(entry) => {
                trace!(decl = %decl.name, symbol = %entry.symbol_lossy(), "bound");
                Some(entry)
            }
            Interpretation::Skipped(reason) => {
                report_skip(decl, &reason);
                None
            }
        })
        .collect()
}

fn report_skip(decl: &ResolvedDecl, reason: &SkipReason) {
    match reason {
        SkipReason::InvalidVersions(text) => {
            warn!(decl = %decl.name, "Invalid version string: \"{text}\"");
        }
        SkipReason::EmptyPattern => {
            warn!(decl = %decl.name, "Empty signature detected");
        }
        SkipReason::ArgumentCount(count) => {
            debug!(decl = %decl.name, count, "unsupported annotation argument count");
        }
        SkipReason::EmptySymbol => {
            debug!(decl = %decl.name, "declaration has no symbol");
        }
        SkipReason::InvalidEntry(reason) => {
            warn!(decl = %decl.name, "{reason}");
        }
        SkipReason::NotTargeted => {}
    }
}

/// A malformed operation list drops the operations, not the entry.
fn parse_operations_lenient(decl: &ResolvedDecl, raw: &[u8]) -> Vec<SigOperation> {
    let parsed = std::str::from_utf8(raw)
        .map_err(|_| "operation list is not valid UTF-8".to_string())
        .and_then(|text| parse_operations(text).map_err(|err| err.to_string()));
    parsed.unwrap_or_else(|err| {
        warn!(decl = %decl.name, "{err}; ignoring operations");
        Vec::new()
    })
}
