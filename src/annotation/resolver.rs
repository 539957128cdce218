//! Boundary to the external C++ front end.
//!
//! The front end parses headers, computes mangled and thunk symbols and
//! reports every declaration carrying the binding annotation. The
//! signature pipeline only consumes what it reports; it never mangles
//! names itself.

use crate::errors::Result;
use crate::version::TargetVersion;
use std::path::Path;

/// Declaration category as reported by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    Data,
    /// A virtual instance method; calls go through an ABI thunk with its
    /// own mangled name.
    VirtualMethod { thunk_symbol: Vec<u8> },
}

/// Raw arguments of one binding annotation, in source order.
///
/// Arguments are byte strings: patterns routinely contain bytes that are
/// not valid UTF-8, and `0x00` wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
    pub args: Vec<Vec<u8>>,
}

impl Annotation {
    pub fn new<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Vec<u8>>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// One annotated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDecl {
    /// Qualified source name, for diagnostics.
    pub name: String,
    pub kind: DeclKind,
    /// Mangled primary symbol.
    pub symbol: Vec<u8>,
    /// A declaration may carry the binding annotation several times.
    pub annotations: Vec<Annotation>,
}

/// Inputs for resolving one header in one target-version pass.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub file: &'a Path,
    pub target: TargetVersion,
    /// Compiler resource directory override, forwarded to the front end.
    pub resource_dir: Option<&'a Path>,
}

/// Source of annotated declarations for a header.
///
/// Implementations are shared across worker threads. An `Err` marks the
/// file as failed for this pass without affecting other files.
pub trait DeclarationResolver: Sync {
    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Vec<ResolvedDecl>>;
}
