use super::operation::SigOperation;
use crate::errors::{Error, Result};
use std::borrow::Cow;

/// What kind of symbol an entry binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Function,
    Data,
    VirtualThunk,
    CtorThunk,
    DtorThunk,
}

impl EntryKind {
    /// Thunk kinds carry a second, ABI-generated symbol.
    pub fn is_thunk(self) -> bool {
        matches!(self, Self::VirtualThunk | Self::CtorThunk | Self::DtorThunk)
    }

    pub(crate) fn code(self) -> i8 {
        match self {
            Self::Function => 0,
            Self::Data => 1,
            Self::VirtualThunk => 2,
            Self::CtorThunk => 3,
            Self::DtorThunk => 4,
        }
    }

    pub(crate) fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(Self::Function),
            1 => Some(Self::Data),
            2 => Some(Self::VirtualThunk),
            3 => Some(Self::CtorThunk),
            4 => Some(Self::DtorThunk),
            _ => None,
        }
    }
}

/// One discovered binding: a symbol, the byte pattern locating it and the
/// operations that lead from the match to the symbol address.
///
/// Fields are private so the invariants hold for every constructed entry:
/// the pattern is never empty and `extra_symbol` is present exactly when
/// the kind is a thunk kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigEntry {
    kind: EntryKind,
    symbol: Vec<u8>,
    extra_symbol: Option<Vec<u8>>,
    pattern: Vec<u8>,
    operations: Vec<SigOperation>,
}

impl SigEntry {
    pub fn new(
        kind: EntryKind,
        symbol: impl Into<Vec<u8>>,
        extra_symbol: Option<Vec<u8>>,
        pattern: impl Into<Vec<u8>>,
        operations: Vec<SigOperation>,
    ) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(Error::Validation("signature pattern is empty".into()));
        }
        if kind.is_thunk() != extra_symbol.is_some() {
            return Err(Error::Validation(format!(
                "{kind:?} entry {} an extra symbol",
                if kind.is_thunk() { "requires" } else { "must not carry" }
            )));
        }
        Ok(Self {
            kind,
            symbol: symbol.into(),
            extra_symbol,
            pattern,
            operations,
        })
    }

    /// Plain function entry.
    pub fn function(
        symbol: impl Into<Vec<u8>>,
        pattern: impl Into<Vec<u8>>,
        operations: Vec<SigOperation>,
    ) -> Result<Self> {
        Self::new(EntryKind::Function, symbol, None, pattern, operations)
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn symbol(&self) -> &[u8] {
        &self.symbol
    }

    pub fn extra_symbol(&self) -> Option<&[u8]> {
        self.extra_symbol.as_deref()
    }

    /// Raw pattern bytes; `0x00` marks a wildcard position.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn operations(&self) -> &[SigOperation] {
        &self.operations
    }

    /// Symbol for log output.
    pub fn symbol_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.symbol)
    }
}

/// Render a pattern as space separated hex, `??` for wildcard bytes.
pub fn format_pattern(pattern: &[u8]) -> String {
    pattern
        .iter()
        .map(|&byte| match byte {
            0x00 => "??".to_string(),
            _ => format!("{byte:02X}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
