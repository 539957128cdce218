//! Per-version signature database.
//!
//! The database is a discovery log: entries keep insertion order and are
//! never mutated or removed once added.

use super::entry::{format_pattern, SigEntry};
use crate::version::TargetVersion;
use std::collections::HashMap;
use std::fmt;

/// On-disk layout revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FormatVersion {
    /// Symbol, pattern and operations only.
    #[default]
    V1_0_0,
    /// Adds the entry kind and the thunk symbol.
    V1_1_0,
}

impl FormatVersion {
    pub fn code(self) -> i32 {
        match self {
            Self::V1_0_0 => 0,
            Self::V1_1_0 => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::V1_0_0),
            1 => Some(Self::V1_1_0),
            _ => None,
        }
    }

    /// Whether entry kind and thunk symbol are stored.
    pub fn stores_kind(self) -> bool {
        self >= Self::V1_1_0
    }

    /// Parse the dotted form used in configuration files.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().trim_start_matches(['v', 'V']) {
            "1.0.0" | "1_0_0" => Some(Self::V1_0_0),
            "1.1.0" | "1_1_0" => Some(Self::V1_1_0),
            _ => None,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1_0_0 => f.write_str("1.0.0"),
            Self::V1_1_0 => f.write_str("1.1.0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureDatabase {
    format_version: FormatVersion,
    target_version: TargetVersion,
    entries: Vec<SigEntry>,
}

impl SignatureDatabase {
    pub fn new(target_version: TargetVersion) -> Self {
        Self::with_format(target_version, FormatVersion::default())
    }

    pub fn with_format(target_version: TargetVersion, format_version: FormatVersion) -> Self {
        Self {
            format_version,
            target_version,
            entries: Vec::new(),
        }
    }

    /// Append an entry at the end of the log.
    pub fn push(&mut self, entry: SigEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SigEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn format_version(&self) -> FormatVersion {
        self.format_version
    }

    pub fn target_version(&self) -> TargetVersion {
        self.target_version
    }

    /// Symbols bound by more than one entry, with their occurrence count,
    /// in order of first appearance.
    ///
    /// Duplicates are kept in the database; several patterns may legitimately
    /// locate the same symbol.
    pub fn duplicate_symbols(&self) -> Vec<(&[u8], usize)> {
        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        let mut order = Vec::new();
        for entry in &self.entries {
            let count = counts.entry(entry.symbol()).or_insert(0);
            if *count == 0 {
                order.push(entry.symbol());
            }
            *count += 1;
        }
        order
            .into_iter()
            .filter_map(|symbol| {
                let count = counts[symbol];
                (count > 1).then_some((symbol, count))
            })
            .collect()
    }
}

impl fmt::Display for SignatureDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "format_version={}", self.format_version)?;
        writeln!(
            f,
            "target_version={} ({})",
            self.target_version,
            self.target_version.canonical()
        )?;
        writeln!(f, "entry_count={}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "  symbol={}", entry.symbol_lossy())?;
            if let Some(extra) = entry.extra_symbol() {
                writeln!(f, "  extra_symbol={}", String::from_utf8_lossy(extra))?;
            }
            writeln!(f, "  kind={:?}", entry.kind())?;
            writeln!(f, "  pattern={}", format_pattern(entry.pattern()))?;
            let ops: Vec<String> = entry.operations().iter().map(|op| op.to_string()).collect();
            writeln!(f, "  operations=[{}]", ops.join(", "))?;
            writeln!(f, "---")?;
        }
        Ok(())
    }
}
