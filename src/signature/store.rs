use super::database::{FormatVersion, SignatureDatabase};
use super::entry::SigEntry;
use crate::version::TargetVersion;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Thread-safe map from target version to its signature database.
///
/// One store is created per run and shared by reference with every worker.
/// A single mutex guards the whole map so that lazy database creation and
/// appends never race, whichever versions the callers target.
#[derive(Debug, Default)]
pub struct ExportStore {
    format_version: FormatVersion,
    databases: Mutex<BTreeMap<TargetVersion, SignatureDatabase>>,
}

impl ExportStore {
    pub fn new(format_version: FormatVersion) -> Self {
        Self {
            format_version,
            databases: Mutex::new(BTreeMap::new()),
        }
    }

    /// Create the database for `version` if it does not exist yet, so that
    /// a version without any binding still gets artifacts.
    pub fn register(&self, version: TargetVersion) {
        self.insert_all(version, std::iter::empty());
    }

    /// Append `entry` to the database for `version`, creating it on first use.
    pub fn insert(&self, version: TargetVersion, entry: SigEntry) {
        self.insert_all(version, std::iter::once(entry));
    }

    /// Append a batch of entries under one lock acquisition, preserving the
    /// batch order.
    pub fn insert_all(&self, version: TargetVersion, entries: impl IntoIterator<Item = SigEntry>) {
        let mut databases = self.databases.lock();
        let database = databases
            .entry(version)
            .or_insert_with(|| SignatureDatabase::with_format(version, self.format_version));
        for entry in entries {
            database.push(entry);
        }
    }

    /// Number of entries recorded for `version`.
    pub fn entry_count(&self, version: TargetVersion) -> usize {
        self.databases.lock().get(&version).map_or(0, SignatureDatabase::len)
    }

    pub fn versions(&self) -> Vec<TargetVersion> {
        self.databases.lock().keys().copied().collect()
    }

    /// End the population phase and hand out the databases in version order.
    pub fn into_databases(self) -> Vec<SignatureDatabase> {
        self.databases.into_inner().into_values().collect()
    }
}
