//! Signature entries, per-version databases and their on-disk artifacts.

pub mod codec;
pub mod database;
pub mod def;
pub mod entry;
pub mod operation;
pub mod store;

pub use codec::{load, load_from_path, save, save_to_path, MAGIC};
pub use database::{FormatVersion, SignatureDatabase};
pub use def::{write_def, write_def_file};
pub use entry::{format_pattern, EntryKind, SigEntry};
pub use operation::{parse_operations, SigOperation};
pub use store::ExportStore;
