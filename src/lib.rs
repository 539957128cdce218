// Export modules for library usage
pub mod annotation;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod header;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod signature;
pub mod version;

// Re-export commonly used types
pub use crate::annotation::{
    interpret, interpret_declaration, Annotation, DeclKind, DeclarationResolver, IndexResolver,
    Interpretation, ResolveRequest, ResolvedDecl, SkipReason,
};

pub use crate::signature::{
    format_pattern, load, load_from_path, parse_operations, save, save_to_path, write_def,
    write_def_file, EntryKind, ExportStore, FormatVersion, SigEntry, SigOperation,
    SignatureDatabase, MAGIC,
};

pub use crate::classifier::{contains_token, filter_files_by_token};
pub use crate::config::SigCodegenConfig;
pub use crate::errors::{Error, FormatError, Result};
pub use crate::pipeline::{Pipeline, PipelineOptions, RunSummary};
pub use crate::version::{parse_canonical, parse_version_list, TargetVersion};
