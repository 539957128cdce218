//! Per-version artifact output: the binary database and the `.def` file.

use crate::config::OutputConfig;
use crate::errors::Error;
use crate::observability::RunStats;
use crate::signature::{save_to_path, write_def_file, SignatureDatabase};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn report_duplicates(db: &SignatureDatabase) {
    for (symbol, count) in db.duplicate_symbols() {
        warn!(
            version = %db.target_version(),
            count,
            "Duplicate symbol {} will be exported more than once",
            String::from_utf8_lossy(symbol)
        );
    }
}

/// Write both artifacts for `db` into `output_dir`. Each artifact is
/// attempted independently; the paths written and the errors hit are
/// returned separately.
pub fn emit_version(
    db: &SignatureDatabase,
    output_dir: &Path,
    output: &OutputConfig,
) -> (Vec<PathBuf>, Vec<Error>) {
    report_duplicates(db);
    let version = db.target_version();
    let mut written = Vec::new();
    let mut errors = Vec::new();

    let sig_path = output_dir.join(output.sig_db_file_name(version));
    match save_to_path(db, &sig_path) {
        Ok(()) => {
            info!("Signature database written: {} ({} entries)", sig_path.display(), db.len());
            written.push(sig_path);
        }
        Err(err) => errors.push(err),
    }

    let def_path = output_dir.join(output.def_file_name(version));
    match write_def_file(db, &output.module_name, &def_path) {
        Ok(lines) => {
            info!("Export definitions written: {} ({lines} exports)", def_path.display());
            written.push(def_path);
        }
        Err(err) => errors.push(err),
    }

    (written, errors)
}

/// Emit every database, counting each failed artifact in `stats`.
pub fn emit_all(
    databases: &[SignatureDatabase],
    output_dir: &Path,
    output: &OutputConfig,
    stats: &RunStats,
) -> Vec<PathBuf> {
    let mut artifacts = Vec::new();
    for db in databases {
        let (written, errors) = emit_version(db, output_dir, output);
        artifacts.extend(written);
        for err in errors {
            warn!("{err}");
            stats.record_failure();
        }
    }
    artifacts
}
