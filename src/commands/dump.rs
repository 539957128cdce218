use crate::signature::load_from_path;
use crate::version::TargetVersion;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn handle_dump(path: &Path, version: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dump_database(path, version, &mut out)
}

/// Load the database at `path`, checking it targets `version`, and write
/// its readable form to `out`.
pub fn dump_database<W: Write>(path: &Path, version: &str, out: &mut W) -> Result<()> {
    let version = TargetVersion::parse(version)
        .with_context(|| format!("Invalid target version '{version}'"))?;
    let db = load_from_path(path, version)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    write!(out, "{db}")?;
    out.flush()?;
    Ok(())
}
