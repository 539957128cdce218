use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<()> {
    let config_path = init_config_at(Path::new("."), force)?;
    println!("Created {} configuration file", config_path.display());
    Ok(())
}

/// Write the default configuration into `dir`, returning its path.
pub fn init_config_at(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, default_config_toml().as_bytes())?;
    Ok(config_path)
}
