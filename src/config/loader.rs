use std::path::Path;

use super::core::SigCodegenConfig;
use crate::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".sigcodegen.toml";

/// Parse and validate configuration from TOML text
pub fn parse_config(contents: &str) -> Result<SigCodegenConfig> {
    let config = toml::from_str::<SigCodegenConfig>(contents)
        .map_err(|e| Error::Configuration(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly requested config file. Unlike [`load_config`], any
/// failure is an error.
pub fn load_config_from(path: &Path) -> Result<SigCodegenConfig> {
    let contents = std::fs::read_to_string(path).with_path("read config", path)?;
    let config = parse_config(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load `.sigcodegen.toml` from `dir` if present. Unreadable or invalid
/// files are reported and replaced by defaults.
pub fn load_config(dir: &Path) -> SigCodegenConfig {
    let path = dir.join(CONFIG_FILE_NAME);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            }
            return SigCodegenConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            SigCodegenConfig::default()
        }
    }
}

pub fn default_config_toml() -> &'static str {
    r#"# sigcodegen configuration

# Binding marker recognised in headers and stripped from the SDK copy
marker = "SPHR_DECL_API"
header_extensions = ["h", "hpp"]

[output]
module_name = "Minecraft.Windows.exe"
sig_db_prefix = "bedrock_sigs"
def_prefix = "bedrock_def"
sdk_dir = "SDK/api"
# "1.0.0" is the base layout; "1.1.0" also stores entry kinds and thunk symbols
format_version = "1.0.0"

[parallel]
# 0 = use all available cores
jobs = 0
"#
}
