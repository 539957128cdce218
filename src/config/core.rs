use crate::errors::{Error, Result};
use crate::signature::FormatVersion;
use crate::version::TargetVersion;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_MARKER: &str = "SPHR_DECL_API";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SigCodegenConfig {
    /// Binding marker searched for by the classifier and stripped from
    /// SDK headers.
    pub marker: String,
    pub header_extensions: Vec<String>,
    pub output: OutputConfig,
    pub parallel: ParallelConfig,
}

impl Default for SigCodegenConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            header_extensions: vec!["h".to_string(), "hpp".to_string()],
            output: OutputConfig::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl SigCodegenConfig {
    pub fn validate(&self) -> Result<()> {
        let marker_ok = !self.marker.is_empty()
            && self
                .marker
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if !marker_ok {
            return Err(Error::Configuration(format!(
                "marker must be a C identifier, got \"{}\"",
                self.marker
            )));
        }
        if self.header_extensions.is_empty() {
            return Err(Error::Configuration(
                "header_extensions must not be empty".to_string(),
            ));
        }
        if self.output.module_name.is_empty() {
            return Err(Error::Configuration("output.module_name must not be empty".to_string()));
        }
        self.output.format_version().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Module named in the `LIBRARY` line of `.def` files.
    pub module_name: String,
    pub sig_db_prefix: String,
    pub def_prefix: String,
    /// SDK header root, relative to the output directory.
    pub sdk_dir: PathBuf,
    pub format_version: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            module_name: "Minecraft.Windows.exe".to_string(),
            sig_db_prefix: "bedrock_sigs".to_string(),
            def_prefix: "bedrock_def".to_string(),
            sdk_dir: PathBuf::from("SDK/api"),
            format_version: FormatVersion::V1_0_0.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn format_version(&self) -> Result<FormatVersion> {
        FormatVersion::parse(&self.format_version).ok_or_else(|| {
            Error::Configuration(format!(
                "unsupported output.format_version \"{}\"",
                self.format_version
            ))
        })
    }

    /// `bedrock_sigs.v1_21_50.sig.db`
    pub fn sig_db_file_name(&self, version: TargetVersion) -> String {
        format!("{}.{version}.sig.db", self.sig_db_prefix)
    }

    /// `bedrock_def.v1_21_50.def`
    pub fn def_file_name(&self, version: TargetVersion) -> String {
        format!("{}.{version}.def", self.def_prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Worker threads; 0 uses the host's available parallelism.
    pub jobs: usize,
}

impl ParallelConfig {
    pub fn effective_jobs(&self) -> usize {
        if self.jobs > 0 {
            return self.jobs;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
