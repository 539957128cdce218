use crate::annotation::IndexResolver;
use crate::config::{load_config, load_config_from, SigCodegenConfig};
use crate::pipeline::{Pipeline, PipelineOptions, RunSummary};
use crate::signature::FormatVersion;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct GenerateConfig {
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
    pub build_dir: PathBuf,
    pub versions: Vec<String>,
    pub resource_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub format_version: Option<FormatVersion>,
}

impl GenerateConfig {
    /// File configuration with command-line overrides applied
    fn settings(&self) -> Result<SigCodegenConfig> {
        let mut settings = match &self.config {
            Some(path) => load_config_from(path)?,
            None => load_config(Path::new(".")),
        };
        if let Some(jobs) = self.jobs {
            settings.parallel.jobs = jobs;
        }
        if let Some(format_version) = self.format_version {
            settings.output.format_version = format_version.to_string();
        }
        Ok(settings)
    }
}

pub fn handle_generate(config: GenerateConfig) -> Result<RunSummary> {
    let settings = config.settings()?;
    let resolver = IndexResolver::load(&config.build_dir).with_context(|| {
        format!(
            "Failed to load the declaration index from {}",
            config.build_dir.display()
        )
    })?;

    let options = PipelineOptions {
        source_dirs: config.sources,
        output_dir: config.output,
        versions: config.versions,
        resource_dir: config.resource_dir,
        config: settings,
    };
    let summary = Pipeline::new(options, &resolver)?.run()?;

    let stats = &summary.stats;
    info!(
        scanned = stats.files_scanned,
        retained = stats.files_retained,
        resolved = stats.files_resolved,
        entries = stats.entries_inserted,
        failures = stats.failures,
        "Generation finished"
    );
    for artifact in &summary.artifacts {
        println!("{}", artifact.display());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::INDEX_FILE_NAME;
    use crate::signature::load_from_path;
    use crate::version::TargetVersion;
    use tempfile::TempDir;

    #[test]
    fn test_cli_overrides_file_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[parallel]\njobs = 8\n").unwrap();

        let config = GenerateConfig {
            sources: vec![],
            output: dir.path().join("out"),
            build_dir: dir.path().to_path_buf(),
            versions: vec![],
            resource_dir: None,
            config: Some(path),
            jobs: Some(2),
            format_version: Some(FormatVersion::V1_1_0),
        };
        let settings = config.settings().unwrap();
        assert_eq!(settings.parallel.jobs, 2);
        assert_eq!(settings.output.format_version().unwrap(), FormatVersion::V1_1_0);
    }

    #[test]
    fn test_generate_with_declaration_index() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("include");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(
            src.join("Game.h"),
            "class Game {\n    SPHR_DECL_API(\"1.21.50\", \"\\x48\\x89\") void init();\n};\n",
        )
        .unwrap();
        let build = dir.path().join("build");
        std::fs::create_dir_all(&build).unwrap();
        std::fs::write(
            build.join(INDEX_FILE_NAME),
            r#"{"files": {"../include/Game.h": [
                {"name": "Game::init", "kind": "function", "symbol": "?init@Game@@QEAAXXZ",
                 "annotations": [["1.21.50", "\\x48\\x89"]]}
            ]}}"#,
        )
        .unwrap();

        let summary = handle_generate(GenerateConfig {
            sources: vec![src],
            output: dir.path().join("out"),
            build_dir: build,
            versions: vec!["1.21.50".into()],
            resource_dir: None,
            config: None,
            jobs: Some(1),
            format_version: None,
        })
        .unwrap();

        assert_eq!(summary.exit_code(), 0);
        let db = load_from_path(
            &dir.path().join("out/bedrock_sigs.v1_21_50.sig.db"),
            TargetVersion::parse("1.21.50").unwrap(),
        )
        .unwrap();
        assert_eq!(db.len(), 1);
        assert_eq!(db.entries()[0].pattern(), b"\x48\x89");
    }
}
