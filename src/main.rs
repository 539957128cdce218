use anyhow::Result;
use clap::Parser;
use sigcodegen::cli::{Cli, Commands};
use sigcodegen::commands::{self, GenerateConfig};
use sigcodegen::observability::init_logging;
use std::process::ExitCode;

// Main orchestrator function
fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            sources,
            output,
            build_dir,
            versions,
            resource_dir,
            config,
            jobs,
            format_version,
            verbosity,
        } => {
            init_logging(verbosity);
            let summary = commands::handle_generate(GenerateConfig {
                sources,
                output,
                build_dir,
                versions,
                resource_dir,
                config,
                jobs,
                format_version: format_version.map(Into::into),
            })?;
            Ok(ExitCode::from(summary.exit_code()))
        }
        Commands::Dump {
            path,
            version,
            verbosity,
        } => {
            init_logging(verbosity);
            commands::handle_dump(&path, &version)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init_config(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
