use crate::signature::FormatVersion;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Base layout: symbol, pattern and operations
    #[value(name = "1.0.0")]
    V1_0_0,
    /// Adds entry kind and thunk symbol to every entry
    #[value(name = "1.1.0")]
    V1_1_0,
}

impl From<FormatArg> for FormatVersion {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::V1_0_0 => FormatVersion::V1_0_0,
            FormatArg::V1_1_0 => FormatVersion::V1_1_0,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sigcodegen")]
#[command(
    about = "Signature database and SDK header generator for annotated C++ headers",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate signature databases, export definitions and SDK headers
    Generate {
        /// Source directories to scan for headers
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Build directory containing the front end's declaration index
        #[arg(short = 'p', long = "build-dir")]
        build_dir: PathBuf,

        /// Target versions, comma separated (e.g. 1.21.50,1.21.60)
        #[arg(long, required = true)]
        versions: Vec<String>,

        /// Compiler resource headers directory
        #[arg(long = "resource-dir")]
        resource_dir: Option<PathBuf>,

        /// Configuration file (defaults to ./.sigcodegen.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long, env = "SIGCODEGEN_JOBS")]
        jobs: Option<usize>,

        /// Binary layout of the written databases
        #[arg(long = "format-version", value_enum)]
        format_version: Option<FormatArg>,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Print the contents of a signature database
    Dump {
        /// Database file
        path: PathBuf,

        /// Target version the database was written for
        #[arg(long)]
        version: String,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a sigcodegen configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
