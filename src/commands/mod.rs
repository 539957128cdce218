//! CLI command implementations.
//!
//! Available commands:
//! - **generate**: Run the full pipeline and write all artifacts
//! - **dump**: Print a signature database in readable form
//! - **init**: Initialize a new configuration file

pub mod dump;
pub mod generate;
pub mod init;

pub use dump::{dump_database, handle_dump};
pub use generate::{handle_generate, GenerateConfig};
pub use init::{init_config, init_config_at};
