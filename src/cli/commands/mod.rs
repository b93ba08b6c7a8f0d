//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod doctor;
pub mod inspect;
pub mod path;
pub mod split;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::config::defaults::CONFIG_FILE_NAME;
use crate::core::config::SplitConfig;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split debug info out of binaries (files or directories)
    Split {
        /// Binaries, or directories to search for ELF files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Debug store directory
        #[arg(short, long)]
        debug_dir: Option<PathBuf>,

        /// Target triplet used to pick cross binutils
        #[arg(short, long, env = "DEBUGSPLIT_ARCH_TRIPLET")]
        arch_triplet: Option<String>,

        /// Number of binaries to split in parallel
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Show what the splitter sees in a binary
    Inspect {
        /// Binary to inspect
        file: PathBuf,

        /// Debug store directory
        #[arg(short, long)]
        debug_dir: Option<PathBuf>,
    },

    /// Print the debug store path for a build-id
    Path {
        /// Hex build-id
        build_id: String,

        /// Debug store directory
        #[arg(short, long)]
        debug_dir: Option<PathBuf>,
    },

    /// Check that objcopy and strip are available
    Doctor {
        /// Target triplet used to pick cross binutils
        #[arg(short, long, env = "DEBUGSPLIT_ARCH_TRIPLET")]
        arch_triplet: Option<String>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, config_path: Option<&Path>) -> Result<()> {
        let current_dir = std::env::current_dir()?;
        match self {
            Self::Split {
                paths,
                debug_dir,
                arch_triplet,
                jobs,
            } => {
                let options = split::SplitOptions {
                    paths,
                    debug_dir,
                    arch_triplet,
                    jobs,
                    config: config_path.map(Path::to_path_buf),
                };
                split::execute(&current_dir, options).await
            }
            Self::Inspect { file, debug_dir } => {
                inspect::execute(&current_dir, &file, debug_dir, config_path).await
            }
            Self::Path {
                build_id,
                debug_dir,
            } => path::execute(&current_dir, &build_id, debug_dir, config_path).await,
            Self::Doctor { arch_triplet } => {
                doctor::execute(&current_dir, arch_triplet, config_path).await
            }
        }
    }
}

/// Locate and load the configuration file.
///
/// An explicitly named file must exist; the default `debugsplit.toml` in
/// `project_dir` is optional.
pub fn load_config(project_dir: &Path, config_path: Option<&Path>) -> Result<SplitConfig> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => project_dir.join(CONFIG_FILE_NAME),
    };

    SplitConfig::load_from_path(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Effective config file path, for diagnostics
pub fn config_file_path(project_dir: &Path, config_path: Option<&Path>) -> PathBuf {
    config_path.map_or_else(|| project_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
}
