//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod cache;
pub mod release;
pub mod setup;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::urls;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize and configure the course programming environment
    Setup {
        /// Directory where the course folder will be created
        #[arg(long, value_name = "PATH", env = "COURSEUP_DIR")]
        base: Option<PathBuf>,

        /// Shallow clone (main branch). Default is to copy from the archive
        #[arg(long)]
        clone: bool,

        /// Full clone (all branches, full history)
        #[arg(long)]
        deep_clone: bool,

        /// Force overwrite when copying from archive (ignored with --clone)
        #[arg(short, long)]
        force: bool,
    },

    /// Fetch the latest matching release of the assets repository
    #[command(disable_version_flag = true)]
    Release {
        /// Release version prefix (e.g. v1.2)
        #[arg(long, value_name = "V")]
        version: Option<String>,

        /// Release label (regex)
        #[arg(long, value_name = "R")]
        label: Option<String>,

        /// GitHub project to query
        #[arg(long, value_name = "Q", default_value = urls::DEFAULT_RELEASE_REPO)]
        origin: String,

        /// Directory assets are unpacked into
        #[arg(long, value_name = "PATH", default_value = ".")]
        dest: PathBuf,

        /// Delete the cache and exit
        #[arg(long)]
        clean: bool,

        /// Delete the cache before fetching
        #[arg(long)]
        force: bool,
    },

    /// Inspect or clear the download cache
    Cache {
        /// Remove all cached downloads
        #[arg(long)]
        clean: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, verbose: bool, quiet: bool) -> Result<()> {
        match self {
            Self::Setup {
                base,
                clone,
                deep_clone,
                force,
            } => setup::execute(base, clone, deep_clone, force, verbose, quiet).await,
            Self::Release {
                version,
                label,
                origin,
                dest,
                clean,
                force,
            } => {
                release::execute(
                    &origin,
                    version.as_deref(),
                    label.as_deref(),
                    dest,
                    clean,
                    force,
                    quiet,
                )
                .await
            }
            Self::Cache { clean } => cache::execute(clean),
        }
    }
}
