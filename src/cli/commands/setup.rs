//! CLI implementation for `courseup setup`

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::output;
use crate::core::context::SetupContext;
use crate::core::pipeline::{self, CloneMode, SetupOptions};

/// Execute the setup command
#[allow(clippy::fn_params_excessive_bools)]
pub async fn execute(
    base: Option<PathBuf>,
    clone: bool,
    deep_clone: bool,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let mode = if deep_clone {
        CloneMode::Deep
    } else if clone {
        CloneMode::Shallow
    } else {
        CloneMode::Archive
    };

    let options = SetupOptions {
        base: base.unwrap_or_else(crate::config::defaults::default_base),
        mode,
        force,
    };
    let ctx = SetupContext::new(verbose, output::select_sink(quiet));

    pipeline::run(&ctx, &options).await?;

    println!("{} You're ready to start coding!", output::status::SUCCESS);
    Ok(())
}
