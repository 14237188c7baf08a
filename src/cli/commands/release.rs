//! CLI implementation for `courseup release`
//!
//! Selects the latest matching release of the assets repository and pulls
//! its assets through the download cache, unpacking zip archives into the
//! destination directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::output::{self, status};
use crate::config::defaults;
use crate::core::release::{compile_label_filter, fetch_releases, select_latest};
use crate::error::ReleaseError;
use crate::infra::extract::{self, ExtractOptions};
use crate::infra::http_cache::CachedClient;

/// Execute the release command
#[allow(clippy::fn_params_excessive_bools)]
pub async fn execute(
    origin: &str,
    version_prefix: Option<&str>,
    label: Option<&str>,
    dest: PathBuf,
    clean: bool,
    force: bool,
    quiet: bool,
) -> Result<()> {
    let client = CachedClient::new(defaults::cache_dir());

    if clean {
        client.clear()?;
        println!("{} Cache cleared", status::SUCCESS);
        return Ok(());
    }
    if force {
        client.clear()?;
    }

    let label_filter = label.map(compile_label_filter).transpose()?;

    let releases = fetch_releases(client.client(), origin)
        .await
        .with_context(|| format!("Failed to list releases of {origin}"))?;
    let release = select_latest(&releases, version_prefix, label_filter.as_ref())
        .ok_or(ReleaseError::NoMatch)?;

    println!("{} Selected release: {}", status::SUCCESS, release.tag_name);
    let progress = output::select_sink(quiet);

    for asset in &release.assets {
        tracing::info!(name = %asset.name, "Downloading asset");
        let path = client
            .fetch(&asset.browser_download_url)
            .await
            .map_err(|e| ReleaseError::Asset {
                name: asset.name.clone(),
                error: e.to_string(),
            })?;

        if asset.name.ends_with(".zip") {
            extract::extract(&path, &dest, &ExtractOptions::new(true), progress.as_ref())
                .map_err(|e| ReleaseError::Asset {
                    name: asset.name.clone(),
                    error: e.to_string(),
                })?;
        } else {
            copy_asset(&path, &dest, &asset.name)?;
        }
        println!("{} Fetched asset: {}", status::SUCCESS, asset.name);
    }

    Ok(())
}

fn copy_asset(cached: &Path, dest: &Path, name: &str) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    std::fs::copy(cached, dest.join(name))
        .with_context(|| format!("Failed to place asset '{name}'"))?;
    Ok(())
}
