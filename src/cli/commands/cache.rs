//! CLI implementation for `courseup cache`

use anyhow::Result;

use crate::cli::output::status;
use crate::config::defaults;
use crate::infra::http_cache::CachedClient;

/// Execute the cache command
pub fn execute(clean: bool) -> Result<()> {
    let client = CachedClient::new(defaults::cache_dir());

    if clean {
        client.clear()?;
        println!(
            "{} Cleared cache at {}",
            status::SUCCESS,
            client.cache_dir().display()
        );
    } else {
        println!("Cache directory: {}", client.cache_dir().display());
    }
    Ok(())
}
