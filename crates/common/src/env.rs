//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists at startup.

use std::path::Path;

use anyhow::bail;
use tracing::warn;

/// Ensure the parent directory of the data file exists.
///
/// A missing directory is created with a warning; a parent that exists but
/// is not a directory fails startup instead of the first save.
pub async fn ensure_data_dir(data_path: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(data_path).parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    match tokio::fs::metadata(parent).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("data path parent {} exists but is not a directory", parent.display()),
        Err(_) => {
            warn!(dir = %parent.display(), "data directory missing, creating it");
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))
        }
    }
}
