//! Environment/runtime helpers
//!
//! Sanity checks to ensure the sqlite data directory exists at startup.

use std::path::Path;

use tracing::{debug, warn};

/// For `sqlite:` URLs pointing at a file, make sure the parent directory exists
/// so the driver can create the database. Other URLs are left alone.
pub async fn ensure_sqlite_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        debug!("database url is not a sqlite file; nothing to prepare");
        return Ok(());
    };
    let Some(parent) = Path::new(&path).parent() else { return Ok(()) };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "sqlite data directory missing; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}

/// Extract the file path from a sqlite URL, or `None` for in-memory and non-sqlite URLs.
pub fn sqlite_file_path(database_url: &str) -> Option<String> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path.to_string())
}
