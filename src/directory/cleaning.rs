use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

/// Remove everything inside `path` but keep the directory itself.
/// A missing directory is left missing.
pub fn clean_directory(path: &Path) -> io::Result<()> {
    if !path.exists() {
        return Ok(());
    }

    if !path.is_dir() {
        warn!("Attempted to clean a non-directory: {}", path.display());
        return Ok(());
    }

    info!("Cleaning directory: {}", path.display());

    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_dir() {
            fs::remove_dir_all(entry_path)?;
        } else {
            fs::remove_file(entry_path)?;
        }
    }

    Ok(())
}

/// [`clean_directory`] on the blocking pool
pub async fn clean_directory_async(path: &Path) -> io::Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || clean_directory(&path))
        .await
        .map_err(io::Error::other)?
}
