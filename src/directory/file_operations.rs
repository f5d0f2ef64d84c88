use std::fs;
use std::io;
use std::path::Path;

use log::{debug, error, info};
use walkdir::WalkDir;

/// Copy a file, creating the destination's parent directories
pub fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    debug!("Copying file from {} to {}", source.display(), destination.display());

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(source, destination).map(|_| ()).map_err(|e| {
        error!(
            "Failed to copy file from {} to {}: {}",
            source.display(),
            destination.display(),
            e
        );
        e
    })
}

/// Copy every file below `public` into `out`, keeping relative paths.
///
/// Returns the number of files copied. A missing public directory copies
/// nothing. Files already in `out` with the same path are overwritten.
pub fn copy_public_dir(public: &Path, out: &Path) -> io::Result<usize> {
    if !public.is_dir() {
        debug!("No public directory at {}", public.display());
        return Ok(0);
    }

    let mut copied_count = 0;
    for entry in WalkDir::new(public).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = match entry.path().strip_prefix(public) {
            Ok(rel_path) => rel_path,
            Err(_) => continue,
        };
        copy_file(entry.path(), &out.join(rel_path))?;
        copied_count += 1;
    }

    info!("Copied {} files from {}", copied_count, public.display());
    Ok(copied_count)
}

/// [`copy_public_dir`] on the blocking pool
pub async fn copy_public_dir_async(public: &Path, out: &Path) -> io::Result<usize> {
    let (public, out) = (public.to_path_buf(), out.to_path_buf());
    tokio::task::spawn_blocking(move || copy_public_dir(&public, &out))
        .await
        .map_err(io::Error::other)?
}
