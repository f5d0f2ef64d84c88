use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::utils::error::Result;

/// List every regular file below `dir`, recursively.
///
/// A directory that does not exist yields an empty list. Paths come back
/// sorted by file name at every level.
pub fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        debug!("Directory {} does not exist, nothing to walk", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// [`walk_files`] on the blocking pool
pub async fn walk_files_async(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || walk_files(&dir)).await?
}

/// Write a string to a file, creating parent directories as needed
pub async fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walk_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.md"), "x").unwrap();
        fs::write(dir.path().join("a/b/deep.html"), "x").unwrap();

        let files = walk_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&dir.path().join("top.md")));
        assert!(files.contains(&dir.path().join("a/b/deep.html")));
    }

    #[test]
    fn test_walk_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = walk_files(&dir.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("x/y/index.html");
        write_file(&target, "<p>hi</p>").await.unwrap();
        // a second write into the same directory must not fail
        write_file(&target, "<p>again</p>").await.unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "<p>again</p>");
    }
}
