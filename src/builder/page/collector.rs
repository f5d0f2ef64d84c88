use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};

use crate::builder::page::model::Page;
use crate::builder::page::utils::compute_slug;
use crate::front_matter::extract_front_matter;
use crate::utils::error::{PagemillError, Result};
use crate::utils::fs::walk_files_async;
use crate::utils::path::get_extension;

/// Extensions that make a file under the pages root a page
pub const PAGE_EXTENSIONS: [&str; 3] = ["md", "html", "xml"];

/// Load every page below `pages_dir`.
///
/// Files are read concurrently, at most `concurrency` at a time. The first
/// unreadable file or malformed frontmatter block fails the whole phase.
/// Pages come back sorted by source path.
pub async fn collect_pages(pages_dir: &Path, concurrency: usize) -> Result<Vec<Page>> {
    debug!("Collecting pages from {}", pages_dir.display());

    let candidates: Vec<PathBuf> = walk_files_async(pages_dir)
        .await?
        .into_iter()
        .filter(|path| is_page_file(path))
        .collect();

    let mut pages: Vec<Page> = stream::iter(candidates)
        .map(|path| load_page(path, pages_dir))
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    pages.sort_by(|a, b| a.path.cmp(&b.path));
    info!("Loaded {} pages", pages.len());

    Ok(pages)
}

/// Read one file and build its page
pub async fn load_page(path: PathBuf, pages_dir: &Path) -> Result<Page> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| PagemillError::Read { path: path.clone(), source })?;

    let (front_matter, content) = extract_front_matter(&raw).map_err(|e| e.with_path(&path))?;
    let slug = compute_slug(&path, pages_dir, &front_matter);
    debug!("Loaded page {} as {}", path.display(), slug);

    Ok(Page { path, slug, front_matter, content })
}

/// Check if a file is a page based on its extension
pub fn is_page_file(path: &Path) -> bool {
    get_extension(path).map_or(false, |ext| PAGE_EXTENSIONS.contains(&ext.as_str()))
}
