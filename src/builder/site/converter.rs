use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};

use crate::builder::page::Page;
use crate::markdown::MarkdownConverter;
use crate::utils::error::{PagemillError, Result};

/// Replace the body of every Markdown page with its HTML.
///
/// Conversion runs on the blocking pool, at most `concurrency` pages at a
/// time. Non-Markdown pages pass through untouched and the order of `pages`
/// is kept.
pub async fn convert_markdown_pages(
    pages: Vec<Page>,
    converter: Arc<MarkdownConverter>,
    concurrency: usize,
) -> Result<Vec<Page>> {
    let markdown_count = pages.iter().filter(|p| p.is_markdown()).count();

    let pages: Vec<Page> = stream::iter(pages)
        .map(|page| {
            let converter = Arc::clone(&converter);
            async move {
                if !page.is_markdown() {
                    return Ok(page);
                }
                let path = page.path.clone();
                tokio::task::spawn_blocking(move || {
                    let mut page = page;
                    page.content = converter.convert(&page.content);
                    debug!("Converted {}", page.path.display());
                    page
                })
                .await
                .map_err(|e| PagemillError::Markdown(format!("{}: {}", path.display(), e)))
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    info!("Converted {} markdown pages", markdown_count);
    Ok(pages)
}
