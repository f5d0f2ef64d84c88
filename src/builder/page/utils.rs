use std::path::Path;

use crate::front_matter::FrontMatter;
use crate::utils::path::to_url_path;

/// Compute the slug of a page.
///
/// An explicit `permalink` wins verbatim. Otherwise the path below the pages
/// root decides: `index.<ext>` collapses onto its directory and any other file
/// becomes a directory named after its stem.
pub fn compute_slug(path: &Path, pages_dir: &Path, front_matter: &FrontMatter) -> String {
    if let Some(permalink) = front_matter.permalink() {
        return permalink;
    }

    let relative = path.strip_prefix(pages_dir).unwrap_or(path);
    let dir = relative.parent().map(to_url_path).unwrap_or_default();
    let stem = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut slug = String::from("/");
    if !dir.is_empty() {
        slug.push_str(&dir);
        slug.push('/');
    }
    if stem != "index" {
        slug.push_str(&stem);
        slug.push('/');
    }

    slug
}
