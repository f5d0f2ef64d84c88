use std::path::{Path, PathBuf};

/// Slug that is written as a top-level `404.html` rather than a pretty URL
pub const NOT_FOUND_SLUG: &str = "/404/";

/// Map a slug to its file below `out_dir`.
///
/// Pretty URLs (`/a/b/`) become `a/b/index.html`. Anything else, such as a
/// `/feed.xml` permalink, is used as the file path verbatim. `.` and `..`
/// segments are dropped so the result always stays below `out_dir`.
pub fn resolve_output_path(out_dir: &Path, slug: &str) -> PathBuf {
    if slug == NOT_FOUND_SLUG {
        return out_dir.join("404.html");
    }

    let relative = slug.trim_start_matches('/');
    let mut path = out_dir.to_path_buf();
    for segment in relative
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
    {
        path.push(segment);
    }

    if slug.ends_with('/') {
        path.push("index.html");
    }

    path
}

/// True when the destination is an HTML document
pub fn is_html_destination(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}
