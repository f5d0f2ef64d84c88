use std::path::PathBuf;

use crate::front_matter::FrontMatter;
use crate::utils::path::get_extension;

/// A discovered content file
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Absolute source path; identifies the page within a build
    pub path: PathBuf,
    /// Canonical URL path, e.g. `/posts/hello/`
    pub slug: String,
    pub front_matter: FrontMatter,
    /// Raw body at load time, rendered HTML once Markdown conversion has run
    pub content: String,
}

impl Page {
    /// Whether the body goes through Markdown conversion. The extension is
    /// matched case-insensitively, like page discovery.
    pub fn is_markdown(&self) -> bool {
        get_extension(&self.path).map_or(false, |ext| ext == "md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> Page {
        Page {
            path: PathBuf::from(path),
            slug: "/".into(),
            front_matter: FrontMatter::default(),
            content: String::new(),
        }
    }

    #[test]
    fn test_is_markdown_ignores_case() {
        assert!(page("/p/notes.md").is_markdown());
        assert!(page("/p/Notes.MD").is_markdown());
        assert!(page("/p/Notes.Md").is_markdown());
        assert!(!page("/p/index.html").is_markdown());
        assert!(!page("/p/README").is_markdown());
    }
}
