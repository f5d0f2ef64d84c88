use std::path::PathBuf;
use std::time::Duration;

use log::{error, info};

use crate::builder::site::renderer::RenderError;

/// What happened to one page
#[derive(Debug)]
pub struct PageOutcome {
    pub path: PathBuf,
    pub slug: String,
    pub destination: PathBuf,
    pub result: Result<(), RenderError>,
}

impl PageOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Build report structure
#[derive(Debug, Default)]
pub struct BuildReport {
    /// One entry per page, in source path order
    pub outcomes: Vec<PageOutcome>,
    /// Number of templates loaded
    pub templates: usize,
    /// Number of partials loaded
    pub partials: usize,
    /// Files copied from the public directory
    pub assets_copied: usize,
    /// Wall time of the whole build
    pub duration: Duration,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.written()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PageOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Log the totals and one line per failed page
    pub fn log_summary(&self) {
        for outcome in self.failures() {
            if let Err(e) = &outcome.result {
                error!("  {} ({}): {}", outcome.path.display(), outcome.slug, e);
            }
        }
        info!(
            "Built {} of {} pages, {} assets in {:.2?} ({} failed)",
            self.written(),
            self.total(),
            self.assets_copied,
            self.duration,
            self.failed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(slug: &str, result: Result<(), RenderError>) -> PageOutcome {
        PageOutcome {
            path: PathBuf::from(format!("/p{}x.md", slug)),
            slug: slug.into(),
            destination: PathBuf::from(format!("/out{}index.html", slug)),
            result,
        }
    }

    #[test]
    fn test_counts() {
        let report = BuildReport {
            outcomes: vec![
                outcome("/a/", Ok(())),
                outcome("/b/", Err(RenderError::UnknownTemplate("post".into()))),
                outcome("/c/", Ok(())),
            ],
            ..BuildReport::default()
        };

        assert_eq!(report.total(), 3);
        assert_eq!(report.written(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(report.failures().next().unwrap().slug, "/b/");
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BuildReport::default().is_success());
    }
}
