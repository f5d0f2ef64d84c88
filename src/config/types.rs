use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::minify::MinifyOptions;
use crate::utils::path::absolutize;

/// What a build does when pages fail to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Write every page that can be written and report the rest
    Continue,
    /// Report, then fail the build if any page failed
    FailBuild,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::FailBuild => write!(f, "fail_build"),
        }
    }
}

/// Site configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site root; every relative directory below is resolved against it
    #[serde(skip, default = "defaults::default_source")]
    pub source: PathBuf,

    /// Content files (`.md`, `.html`, `.xml`)
    #[serde(default = "defaults::default_pages_dir")]
    pub pages_dir: PathBuf,

    /// Page templates, selected by a page's `template` key
    #[serde(default = "defaults::default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Fragments available to every template through `include`
    #[serde(default = "defaults::default_partials_dir")]
    pub partials_dir: PathBuf,

    /// Files copied verbatim into the output
    #[serde(default = "defaults::default_public_dir")]
    pub public_dir: PathBuf,

    /// Destination directory for generated site
    #[serde(default = "defaults::default_out_dir")]
    pub out_dir: PathBuf,

    /// Directory names below `pages_dir` that group dated pages
    #[serde(default = "defaults::default_collections")]
    pub collections: Vec<String>,

    /// Maximum number of files read or pages rendered at once
    #[serde(default = "defaults::default_concurrency")]
    pub concurrency: usize,

    /// Minify HTML output
    #[serde(default = "defaults::default_true")]
    pub minify: bool,

    #[serde(default)]
    pub minify_options: MinifyOptions,

    /// Empty the output directory before building
    #[serde(default = "defaults::default_true")]
    pub clean_output: bool,

    /// Treat two templates or partials with the same name as an error
    #[serde(default = "defaults::default_true")]
    pub strict_names: bool,

    #[serde(default = "defaults::default_failure_policy")]
    pub failure_policy: FailurePolicy,

    /// Built-in markdown plugins to enable, in order
    #[serde(default)]
    pub markdown_plugins: Vec<String>,

    /// Free-form values exposed to templates as `context.site`
    #[serde(default)]
    pub site: BTreeMap<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: defaults::default_source(),
            pages_dir: defaults::default_pages_dir(),
            templates_dir: defaults::default_templates_dir(),
            partials_dir: defaults::default_partials_dir(),
            public_dir: defaults::default_public_dir(),
            out_dir: defaults::default_out_dir(),
            collections: defaults::default_collections(),
            concurrency: defaults::default_concurrency(),
            minify: true,
            minify_options: MinifyOptions::default(),
            clean_output: true,
            strict_names: true,
            failure_policy: defaults::default_failure_policy(),
            markdown_plugins: Vec::new(),
            site: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Default configuration rooted at `source`, with absolute paths
    pub fn for_site(source: impl AsRef<Path>) -> Self {
        let mut config = Config {
            source: source.as_ref().to_path_buf(),
            ..Config::default()
        };
        config.resolve_paths();
        config
    }

    /// Make the site root absolute and resolve every directory against it
    pub fn resolve_paths(&mut self) {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        self.source = absolutize(&cwd, &self.source);
        self.pages_dir = absolutize(&self.source, &self.pages_dir);
        self.templates_dir = absolutize(&self.source, &self.templates_dir);
        self.partials_dir = absolutize(&self.source, &self.partials_dir);
        self.public_dir = absolutize(&self.source, &self.public_dir);
        self.out_dir = absolutize(&self.source, &self.out_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.pages_dir, PathBuf::from("pages"));
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert_eq!(config.collections, vec!["posts".to_string()]);
        assert!(config.concurrency >= 4);
        assert!(config.minify && config.clean_output && config.strict_names);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(config.markdown_plugins.is_empty());
    }

    #[test]
    fn test_failure_policy_names() {
        let config: Config = serde_yaml::from_str("failure_policy: fail_build").unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::FailBuild);
        assert_eq!(config.failure_policy.to_string(), "fail_build");
    }

    #[test]
    fn test_resolve_paths() {
        let mut config: Config =
            serde_yaml::from_str("out_dir: build\npublic_dir: /srv/static").unwrap();
        config.source = PathBuf::from("/site");
        config.resolve_paths();

        assert_eq!(config.pages_dir, PathBuf::from("/site/pages"));
        assert_eq!(config.out_dir, PathBuf::from("/site/build"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/static"));
    }
}
