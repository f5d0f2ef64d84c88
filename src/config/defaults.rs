use std::path::PathBuf;

use crate::config::types::FailurePolicy;

/// Default source directory
pub fn default_source() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_pages_dir() -> PathBuf {
    PathBuf::from("pages")
}

pub fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

pub fn default_partials_dir() -> PathBuf {
    PathBuf::from("partials")
}

pub fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Default destination directory
pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_collections() -> Vec<String> {
    vec!["posts".to_string()]
}

/// Four tasks per core; rendering is mostly waiting on the filesystem
pub fn default_concurrency() -> usize {
    num_cpus::get().max(1) * 4
}

pub fn default_true() -> bool {
    true
}

pub fn default_failure_policy() -> FailurePolicy {
    FailurePolicy::Continue
}
