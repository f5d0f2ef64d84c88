use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};

use crate::utils::error::{PagemillError, Result};
use crate::utils::fs::walk_files_async;

/// What a registry holds; only used for messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Template,
    Partial,
}

impl RegistryKind {
    pub fn name(&self) -> &'static str {
        match self {
            RegistryKind::Template => "template",
            RegistryKind::Partial => "partial",
        }
    }
}

/// Named template sources, keyed by file basename without extension
#[derive(Debug, Clone)]
pub struct Registry {
    kind: RegistryKind,
    entries: BTreeMap<String, String>,
}

impl Registry {
    pub fn new(kind: RegistryKind) -> Self {
        Self { kind, entries: BTreeMap::new() }
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), source.into())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load every file below `dir` into a registry.
///
/// A missing directory gives an empty registry. Two files with the same
/// basename are an error when `strict_names` is set; otherwise the later one
/// in path order replaces the earlier one.
pub async fn load_registry(
    kind: RegistryKind,
    dir: &Path,
    strict_names: bool,
    concurrency: usize,
) -> Result<Registry> {
    let files = walk_files_async(dir).await?;

    let sources: Vec<(PathBuf, String)> = stream::iter(files)
        .map(|path| async move {
            let source = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| PagemillError::Read { path: path.clone(), source })?;
            Ok::<_, PagemillError>((path, source))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut registry = Registry::new(kind);
    let mut origins: BTreeMap<String, PathBuf> = BTreeMap::new();

    for (path, source) in sources {
        let name = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };

        if let Some(previous) = origins.get(&name) {
            if strict_names {
                return Err(PagemillError::NameCollision {
                    kind: kind.name(),
                    name,
                    first: previous.clone(),
                    second: path,
                });
            }
            warn!(
                "Duplicate {} name '{}': {} replaces {}",
                kind.name(),
                name,
                path.display(),
                previous.display()
            );
        }

        debug!("Loaded {} '{}' from {}", kind.name(), name, path.display());
        origins.insert(name.clone(), path);
        registry.insert(name, source);
    }

    Ok(registry)
}

/// Load templates
pub async fn load_templates(dir: &Path, strict_names: bool, concurrency: usize) -> Result<Registry> {
    load_registry(RegistryKind::Template, dir, strict_names, concurrency).await
}

/// Load partials
pub async fn load_partials(dir: &Path, strict_names: bool, concurrency: usize) -> Result<Registry> {
    load_registry(RegistryKind::Partial, dir, strict_names, concurrency).await
}
