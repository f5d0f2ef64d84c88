use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};

use crate::front_matter::FrontMatter;
use crate::utils::error::{BoxResult, PagemillError, Result};

/// Per-page post-processing step selected by a page's `buildScript` key.
///
/// Receives the rendered HTML and returns the replacement. Runs inside the
/// page's render task, so it must be thread safe, and may await I/O.
///
/// Closures taking owned arguments and returning a future implement this
/// trait; see [`ScriptRegistry::register_fn`] for plain functions.
pub trait BuildScript: Send + Sync {
    fn run<'a>(
        &'a self,
        html: String,
        front_matter: &'a FrontMatter,
        slug: &'a str,
    ) -> BoxFuture<'a, BoxResult<String>>;
}

impl<F, Fut> BuildScript for F
where
    F: Fn(String, FrontMatter, String) -> Fut + Send + Sync,
    Fut: Future<Output = BoxResult<String>> + Send + 'static,
{
    fn run<'a>(
        &'a self,
        html: String,
        front_matter: &'a FrontMatter,
        slug: &'a str,
    ) -> BoxFuture<'a, BoxResult<String>> {
        Box::pin(self(html, front_matter.clone(), slug.to_string()))
    }
}

/// Build scripts by id
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Arc<dyn BuildScript>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script. Ids are unique; registering one twice is an error.
    pub fn register(&mut self, id: impl Into<String>, script: Arc<dyn BuildScript>) -> Result<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PagemillError::Script("build script id must not be empty".into()));
        }
        if self.scripts.contains_key(&id) {
            return Err(PagemillError::Script(format!("build script '{}' is already registered", id)));
        }
        self.scripts.insert(id, script);
        Ok(())
    }

    /// Register a synchronous closure
    pub fn register_fn<F>(&mut self, id: impl Into<String>, script: F) -> Result<()>
    where
        F: Fn(String, &FrontMatter, &str) -> BoxResult<String> + Send + Sync + 'static,
    {
        self.register_async(id, move |html: String, front_matter: FrontMatter, slug: String| {
            future::ready(script(html, &front_matter, &slug))
        })
    }

    /// Register a closure returning a future. Separate from
    /// [`ScriptRegistry::register`] so the closure's argument types can be
    /// inferred.
    pub fn register_async<F, Fut>(&mut self, id: impl Into<String>, script: F) -> Result<()>
    where
        F: Fn(String, FrontMatter, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BoxResult<String>> + Send + 'static,
    {
        self.register(id, Arc::new(script))
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn BuildScript>> {
        self.scripts.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scripts.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.scripts.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry").field("ids", &self.ids()).finish()
    }
}
