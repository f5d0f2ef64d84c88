use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::builder::page::Page;
use crate::builder::scripts::ScriptRegistry;
use crate::builder::site::loader::Registry;
use crate::builder::site::output::is_html_destination;
use crate::liquid::{
    build_partials, create_parser, page_to_liquid, render_template, ScopeObject, ScopeValue,
};
use crate::minify::Minifier;
use crate::utils::fs::write_file;

/// Everything a render task reads; built once per build and shared
pub struct RenderEnv {
    pub templates: Registry,
    pub partials: Registry,
    /// Template view of the build context
    pub context: ScopeValue,
    pub scripts: ScriptRegistry,
    pub minifier: Arc<dyn Minifier>,
}

impl fmt::Debug for RenderEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEnv")
            .field("templates", &self.templates.len())
            .field("partials", &self.partials.len())
            .field("scripts", &self.scripts)
            .field("minifier", &self.minifier)
            .finish()
    }
}

/// Why a single page was not written
#[derive(Debug)]
pub enum RenderError {
    /// `template` names a template that was not loaded
    UnknownTemplate(String),
    /// Liquid failed to parse or render
    Template(String),
    /// `buildScript` names an id nobody registered
    UnknownBuildScript(String),
    /// The build script returned an error
    Script { id: String, message: String },
    /// The output file could not be written
    Write { path: PathBuf, source: io::Error },
    /// The render task was not started
    Cancelled,
    /// The render task panicked
    Panicked(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownTemplate(name) => write!(f, "Unknown template '{}'", name),
            RenderError::Template(msg) => write!(f, "{}", msg),
            RenderError::UnknownBuildScript(id) => write!(f, "Unknown build script '{}'", id),
            RenderError::Script { id, message } => {
                write!(f, "Build script '{}' failed: {}", id, message)
            }
            RenderError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            RenderError::Cancelled => write!(f, "Render cancelled"),
            RenderError::Panicked(msg) => write!(f, "Render task panicked: {}", msg),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RenderError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Render one page to its final document.
///
/// The page's `template` is rendered if it names one, otherwise the page body
/// itself is the template. Either way the scope is `{ page, context }` and the
/// page body is available as the `content` partial. Fields missing from the
/// scope render empty. The `buildScript`, if any, post-processes the result,
/// and HTML destinations are minified.
pub async fn render_page(page: &Page, destination: &Path, env: &RenderEnv) -> Result<String, RenderError> {
    let mut html = render_liquid(page, env)?;

    if let Some(id) = page.front_matter.build_script() {
        let script = env
            .scripts
            .get(&id)
            .ok_or_else(|| RenderError::UnknownBuildScript(id.clone()))?;
        debug!("Running build script '{}' for {}", id, page.slug);
        html = script
            .run(html, &page.front_matter, &page.slug)
            .await
            .map_err(|e| RenderError::Script { id, message: e.to_string() })?;
    }

    if is_html_destination(destination) {
        html = env.minifier.minify(&html);
    }

    Ok(html)
}

fn render_liquid(page: &Page, env: &RenderEnv) -> Result<String, RenderError> {
    let source = match page.front_matter.template() {
        Some(name) => env
            .templates
            .get(&name)
            .ok_or(RenderError::UnknownTemplate(name))?,
        None => page.content.as_str(),
    };

    let parser = create_parser(build_partials(&page.content, &env.partials))
        .map_err(|e| RenderError::Template(e.to_string()))?;

    let mut globals = ScopeObject::new();
    globals.insert("page", ScopeObject::from(&page_to_liquid(page)));
    globals.insert("context", env.context.clone());

    render_template(source, &globals, &parser).map_err(|e| RenderError::Template(e.to_string()))
}

/// Render a page and write it to `destination`, creating parent directories
pub async fn render_to_file(page: &Page, destination: &Path, env: &RenderEnv) -> Result<(), RenderError> {
    let html = render_page(page, destination, env).await?;
    write_file(destination, &html)
        .await
        .map_err(|source| RenderError::Write { path: destination.to_path_buf(), source })?;
    debug!("Wrote {} to {}", page.slug, destination.display());
    Ok(())
}
