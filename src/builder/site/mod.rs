mod builder;
mod context;
mod converter;
mod loader;
mod output;
mod renderer;
mod report;

pub use builder::{build_site, Pipeline};
pub use context::{build_context, Context, ContextProcessor, IdentityProcessor};
pub use converter::convert_markdown_pages;
pub use loader::{load_partials, load_registry, load_templates, Registry, RegistryKind};
pub use output::{is_html_destination, resolve_output_path, NOT_FOUND_SLUG};
pub use renderer::{render_page, render_to_file, RenderEnv, RenderError};
pub use report::{BuildReport, PageOutcome};
