mod convert;
mod filters;
mod scope;

use liquid::partials::{EagerCompiler, InMemorySource};
use liquid::{ObjectView, Parser, ParserBuilder};

use crate::builder::site::Registry;
use crate::utils::error::{PagemillError, Result};

pub use convert::{json_to_liquid, page_to_liquid, yaml_to_liquid, PAGE_FIXED_KEYS};
pub use filters::{register_filters, DateToStringFilterParser, DateToXmlSchemaFilterParser};
pub use scope::{ScopeObject, ScopeValue};

/// Partial sources compiled together with the parser
pub type Partials = EagerCompiler<InMemorySource>;

/// Name under which a page's own body is available as a partial
pub const CONTENT_PARTIAL: &str = "content";

/// Collect the partials visible to one page: its content under
/// [`CONTENT_PARTIAL`] plus every registered partial. A registered partial
/// named `content` replaces the page body.
pub fn build_partials(content: &str, registry: &Registry) -> Partials {
    let mut partials = Partials::empty();
    partials.add(CONTENT_PARTIAL, content.to_string());
    for (name, source) in registry.iter() {
        partials.add(name.clone(), source.clone());
    }
    partials
}

/// Create a parser with the standard library, custom filters and the given
/// partials. Fails if any partial does not parse.
pub fn create_parser(partials: Partials) -> Result<Parser> {
    register_filters(ParserBuilder::with_stdlib())
        .partials(partials)
        .build()
        .map_err(|e| PagemillError::Template(e.to_string()))
}

/// Parse `source` and render it against `globals`
pub fn render_template(source: &str, globals: &dyn ObjectView, parser: &Parser) -> Result<String> {
    let template = parser
        .parse(source)
        .map_err(|e| PagemillError::Template(format!("Error parsing Liquid template: {}", e)))?;

    template.render(globals).map_err(|e| {
        log::debug!("Error rendering Liquid template: {}", e);
        PagemillError::Template(format!("Error rendering Liquid template: {}", e))
    })
}
