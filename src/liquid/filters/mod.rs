mod date_to_string;
mod date_to_xmlschema;

use liquid::ParserBuilder;
use liquid::partials::PartialCompiler;

pub use date_to_string::DateToStringFilterParser;
pub use date_to_xmlschema::DateToXmlSchemaFilterParser;

/// Register custom filters for use in Liquid templates
pub fn register_filters<P: PartialCompiler>(parser_builder: ParserBuilder<P>) -> ParserBuilder<P> {
    parser_builder
        .filter(DateToStringFilterParser)
        .filter(DateToXmlSchemaFilterParser)
}
