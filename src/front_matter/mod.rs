pub mod extractor;
pub mod types;

pub use extractor::{extract_front_matter, split_front_matter, FrontMatterBlock};
pub use types::FrontMatter;
