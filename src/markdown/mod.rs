pub mod converter;
pub mod engine;
pub mod plugins;
pub mod types;

pub use converter::MarkdownConverter;
pub use plugins::{plugin_by_name, DiagramPlugin, MathPlugin, BUILTIN_PLUGINS};
pub use types::{MarkdownPlugin, PluginStage};
