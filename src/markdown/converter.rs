use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::markdown::engine::{create_comrak_options, render_markdown};
use crate::markdown::types::{MarkdownPlugin, PluginStage};

/// Markdown to HTML with ordered plugin chains around comrak
#[derive(Clone, Default)]
pub struct MarkdownConverter {
    before: Vec<Arc<dyn MarkdownPlugin>>,
    after: Vec<Arc<dyn MarkdownPlugin>>,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin to the chain for its stage
    pub fn add_plugin(&mut self, plugin: Arc<dyn MarkdownPlugin>) {
        debug!("Registered markdown plugin '{}' ({:?})", plugin.name(), plugin.stage());
        match plugin.stage() {
            PluginStage::Before => self.before.push(plugin),
            PluginStage::After => self.after.push(plugin),
        }
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn MarkdownPlugin>) -> Self {
        self.add_plugin(plugin);
        self
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.before.iter().chain(self.after.iter()).map(|p| p.name()).collect()
    }

    pub fn convert(&self, source: &str) -> String {
        let source = self
            .before
            .iter()
            .fold(source.to_string(), |text, plugin| plugin.apply(&text));

        let options = create_comrak_options();
        let html = render_markdown(&source, &options);

        self.after.iter().fold(html, |html, plugin| plugin.apply(&html))
    }
}

impl fmt::Debug for MarkdownConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownConverter")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
