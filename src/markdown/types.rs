/// Where in the conversion a plugin runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStage {
    /// On the Markdown source, before comrak sees it
    Before,
    /// On the HTML comrak produced
    After,
}

/// A text transform hooked into Markdown conversion.
///
/// Plugins of one stage run in the order they were added.
pub trait MarkdownPlugin: Send + Sync {
    /// Name used in configuration and log messages
    fn name(&self) -> &str;

    fn stage(&self) -> PluginStage {
        PluginStage::After
    }

    fn apply(&self, input: &str) -> String;
}
