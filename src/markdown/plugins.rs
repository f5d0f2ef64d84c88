use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::markdown::types::MarkdownPlugin;

static MATH_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\$([\s\S]+?)\$\$").unwrap());
// No whitespace just inside either delimiter, so prices like `$5 or $10` stay text.
static MATH_INLINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([^\s$](?:[^$\n]*?[^\s$])?)\$").unwrap());
static CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre\b.*?</pre>|<code\b.*?</code>").unwrap());
static MERMAID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<pre lang="mermaid"><code>(.*?)</code></pre>"#).unwrap());

/// Names accepted by [`plugin_by_name`]
pub const BUILTIN_PLUGINS: [&str; 2] = ["math", "diagrams"];

/// Wraps `$$...$$` in `<div class="math display">` and `$...$` in
/// `<span class="math inline">` for a client-side renderer to pick up.
/// `<pre>` and `<code>` elements are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathPlugin;

impl MarkdownPlugin for MathPlugin {
    fn name(&self) -> &str {
        "math"
    }

    fn apply(&self, html: &str) -> String {
        outside_code(html, |text| {
            // Blocks first so `$$` is not read as two empty inline spans.
            let text = MATH_BLOCK_REGEX.replace_all(text, |caps: &Captures| {
                format!("<div class=\"math display\">{}</div>", caps[1].trim())
            });
            MATH_INLINE_REGEX
                .replace_all(&text, |caps: &Captures| {
                    format!("<span class=\"math inline\">{}</span>", &caps[1])
                })
                .into_owned()
        })
    }
}

/// Apply `transform` to the text between code elements
fn outside_code(html: &str, transform: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for code in CODE_REGEX.find_iter(html) {
        out.push_str(&transform(&html[last..code.start()]));
        out.push_str(code.as_str());
        last = code.end();
    }
    out.push_str(&transform(&html[last..]));
    out
}

/// Turns fenced `mermaid` code blocks into `<div class="mermaid">`
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramPlugin;

impl MarkdownPlugin for DiagramPlugin {
    fn name(&self) -> &str {
        "diagrams"
    }

    fn apply(&self, html: &str) -> String {
        MERMAID_REGEX
            .replace_all(html, |caps: &Captures| {
                format!("<div class=\"mermaid\">{}</div>", &caps[1])
            })
            .into_owned()
    }
}

/// Look up a built-in plugin by its configuration name
pub fn plugin_by_name(name: &str) -> Option<Arc<dyn MarkdownPlugin>> {
    match name {
        "math" => Some(Arc::new(MathPlugin)),
        "diagrams" => Some(Arc::new(DiagramPlugin)),
        _ => None,
    }
}
