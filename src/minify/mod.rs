//! HTML minification behind a small trait so the pipeline can swap it out.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Something that shrinks a rendered HTML document
pub trait Minifier: Send + Sync + fmt::Debug {
    fn minify(&self, html: &str) -> String;
}

/// Knobs for [`HtmlMinifier`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyOptions {
    /// minify-html always collapses whitespace, so `false` turns the
    /// minifier off and the options below are ignored
    pub collapse_whitespace: bool,
    pub remove_comments: bool,
    /// Always applied by minify-html; kept so existing configs parse
    pub collapse_boolean_attributes: bool,
    /// Drop optional closing tags and the `<html>`/`<head>` opening tags
    pub remove_optional_tags: bool,
    pub minify_js: bool,
    pub minify_css: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            remove_comments: true,
            collapse_boolean_attributes: true,
            remove_optional_tags: false,
            minify_js: true,
            minify_css: true,
        }
    }
}

/// Minifier backed by the `minify-html` crate
#[derive(Debug, Clone)]
pub struct HtmlMinifier {
    options: MinifyOptions,
}

impl HtmlMinifier {
    pub fn new(options: MinifyOptions) -> Self {
        if !options.collapse_whitespace {
            warn!("minify_options.collapse_whitespace is false: HTML is written unminified and the other minify options are ignored");
        }
        if !options.collapse_boolean_attributes {
            debug!("collapse_boolean_attributes = false is not supported and will be ignored");
        }
        Self { options }
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }

    /// False when the options turn minification off
    pub fn is_enabled(&self) -> bool {
        self.options.collapse_whitespace
    }

    fn cfg(&self) -> minify_html::Cfg {
        let mut cfg = minify_html::Cfg::new();
        cfg.keep_comments = !self.options.remove_comments;
        cfg.keep_closing_tags = !self.options.remove_optional_tags;
        cfg.keep_html_and_head_opening_tags = !self.options.remove_optional_tags;
        cfg.minify_js = self.options.minify_js;
        cfg.minify_css = self.options.minify_css;
        cfg
    }
}

impl Default for HtmlMinifier {
    fn default() -> Self {
        Self::new(MinifyOptions::default())
    }
}

impl Minifier for HtmlMinifier {
    fn minify(&self, html: &str) -> String {
        if !self.is_enabled() {
            return html.to_string();
        }
        let minified = minify_html::minify(html.as_bytes(), &self.cfg());
        String::from_utf8_lossy(&minified).into_owned()
    }
}

/// Passes documents through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMinifier;

impl Minifier for NoopMinifier {
    fn minify(&self, html: &str) -> String {
        html.to_string()
    }
}
