//! HTML rendering of block markdown.
//!
//! Rendering happens per block after reconciliation and is not part of the
//! core's correctness; a host may swap in any [`HtmlRenderer`].

use std::path::Path;

use pulldown_cmark::{Parser, html};

use crate::parsing::MarkdownExtensions;

/// Renders markdown text to HTML.
pub trait HtmlRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// Wraps `content` in an HTML element named `tag`.
pub fn wrap_with_html_tag(tag: &str, content: &str) -> String {
    format!("<{tag}>{content}</{tag}>")
}

/// An optional `<style>` element applied to rendered documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    style: String,
}

impl Stylesheet {
    pub fn from_css(css: &str) -> Self {
        Self {
            style: wrap_with_html_tag("style", css),
        }
    }

    /// Reads a CSS file. A missing or unreadable file yields an empty style.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(css) => Self::from_css(&css),
            Err(e) => {
                log::warn!("Stylesheet {} unavailable, using empty style: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_empty()
    }

    /// The `<style>` element, or `""`.
    pub fn as_html(&self) -> &str {
        &self.style
    }
}

/// Default renderer backed by pulldown-cmark.
#[derive(Debug, Clone, Default)]
pub struct CmarkRenderer {
    extensions: MarkdownExtensions,
    stylesheet: Stylesheet,
}

impl CmarkRenderer {
    pub fn new(extensions: MarkdownExtensions) -> Self {
        Self {
            extensions,
            stylesheet: Stylesheet::default(),
        }
    }

    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Renders a complete HTML page with the stylesheet in its head.
    pub fn render_page(&self, markdown: &str) -> String {
        format!(
            "<html><head>{}</head><body>{}</body></html>",
            self.stylesheet.as_html(),
            self.render(markdown)
        )
    }
}

impl HtmlRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.extensions.to_options());
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}
