//! Syntax highlighting and preview rendering.
//!
//! Every function here degrades instead of failing: an unknown engine or a
//! highlighter error produces an escaped plain block, and both HTML paths run
//! through an ammonia allow-list that drops scripts and event handlers.

use pulldown_cmark::{html, Options, Parser};
use std::collections::{HashMap, HashSet};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Syntax-highlighting collaborator; syntax and theme sets are loaded once.
pub struct Renderer {
    syntaxes: SyntaxSet,
    theme: Option<Theme>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Build a renderer from the bundled syntax and theme definitions.
    pub fn new() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(HIGHLIGHT_THEME)
            .or_else(|| themes.themes.pop_first().map(|(_, theme)| theme));
        Self { syntaxes, theme }
    }

    /// Highlight `content` with the engine token resolved from the registry.
    ///
    /// Unknown tokens use the plain-text syntax; any highlighter error falls
    /// back to an escaped `<pre>` block. Never fails.
    pub fn highlight(&self, content: &str, engine: &str) -> String {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(engine)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        if let Some(theme) = &self.theme {
            match highlighted_html_for_string(content, &self.syntaxes, syntax, theme) {
                Ok(markup) => return markup,
                Err(err) => {
                    tracing::warn!("Highlighting failed for engine '{}': {}", engine, err);
                }
            }
        }
        format!(
            "<pre class=\"highlight\"><code>{}</code></pre>",
            ammonia::clean_text(content)
        )
    }
}

/// Convert Markdown to sanitized HTML.
///
/// Tables, strikethrough, footnotes, and heading attributes are enabled; the
/// result is cleaned against a restrictive allow-list so `<script>` and inline
/// event handlers can never survive.
pub fn markdown_preview(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(content, options);
    let mut raw = String::new();
    html::push_html(&mut raw, parser);

    ammonia::Builder::default()
        .tags(HashSet::from([
            "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "strong", "em", "u", "s", "del", "ul",
            "ol", "li", "blockquote", "pre", "code", "table", "thead", "tbody", "tr", "th", "td",
            "a", "img", "hr", "div", "span",
        ]))
        .generic_attributes(HashSet::new())
        .tag_attributes(HashMap::from([
            ("a", HashSet::from(["href", "title"])),
            ("img", HashSet::from(["src", "alt", "title", "width", "height"])),
            ("code", HashSet::from(["class"])),
            ("pre", HashSet::from(["class"])),
            ("div", HashSet::from(["class"])),
            ("span", HashSet::from(["class"])),
        ]))
        .clean(&raw)
        .to_string()
}

/// Sanitize raw HTML for display inside a sandboxed, script-disabled frame.
///
/// The allow-list is broader than the Markdown one (structural tags plus
/// `class`/`id`/`style`), but scripts and event-handler attributes are always
/// stripped regardless.
pub fn html_sandbox(content: &str) -> String {
    ammonia::Builder::default()
        .tags(HashSet::from([
            "html", "head", "body", "title", "meta", "link", "h1", "h2", "h3", "h4", "h5", "h6",
            "p", "br", "hr", "strong", "em", "u", "s", "del", "ins", "sub", "sup", "ul", "ol",
            "li", "dl", "dt", "dd", "blockquote", "pre", "code", "table", "thead", "tbody",
            "tfoot", "tr", "th", "td", "caption", "div", "span", "section", "article", "header",
            "footer", "nav", "aside", "a", "img", "figure", "figcaption", "details", "summary",
        ]))
        .generic_attributes(HashSet::from(["class", "id", "style"]))
        .tag_attributes(HashMap::from([
            ("a", HashSet::from(["href", "title", "target"])),
            ("img", HashSet::from(["src", "alt", "title", "width", "height"])),
            ("meta", HashSet::from(["charset", "name", "content"])),
            ("link", HashSet::from(["rel", "href", "type"])),
        ]))
        .clean(content)
        .to_string()
}

/// Present content as an SVG document.
///
/// Content already starting with `<svg` passes through unchanged; anything
/// else is wrapped in a default envelope so fragments still render.
pub fn svg_document(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.starts_with("<svg") {
        trimmed.to_string()
    } else {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 300\">{}</svg>",
            trimmed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_preview_never_emits_script() {
        let out = markdown_preview("hello <script>alert(1)</script> world");
        assert!(!out.contains("<script"), "output: {}", out);
        assert!(out.contains("hello"));
    }

    #[test]
    fn markdown_preview_renders_structure_and_links() {
        let out = markdown_preview("# Title\n\n[link](https://example.com)\n\n```rust\nfn x() {}\n```\n");
        assert!(out.contains("<h1"));
        assert!(out.contains("href=\"https://example.com\""));
        assert!(out.contains("<pre"));
    }

    #[test]
    fn markdown_preview_strips_event_handlers() {
        let out = markdown_preview("<img src=\"x\" onerror=\"alert(1)\">");
        assert!(!out.contains("onerror"), "output: {}", out);
    }

    #[test]
    fn html_sandbox_strips_scripts_but_keeps_styled_structure() {
        let out = html_sandbox(
            "<div style=\"color:red\" onclick=\"evil()\"><script>alert(1)</script><p>ok</p></div>",
        );
        assert!(!out.contains("<script"), "output: {}", out);
        assert!(!out.contains("alert(1)"), "output: {}", out);
        assert!(!out.contains("onclick"), "output: {}", out);
        assert!(out.contains("style=\"color:red\""));
        assert!(out.contains("<p>ok</p>"));
    }

    #[test]
    fn svg_document_wraps_fragments() {
        let out = svg_document("<circle cx=\"50\" cy=\"50\" r=\"40\"/>");
        assert!(out.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(out.contains("viewBox=\"0 0 400 300\""));
        assert!(out.ends_with("</svg>"));
    }

    #[test]
    fn svg_document_passes_through_full_documents() {
        let doc = "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect/></svg>";
        assert_eq!(svg_document(doc), doc);
        assert_eq!(svg_document(&format!("  {}  ", doc)), doc);
    }

    #[test]
    fn highlight_known_engine_produces_markup() {
        let renderer = Renderer::new();
        let out = renderer.highlight("def f():\n    return 1\n", "python");
        assert!(out.contains("return"));
    }

    #[test]
    fn highlight_unknown_engine_degrades_to_plain_text() {
        let renderer = Renderer::new();
        let out = renderer.highlight("some <tagged> text", "no-such-engine");
        assert!(!out.contains("<tagged>"), "raw markup must be escaped: {}", out);
        assert!(out.contains("some"));
    }
}
