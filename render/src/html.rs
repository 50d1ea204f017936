//! HTML fragments for rendered messages.

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::warn;

use crate::highlight::SyntaxHighlighter;
use crate::markdown::MarkdownFormatter;
use crate::models::Message;
use crate::segment::{Renderer, Segment};
use crate::stats::usage_lines;

/// Renders whole messages with a given formatter and highlighter.
pub struct MessageHtml<'r> {
    renderer: &'r Renderer,
    formatter: &'r dyn MarkdownFormatter,
    highlighter: &'r dyn SyntaxHighlighter,
}

impl<'r> MessageHtml<'r> {
    pub fn new(
        renderer: &'r Renderer,
        formatter: &'r dyn MarkdownFormatter,
        highlighter: &'r dyn SyntaxHighlighter,
    ) -> Self {
        Self { renderer, formatter, highlighter }
    }

    /// A complete message bubble: segments, then the usage footer if any.
    pub fn message(&self, message: &Message) -> String {
        let mut out = format!(
            "<div class=\"message {}-message\"><div class=\"message-content\">",
            message.role
        );
        for segment in self.renderer.segments(message) {
            out.push_str(&self.segment(&segment));
        }
        out.push_str("</div>");

        if let Some(lines) = usage_lines(message) {
            out.push_str("<div class=\"message-stats\">");
            for line in lines.iter() {
                out.push_str("<p>");
                out.push_str(&encode_text(line));
                out.push_str("</p>");
            }
            out.push_str("</div>");
        }

        out.push_str("</div>");
        out
    }

    pub fn segment(&self, segment: &Segment<'_>) -> String {
        match *segment {
            Segment::Image(src) => image_block(src),
            Segment::Markdown(text) => {
                format!("<div class=\"markdown\">{}</div>", markdown_html(self.formatter, text).html)
            }
            Segment::Code { language, code } => code_block(self.highlighter, language, code),
            Segment::Data { kind, text } => {
                format!("<pre class=\"{}\">{}</pre>", kind.css_class(), encode_text(text))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownHtml {
    pub html: String,
    /// Set when the formatter failed and `html` holds the escaped raw text.
    pub fell_back: bool,
}

/// Formats markdown, falling back to escaped preformatted text if the
/// formatter fails. The failure is logged and flagged, never propagated.
pub fn markdown_html(formatter: &dyn MarkdownFormatter, text: &str) -> MarkdownHtml {
    match formatter.format(text) {
        Ok(html) => MarkdownHtml { html, fell_back: false },
        Err(e) => {
            warn!("{e}; showing raw text instead");
            MarkdownHtml {
                html: format!("<pre class=\"markdown-fallback\">{}</pre>", encode_text(text)),
                fell_back: true,
            }
        }
    }
}

pub fn code_block(highlighter: &dyn SyntaxHighlighter, language: &str, code: &str) -> String {
    let highlighted = highlighter.highlight(language, code);
    format!(
        "<div class=\"code-block\"><div class=\"code-header\"><span>{}</span>\
         <button class=\"copy-button\" data-code=\"{}\">Copy</button></div>{}</div>",
        encode_text(language),
        encode_double_quoted_attribute(code),
        highlighted.html
    )
}

pub fn image_block(src: &str) -> String {
    if !is_safe_image_src(src) {
        warn!("Dropping image with unsupported source");
        return String::new();
    }
    format!(
        "<div class=\"message-image\"><img src=\"{}\" alt=\"User uploaded\"></div>",
        encode_double_quoted_attribute(src)
    )
}

/// Lowercased URL scheme, ignoring the whitespace and control characters
/// browsers skip. `None` for relative URLs.
fn scheme_of(url: &str) -> Option<String> {
    let compact: String = url.chars().filter(|c| !c.is_ascii_whitespace() && !c.is_control()).collect();
    let end = compact.find([':', '/', '?', '#'])?;
    compact[end..].starts_with(':').then(|| compact[..end].to_ascii_lowercase())
}

pub fn is_safe_link(url: &str) -> bool {
    match scheme_of(url) {
        None => true,
        Some(scheme) => matches!(scheme.as_str(), "http" | "https" | "mailto"),
    }
}

/// Image sources: `http(s)`, relative paths, and `data:image/...` URIs.
pub fn is_safe_image_src(src: &str) -> bool {
    match scheme_of(src).as_deref() {
        None => !src.trim().is_empty(),
        Some("http" | "https") => true,
        Some("data") => src.trim_start().to_ascii_lowercase().starts_with("data:image/"),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RenderError;
    use crate::highlight::{HighlightedCode, Syntect};
    use crate::markdown::CommonMark;
    use crate::models::Usage;

    struct Broken;

    impl MarkdownFormatter for Broken {
        fn format(&self, _text: &str) -> Result<String, RenderError> {
            Err(RenderError::markdown("boom"))
        }
    }

    struct Plain;

    impl SyntaxHighlighter for Plain {
        fn highlight(&self, _language: &str, code: &str) -> HighlightedCode {
            HighlightedCode::plain(code)
        }
    }

    #[test]
    fn message_bubble_contains_segments_in_order() {
        let renderer = Renderer::new();
        let html = MessageHtml::new(&renderer, &CommonMark, &Plain);
        let message = Message::assistant("Intro\n```py\nprint(\"<x>\")\n```\nOutro");
        let out = html.message(&message);

        let intro = out.find("Intro").unwrap();
        let code = out.find("code-block").unwrap();
        let outro = out.find("Outro").unwrap();
        assert!(intro < code && code < outro);
        assert!(out.starts_with("<div class=\"message assistant-message\">"));
        assert!(out.contains("data-code=\"print(&quot;&lt;x&gt;&quot;)\""));
        assert!(!out.contains("message-stats"));
    }

    #[test]
    fn usage_footer_is_appended() {
        let renderer = Renderer::new();
        let html = MessageHtml::new(&renderer, &CommonMark, &Plain);
        let message = Message::assistant("ok").with_usage(Usage {
            tokens_prompt: Some(2),
            tokens_completion: Some(1),
            total_cost: Some(0.5),
        });
        let out = html.message(&message);
        assert!(out.contains("<p>Total Cost: $0.500000</p>"));
    }

    #[test]
    fn formatter_failure_does_not_abort_render() {
        let renderer = Renderer::new();
        let syntect = Syntect::default();
        let html = MessageHtml::new(&renderer, &Broken, &syntect);
        let out = html.message(&Message::assistant("<b>hi</b>\n```rust\nfn f() {}\n```"));
        assert!(out.contains("<pre class=\"markdown-fallback\">&lt;b&gt;hi&lt;/b&gt;\n</pre>"));
        assert!(out.contains("code-block"));
    }

    #[test]
    fn formatter_failure_is_flagged() {
        let failed = markdown_html(&Broken, "a < b");
        assert!(failed.fell_back);
        assert_eq!(failed.html, "<pre class=\"markdown-fallback\">a &lt; b</pre>");

        let ok = markdown_html(&CommonMark, "a < b");
        assert!(!ok.fell_back);
        assert_eq!(ok.html, "<p>a &lt; b</p>\n");
    }

    #[test]
    fn unsafe_image_is_dropped() {
        assert_eq!(image_block("javascript:alert(1)"), "");
        assert!(image_block("data:image/png;base64,AA").contains("<img src=\"data:image/png;base64,AA\""));
    }

    #[test]
    fn link_schemes() {
        assert!(is_safe_link("https://example.com"));
        assert!(is_safe_link("/relative/path"));
        assert!(is_safe_link("#anchor"));
        assert!(!is_safe_link("JavaScript:alert(1)"));
        assert!(!is_safe_link("java\tscript:alert(1)"));
        assert!(!is_safe_link("data:text/html,<b>"));
    }

    #[test]
    fn image_sources() {
        assert!(is_safe_image_src("images/cat.png"));
        assert!(is_safe_image_src("DATA:image/jpeg;base64,AA"));
        assert!(!is_safe_image_src("data:text/html;base64,AA"));
        assert!(!is_safe_image_src("  "));
    }
}
