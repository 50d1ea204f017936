use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::errors::RenderError;
use crate::html::{is_safe_image_src, is_safe_link};

/// Turns free-form text into display HTML. Implementations must not let raw
/// markup or script through.
pub trait MarkdownFormatter: Send + Sync {
    fn format(&self, text: &str) -> Result<String, RenderError>;
}

/// CommonMark via pulldown-cmark, with raw HTML escaped and unsafe URLs
/// neutralised.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMark;

impl MarkdownFormatter for CommonMark {
    fn format(&self, text: &str) -> Result<String, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let events = Parser::new_ext(text, options).map(sanitize);
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        html::push_html(&mut out, events);
        Ok(out)
    }
}

fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralise(dest_url, is_safe_link),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralise(dest_url, is_safe_image_src),
            title,
            id,
        }),
        other => other,
    }
}

fn neutralise<'a>(url: CowStr<'a>, is_safe: fn(&str) -> bool) -> CowStr<'a> {
    if is_safe(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}
