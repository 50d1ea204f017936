//! Splits a chat message into display segments: an optional leading image,
//! then markdown text and fenced code blocks in source order.
//!
//! Fence grammar: three backticks at the start of a line, a language of
//! `[A-Za-z0-9_]+`, a newline, the body (shortest match, possibly empty), a
//! newline and three closing backticks. Anything else stays in the text.

use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};
use serde::Deserialize;

use crate::classify::{ContentClassifier, DataKind, MarkerClassifier, MarkerRule};
use crate::models::Message;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^```([A-Za-z0-9_]+)\n(?s:(.*?)\n)??```").expect("fence regex pattern is valid")
});

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// One unit of rendered output. Borrows from the message it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Image(&'a str),
    Markdown(&'a str),
    Code { language: &'a str, code: &'a str },
    Data { kind: DataKind, text: &'a str },
}

impl<'a> Segment<'a> {
    /// Text carried by the segment; `None` for images.
    pub fn source_text(&self) -> Option<&'a str> {
        match *self {
            Segment::Image(_) => None,
            Segment::Markdown(text) | Segment::Data { text, .. } => Some(text),
            Segment::Code { code, .. } => Some(code),
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// syntect theme used for code blocks.
    pub theme: String,
    pub markers: Vec<MarkerRule>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { theme: DEFAULT_THEME.to_string(), markers: Vec::new() }
    }
}

/// Stateless message segmenter plus the classifiers applied to its text spans.
#[derive(Default)]
pub struct Renderer {
    classifiers: Vec<Box<dyn ContentClassifier>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        config
            .markers
            .iter()
            .fold(Self::new(), |renderer, rule| renderer.with_classifier(MarkerClassifier::from(rule)))
    }

    /// Registers a classifier. Earlier registrations take precedence.
    pub fn with_classifier(mut self, classifier: impl ContentClassifier + 'static) -> Self {
        self.classifiers.push(Box::new(classifier));
        self
    }

    pub fn segments<'a>(&'a self, message: &'a Message) -> Segments<'a> {
        Segments {
            classifiers: &self.classifiers,
            content: &message.content,
            image: message.image_url.as_deref(),
            fences: FENCE_RE.captures_iter(&message.content),
            cursor: 0,
            queued: None,
            exhausted: false,
        }
    }

    pub fn render<'a>(&'a self, message: &'a Message) -> Vec<Segment<'a>> {
        self.segments(message).collect()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("classifiers", &self.classifiers.len()).finish()
    }
}

fn classify_with(classifiers: &[Box<dyn ContentClassifier>], span: &str) -> Option<DataKind> {
    classifiers.iter().find_map(|c| c.classify(span))
}

/// Renders with no classifiers registered.
pub fn render(message: &Message) -> Vec<Segment<'_>> {
    static PLAIN: LazyLock<Renderer> = LazyLock::new(Renderer::new);
    PLAIN.render(message)
}

/// Lazy scan over a message. Each call to `next` advances at most one fence.
pub struct Segments<'a> {
    classifiers: &'a [Box<dyn ContentClassifier>],
    content: &'a str,
    image: Option<&'a str>,
    fences: CaptureMatches<'static, 'a>,
    cursor: usize,
    queued: Option<Segment<'a>>,
    exhausted: bool,
}

impl<'a> Segments<'a> {
    fn text(&self, span: &'a str) -> Segment<'a> {
        match classify_with(self.classifiers, span) {
            Some(kind) => Segment::Data { kind, text: span },
            None => Segment::Markdown(span),
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if let Some(src) = self.image.take() {
            return Some(Segment::Image(src));
        }
        if let Some(segment) = self.queued.take() {
            return Some(segment);
        }
        if self.exhausted {
            return None;
        }

        match self.fences.next() {
            Some(caps) => {
                let whole = caps.get(0)?;
                let code = Segment::Code {
                    language: caps.get(1).map_or("", |m| m.as_str()),
                    code: caps.get(2).map_or("", |m| m.as_str()).trim(),
                };
                let before = &self.content[self.cursor..whole.start()];
                self.cursor = whole.end();
                if before.is_empty() {
                    Some(code)
                } else {
                    self.queued = Some(code);
                    Some(self.text(before))
                }
            }
            None => {
                self.exhausted = true;
                let rest = &self.content[self.cursor..];
                self.cursor = self.content.len();
                (!rest.is_empty()).then(|| self.text(rest))
            }
        }
    }
}

impl std::iter::FusedIterator for Segments<'_> {}
