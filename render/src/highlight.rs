//! Syntax highlighting for code blocks, with a plain monospace fallback.

use std::sync::LazyLock;

use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use tracing::warn;

use crate::errors::RenderError;
use crate::segment::DEFAULT_THEME;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    pub html: String,
    /// `false` when the plain fallback was used.
    pub highlighted: bool,
}

impl HighlightedCode {
    pub fn plain(code: &str) -> Self {
        Self {
            html: format!(
                "<pre class=\"code-plain\"><code>{}</code></pre>",
                html_escape::encode_text(code)
            ),
            highlighted: false,
        }
    }
}

/// Styles `(language, code)` for display. Never fails: anything it cannot
/// handle comes back as plain text.
pub trait SyntaxHighlighter: Send + Sync {
    fn highlight(&self, language: &str, code: &str) -> HighlightedCode;
}

#[derive(Debug, Clone)]
pub struct Syntect {
    theme: String,
}

impl Default for Syntect {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl Syntect {
    pub fn new(theme: impl Into<String>) -> Self {
        Self { theme: theme.into() }
    }

    fn try_highlight(&self, language: &str, code: &str) -> Result<Option<String>, RenderError> {
        let Some(syntax) = find_syntax(language) else {
            return Ok(None);
        };
        let Some(theme) = THEME_SET.themes.get(&self.theme) else {
            warn!("Unknown highlight theme '{}', falling back to plain text", self.theme);
            return Ok(None);
        };
        highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme)
            .map(Some)
            .map_err(|e| RenderError::highlight(language, e.to_string()))
    }
}

impl SyntaxHighlighter for Syntect {
    fn highlight(&self, language: &str, code: &str) -> HighlightedCode {
        match self.try_highlight(language, code) {
            Ok(Some(html)) => HighlightedCode { html, highlighted: true },
            Ok(None) => HighlightedCode::plain(code),
            Err(e) => {
                warn!("{e}");
                HighlightedCode::plain(code)
            }
        }
    }
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    if language.is_empty() {
        return None;
    }
    let lower = language.to_ascii_lowercase();
    let token = match lower.as_str() {
        "shell" | "zsh" | "console" => "bash",
        "py3" | "python3" => "python",
        "golang" => "go",
        "yml" => "yaml",
        "md" => "markdown",
        "cplusplus" => "cpp",
        other => other,
    };
    SYNTAX_SET
        .find_syntax_by_token(token)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(token))
}
