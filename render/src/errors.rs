use thiserror::Error;

/// Failures of the display collaborators. The segmenter itself cannot fail;
/// these are raised by formatter or highlighter implementations and are
/// caught per segment by the HTML layer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Markdown formatting failed: {message}")]
    Markdown { message: String },

    #[error("Highlighting '{language}' failed: {message}")]
    Highlight { language: String, message: String },
}

impl RenderError {
    pub fn markdown(message: impl Into<String>) -> Self {
        RenderError::Markdown { message: message.into() }
    }

    pub fn highlight(language: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Highlight { language: language.into(), message: message.into() }
    }
}

/// Rejections raised by [`crate::session::ChatSession`] before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("A request is already pending")]
    RequestPending,
}

impl SessionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::EmptyField { .. })
    }
}
