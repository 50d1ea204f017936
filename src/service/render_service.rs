use std::sync::Arc;

use chatbot_render::{CommonMark, Message, MessageHtml, RenderConfig, Renderer, Syntect};
use tracing::debug;

use crate::errors::AppError;

const MAX_CONTENT_LENGTH: usize = 200_000;

/// Renders messages server side with the same pipeline the UI uses.
#[derive(Clone)]
pub struct RenderService {
    renderer: Arc<Renderer>,
    highlighter: Arc<Syntect>,
}

impl RenderService {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            renderer: Arc::new(Renderer::from_config(config)),
            highlighter: Arc::new(Syntect::new(config.theme.clone())),
        }
    }

    pub fn preview(&self, message: &Message) -> Result<String, AppError> {
        if message.content.len() > MAX_CONTENT_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "content".to_string(),
                max_length: MAX_CONTENT_LENGTH,
                actual_length: message.content.len(),
            });
        }

        let html = MessageHtml::new(&self.renderer, &CommonMark, self.highlighter.as_ref())
            .message(message);
        debug!("Rendered {} message into {} bytes", message.role, html.len());
        Ok(html)
    }
}
