use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chatbot_render::Message;

use crate::state::AppState;

/// POST `/preview` — renders one message to the HTML fragment the UI would show.
pub async fn preview_handler(
    State(state): State<AppState>,
    Json(message): Json<Message>,
) -> Response {
    match state.render.preview(&message) {
        Ok(html) => Html(html).into_response(),
        Err(err) => err.into_response(),
    }
}
