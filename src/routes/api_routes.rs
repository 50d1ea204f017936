use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// ANY `/api/*` — forwarded verbatim to the chat backend.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or(uri.path());

    match state.upstream.forward(method, path_and_query, &headers, body).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
