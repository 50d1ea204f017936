pub mod api_routes;
pub mod preview_routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;
use api_routes::proxy_handler;
use preview_routes::preview_handler;

pub fn router(state: AppState, config: &Config) -> Router {
    // Unknown paths fall back to index.html so the single-page app loads.
    let index = config.static_dir.join("index.html");
    let assets = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/api/{*path}", any(proxy_handler))
        .route("/preview", post(preview_handler))
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chatbot_render::RenderConfig;
    use tower::ServiceExt;

    use crate::service::render_service::RenderService;
    use crate::upstream::UpstreamClient;

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "STATIC_DIR" => Some(std::env::temp_dir().display().to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn test_router() -> Router {
        let config = test_config();
        let state = AppState {
            upstream: UpstreamClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap(),
            render: RenderService::new(&RenderConfig::default()),
        };
        router(state, &config)
    }

    #[tokio::test]
    async fn preview_returns_html_fragment() {
        let request = Request::post("/preview")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"role":"assistant","content":"**hi**"}"#))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<strong>hi</strong>"));
        assert!(html.starts_with("<div class=\"message assistant-message\">"));
    }

    #[tokio::test]
    async fn proxy_reports_unreachable_backend_as_json() {
        let request = Request::get("/api/conversations").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Chat backend"));
    }
}
