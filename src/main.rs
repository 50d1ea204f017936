mod config;
mod errors;
mod routes;
mod service;
mod state;
mod upstream;

use tracing::info;

use crate::config::Config;
use crate::service::render_service::RenderService;
use crate::state::AppState;
use crate::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ai_chatbot=debug,chatbot_render=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let upstream = UpstreamClient::new(&config.upstream_url, config.upstream_timeout)?;
    let render = RenderService::new(&config.render);
    let state = AppState { upstream, render };

    info!(
        "Forwarding /api to {} and serving {}",
        config.upstream_url,
        config.static_dir.display()
    );

    let app = routes::router(state, &config);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
