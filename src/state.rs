use crate::service::render_service::RenderService;
use crate::upstream::UpstreamClient;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub render: RenderService,
}
