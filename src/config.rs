use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chatbot_render::{DataKind, MarkerRule, RenderConfig};

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_URL: &str = "http://localhost:5000";
const DEFAULT_STATIC_DIR: &str = "frontend/dist";
// Base64 image attachments travel inside the JSON body.
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
// The backend waits on the model and then on generation stats.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;

/// Settings for the development host, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
    pub render: RenderConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut render = RenderConfig::default();
        if let Some(theme) = non_empty(&lookup, "RENDER_THEME") {
            render.theme = theme;
        }
        if let Some(marker) = non_empty(&lookup, "RENDER_FINANCIAL_MARKER") {
            render.markers.push(MarkerRule { marker, kind: DataKind::Financial });
        }

        Ok(Self {
            port: parse(&lookup, "PORT", DEFAULT_PORT)?,
            upstream_url: non_empty(&lookup, "API_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            upstream_timeout: Duration::from_secs(parse(
                &lookup,
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            static_dir: non_empty(&lookup, "STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            max_body_bytes: parse(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            render,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match non_empty(lookup, key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| AppError::invalid_config(key, raw)),
    }
}
