pub mod appresult;
pub mod config;
pub mod render;
pub mod res;
pub mod store;
pub mod stream;
pub mod trace;

use std::sync::Arc;

use axum::{extract::FromRef, middleware, Router};

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use render::{ChromeRenderer, RenderError, Renderer};
pub use store::KvStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub renderer: Arc<dyn Renderer>,
    pub assets: AssetUrls,
    pub store: KvStore,
}

/// Builds links to the stream images and emotes hosted under one base URL.
#[derive(Debug, Clone)]
pub struct AssetUrls {
    pub base: String,
}

impl AssetUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn image(&self, name: &str) -> String {
        format!("{}{name}.png", self.base)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(stream::router())
        .with_state(state)
        .layer(middleware::from_fn(trace::trace_requests))
}
