use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use tracing_subscriber::{filter::filter_fn, layer::SubscriberExt, util::SubscriberInitExt, Layer};
use uuid::Uuid;

// Chromium's CDP chatter is logged at INFO by these crates.
const QUIET_TARGETS: [&str; 2] = ["headless_chrome", "tungstenite"];

pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        *metadata.level() <= tracing::Level::INFO
            && !QUIET_TARGETS.iter().any(|quiet| metadata.target().starts_with(quiet))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();
}

pub async fn trace_requests(request: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %Uuid::now_v7(),
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        response
    }
    .instrument(span)
    .await
}
