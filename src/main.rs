use std::sync::Arc;

use streamcard::{app, trace, AppState, AssetUrls, ChromeRenderer, Config, KvStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trace::init();
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    let store = KvStore::connect(config.redis_url_or_local()).await;
    info!(connected = store.is_connected(), "auxiliary store initialized");

    let renderer = ChromeRenderer::new(config.render.clone());
    let settings = renderer.settings();
    info!(
        chrome = ?settings.chrome_path,
        sandbox = settings.sandbox,
        viewport = %format!("{}x{}", settings.width, settings.height),
        timeout_secs = settings.timeout.as_secs(),
        "renderer configured"
    );

    let app_state = AppState {
        renderer: Arc::new(renderer),
        assets: AssetUrls::new(config.image_base_url.clone()),
        store,
    };

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "listening");
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
