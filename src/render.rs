//! Rasterizes a composed page to PNG with a headless Chromium.

use std::{path::PathBuf, sync::Arc, time::Duration};

use base64::Engine as _;
use headless_chrome::{protocol::cdp::Page, Browser, LaunchOptions};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("failed to load page: {0}")]
    Load(String),

    #[error("screenshot failed: {0}")]
    Capture(String),

    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Turns a finished HTML document into PNG bytes.
///
/// Implementations block; call them through [`render_blocking`] from async code.
pub trait Renderer: Send + Sync {
    fn render_png(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub chrome_path: Option<PathBuf>,
    pub sandbox: bool,
    pub width: u32,
    pub height: u32,
    pub timeout: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            sandbox: true,
            width: 1024,
            height: 768,
            timeout: Duration::from_secs(30),
        }
    }
}

// Resolves once every <img> has loaded or failed and web fonts are ready.
const WAIT_FOR_IDLE: &str = r#"
(async () => {
    await Promise.all(Array.from(document.images).map(img => img.complete
        ? Promise.resolve()
        : new Promise(resolve => { img.onload = resolve; img.onerror = resolve; })));
    await document.fonts.ready;
    return true;
})()
"#;

/// One browser per render. The `Browser` owns the Chromium process and kills
/// it on drop, so the session is released on every return path.
pub struct ChromeRenderer {
    settings: RenderSettings,
}

impl ChromeRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn launch(&self) -> Result<Browser, RenderError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.settings.sandbox)
            .window_size(Some((self.settings.width, self.settings.height)))
            .path(self.settings.chrome_path.clone())
            .idle_browser_timeout(self.settings.timeout)
            .build()
            .map_err(|e| RenderError::Launch(format!("invalid launch options: {e}")))?;

        Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))
    }
}

impl Renderer for ChromeRenderer {
    fn render_png(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(format!("failed to open tab: {e}")))?;
        tab.set_default_timeout(self.settings.timeout);

        let url = format!(
            "data:text/html;charset=utf-8;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(html)
        );
        tab.navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| RenderError::Load(e.to_string()))?;
        tab.evaluate(WAIT_FOR_IDLE, true)
            .map_err(|e| RenderError::Load(format!("waiting for assets: {e}")))?;

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: self.settings.width as f64,
            height: self.settings.height as f64,
            scale: 1.0,
        };
        let png = tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| RenderError::Capture(e.to_string()))?;

        debug!(bytes = png.len(), "captured stream card");
        Ok(png)
    }
}

/// Runs `renderer` on tokio's blocking pool.
pub async fn render_blocking(renderer: Arc<dyn Renderer>, html: String) -> Result<Vec<u8>, RenderError> {
    tokio::task::spawn_blocking(move || renderer.render_png(&html)).await?
}
