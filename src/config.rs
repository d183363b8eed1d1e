use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use anyhow::Context;

use crate::render::RenderSettings;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://pub-46e5ec14460c439081d4bed697e21c3a.r2.dev/";
pub const LOCAL_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// `None` means "try the local default"; see [`Config::redis_url_or_local`].
    pub redis_url: Option<String>,
    pub image_base_url: String,
    pub render: RenderSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(var("PORT"), "PORT", 5000)?;
        let bind: IpAddr = parse_or(var("BIND_ADDR"), "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;

        let timeout_secs: u64 = parse_or(var("RENDER_TIMEOUT_SECS"), "RENDER_TIMEOUT_SECS", 30)?;
        let sandbox: bool = parse_or(var("CHROME_SANDBOX"), "CHROME_SANDBOX", true)?;

        Ok(Config {
            addr: SocketAddr::new(bind, port),
            redis_url: var("REDIS_URL"),
            image_base_url: var("IMAGE_BASE_URL").unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_owned()),
            render: RenderSettings {
                chrome_path: var("CHROME_PATH").map(PathBuf::from),
                sandbox,
                timeout: Duration::from_secs(timeout_secs),
                ..RenderSettings::default()
            },
        })
    }

    pub fn redis_url_or_local(&self) -> &str {
        self.redis_url.as_deref().unwrap_or(LOCAL_REDIS_URL)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {value:?}")),
        None => Ok(default),
    }
}
