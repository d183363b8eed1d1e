//! Optional auxiliary key-value store.
//!
//! The store is connected at startup and carried in the app state. Request
//! handling never depends on it; an unreachable Redis leaves it `Absent`.

use deadpool_redis::{Config, Pool, Runtime};
use tracing::{info, warn};

#[derive(Clone, Default)]
pub enum KvStore {
    #[default]
    Absent,
    Redis(Pool),
}

impl KvStore {
    /// Builds a pool for `redis_url` and pings it once. Any failure is logged
    /// and yields [`KvStore::Absent`].
    pub async fn connect(redis_url: &str) -> KvStore {
        let pool = match Config::from_url(redis_url).create_pool(Some(Runtime::Tokio1)) {
            Ok(pool) => pool,
            Err(err) => {
                warn!(?err, "could not create redis pool; continuing without store");
                return KvStore::Absent;
            }
        };

        let store = KvStore::Redis(pool);
        match store.ping().await {
            Ok(()) => {
                info!("connected to redis");
                store
            }
            Err(err) => {
                warn!(?err, "could not connect to redis; continuing without store");
                KvStore::Absent
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, KvStore::Redis(_))
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let KvStore::Redis(pool) = self else {
            anyhow::bail!("store is absent");
        };

        let mut conn = pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("failed to get redis connection: {e}"))?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis PING failed: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_store_refuses_ping() {
        let store = KvStore::default();
        assert!(!store.is_connected());
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn malformed_url_leaves_store_absent() {
        let store = KvStore::connect("not a redis url").await;
        assert!(!store.is_connected());
    }
}
