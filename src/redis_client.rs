use redis::{aio::MultiplexedConnection, Client};
use tracing::info;

use crate::config::RedisConfig;

#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    /// Opens a multiplexed connection and checks it with a PING.
    pub async fn connect(config: &RedisConfig) -> redis::RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Redis connected, catalog TTL {}s", config.catalog_ttl_seconds);
        Ok(RedisClient { conn })
    }
}
