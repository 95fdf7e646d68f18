use crate::cache::{CacheService, CATALOG_GENERATION_KEY, CATALOG_KEY};
use crate::models::FilmGraph;
use redis::AsyncCommands;

// Stores the graph only if no write has bumped the generation since it was read
const SET_IF_GENERATION: &str = r#"
    local current = redis.call('GET', KEYS[2]) or '0'
    if current ~= ARGV[1] then
        return 0
    end
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
"#;

impl CacheService {
    pub(super) async fn get_catalog_from_cache(&self) -> Result<Option<Vec<FilmGraph>>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(CATALOG_KEY).await?;
        let Some(data) = data else {
            return Ok(None);
        };
        let films = serde_json::from_str(&data).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
        })?;
        Ok(Some(films))
    }

    /// Current write generation of the catalog; 0 before the first write.
    pub(super) async fn catalog_generation(&self) -> Result<u64, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let generation: Option<u64> = conn.get(CATALOG_GENERATION_KEY).await?;
        Ok(generation.unwrap_or(0))
    }

    /// Caches `films` read at `generation`. Returns false when a write landed
    /// in between and the graph was dropped.
    pub(super) async fn save_catalog_to_cache(
        &self,
        films: &[FilmGraph],
        generation: u64,
    ) -> Result<bool, redis::RedisError> {
        let data = serde_json::to_string(films).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn.clone();
        let stored: i32 = redis::Script::new(SET_IF_GENERATION)
            .key(CATALOG_KEY)
            .key(CATALOG_GENERATION_KEY)
            .arg(generation)
            .arg(data)
            .arg(self.ttl_seconds)
            .invoke_async(&mut conn)
            .await?;
        Ok(stored == 1)
    }

    /// Bumps the generation and drops the cached graph in one transaction.
    pub async fn invalidate_catalog(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .incr(CATALOG_GENERATION_KEY, 1)
            .ignore()
            .del(CATALOG_KEY)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
