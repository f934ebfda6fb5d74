use crate::backfill::CHUNK_SIZE;
use crate::error::{BackfillError, Result};

/// Runtime configuration for the backfill job, sourced from the environment.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub database_url: String,
    pub redis_url: String,
    pub queue_name: String,
    pub chunk_size: i64,
    pub max_connections: u32,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/group_attributes_development".to_string(),
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            queue_name: "group_attributes_snapshots".to_string(),
            chunk_size: CHUNK_SIZE,
            max_connections: 5,
        }
    }
}

impl BackfillConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        if let Ok(redis_url) = std::env::var("REDIS_URL") {
            config.redis_url = redis_url;
        }

        if let Ok(queue_name) = std::env::var("BACKFILL_QUEUE_NAME") {
            config.queue_name = queue_name;
        }

        if let Ok(chunk_size) = std::env::var("BACKFILL_CHUNK_SIZE") {
            config.chunk_size = chunk_size.parse().map_err(|e| {
                BackfillError::Configuration(format!("Invalid chunk_size: {e}"))
            })?;
            if config.chunk_size <= 0 {
                return Err(BackfillError::Configuration(
                    "chunk_size must be positive".to_string(),
                ));
            }
        }

        if let Ok(max_connections) = std::env::var("BACKFILL_MAX_CONNECTIONS") {
            config.max_connections = max_connections.parse().map_err(|e| {
                BackfillError::Configuration(format!("Invalid max_connections: {e}"))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackfillConfig::default();
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.queue_name, "group_attributes_snapshots");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_invalid_chunk_size_rejected() {
        std::env::set_var("BACKFILL_CHUNK_SIZE", "not-a-number");
        let result = BackfillConfig::from_env();
        std::env::remove_var("BACKFILL_CHUNK_SIZE");
        assert!(matches!(result, Err(BackfillError::Configuration(_))));
    }
}
