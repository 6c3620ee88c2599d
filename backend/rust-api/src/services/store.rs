use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::metrics::track_store_operation;
use crate::models::{ProblemSettings, StudentKey, StudentState};

const KEY_PREFIX: &str = "anumeric";
const PING_TIMEOUT_MS: u64 = 500;

/// Persistence for the two scopes of a problem: settings shared by all
/// students and state owned by a single student.
///
/// `None` means nothing was stored yet; callers fall back to defaults.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn load_settings(&self, problem_id: &str) -> Result<Option<ProblemSettings>, StoreError>;

    async fn save_settings(
        &self,
        problem_id: &str,
        settings: &ProblemSettings,
    ) -> Result<(), StoreError>;

    async fn load_state(&self, key: &StudentKey) -> Result<Option<StudentState>, StoreError>;

    async fn save_state(&self, key: &StudentKey, state: &StudentState) -> Result<(), StoreError>;

    /// Backend name and reachability, used by the health check.
    async fn ping(&self) -> Result<&'static str, StoreError>;
}

#[derive(Default)]
pub struct InMemoryStore {
    settings: RwLock<HashMap<String, ProblemSettings>>,
    states: RwLock<HashMap<StudentKey, StudentState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProblemStore for InMemoryStore {
    async fn load_settings(&self, problem_id: &str) -> Result<Option<ProblemSettings>, StoreError> {
        Ok(self.settings.read().await.get(problem_id).cloned())
    }

    async fn save_settings(
        &self,
        problem_id: &str,
        settings: &ProblemSettings,
    ) -> Result<(), StoreError> {
        self.settings
            .write()
            .await
            .insert(problem_id.to_string(), settings.clone());
        Ok(())
    }

    async fn load_state(&self, key: &StudentKey) -> Result<Option<StudentState>, StoreError> {
        Ok(self.states.read().await.get(key).cloned())
    }

    async fn save_state(&self, key: &StudentKey, state: &StudentState) -> Result<(), StoreError> {
        self.states.write().await.insert(key.clone(), state.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<&'static str, StoreError> {
        Ok("memory")
    }
}

/// Stores settings and state as JSON strings in Redis.
pub struct RedisStore {
    redis: ConnectionManager,
}

impl RedisStore {
    /// Connects and verifies the connection with a PING.
    pub async fn connect(redis_uri: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_uri)?;

        tracing::info!("Attempting to connect to Redis...");

        let redis = tokio::time::timeout(Duration::from_secs(30), ConnectionManager::new(client))
            .await
            .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

        tracing::info!("Redis ConnectionManager created, testing with PING...");

        let mut conn = redis.clone();
        tokio::time::timeout(
            Duration::from_secs(5),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;

        tracing::info!("Redis connection established successfully");

        Ok(Self { redis })
    }

    pub fn settings_key(problem_id: &str) -> String {
        format!("{}:settings:{}", KEY_PREFIX, problem_id)
    }

    pub fn state_key(key: &StudentKey) -> String {
        format!("{}:state:{}:{}", KEY_PREFIX, key.problem_id, key.student_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        let raw = serde_json::to_string(value)?;
        redis::cmd("SET")
            .arg(key)
            .arg(raw)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProblemStore for RedisStore {
    async fn load_settings(&self, problem_id: &str) -> Result<Option<ProblemSettings>, StoreError> {
        let key = Self::settings_key(problem_id);
        track_store_operation("get", "settings", self.get_json(&key)).await
    }

    async fn save_settings(
        &self,
        problem_id: &str,
        settings: &ProblemSettings,
    ) -> Result<(), StoreError> {
        let key = Self::settings_key(problem_id);
        track_store_operation("set", "settings", self.set_json(&key, settings)).await
    }

    async fn load_state(&self, key: &StudentKey) -> Result<Option<StudentState>, StoreError> {
        let key = Self::state_key(key);
        track_store_operation("get", "state", self.get_json(&key)).await
    }

    async fn save_state(&self, key: &StudentKey, state: &StudentState) -> Result<(), StoreError> {
        let key = Self::state_key(key);
        track_store_operation("set", "state", self.set_json(&key, state)).await
    }

    async fn ping(&self) -> Result<&'static str, StoreError> {
        let mut conn = self.redis.clone();
        tokio::time::timeout(
            Duration::from_millis(PING_TIMEOUT_MS),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| StoreError::Timeout(PING_TIMEOUT_MS))??;
        Ok("redis")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_keys() {
        assert_eq!(RedisStore::settings_key("p1"), "anumeric:settings:p1");
        assert_eq!(
            RedisStore::state_key(&StudentKey::new("p1", "s1")),
            "anumeric:state:p1:s1"
        );
    }

    #[tokio::test]
    async fn test_in_memory_store_scopes() {
        let store = InMemoryStore::new();
        let key = StudentKey::new("p1", "s1");

        assert_eq!(store.load_settings("p1").await.unwrap(), None);
        assert_eq!(store.load_state(&key).await.unwrap(), None);

        let settings = ProblemSettings {
            instructor_answer: 3.0,
            ..ProblemSettings::default()
        };
        store.save_settings("p1", &settings).await.unwrap();
        assert_eq!(store.load_settings("p1").await.unwrap(), Some(settings));
        assert_eq!(store.load_settings("p2").await.unwrap(), None);

        let state = StudentState {
            count_attempts: 2,
            ..StudentState::default()
        };
        store.save_state(&key, &state).await.unwrap();
        assert_eq!(store.load_state(&key).await.unwrap(), Some(state));
        assert_eq!(
            store.load_state(&StudentKey::new("p1", "s2")).await.unwrap(),
            None
        );
        assert_eq!(store.ping().await.unwrap(), "memory");
    }
}
