use std::sync::Arc;

use crate::config::Config;
use crate::models::ProblemSettings;

use self::grade_publisher::BroadcastGradePublisher;
use self::locks::StudentLocks;
use self::store::{InMemoryStore, ProblemStore, RedisStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ProblemStore>,
    pub grades: Arc<BroadcastGradePublisher>,
    pub locks: StudentLocks,
    pub defaults: Arc<ProblemSettings>,
}

impl AppState {
    /// Connects to Redis when a URI is configured, otherwise keeps everything
    /// in process memory.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn ProblemStore> = match config.redis_uri.as_deref() {
            Some(uri) => Arc::new(RedisStore::connect(uri).await?),
            None => {
                tracing::warn!("REDIS_URI not set, problem state is kept in memory only");
                Arc::new(InMemoryStore::new())
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn ProblemStore>) -> Self {
        let defaults = Arc::new(config.problem_defaults.clone());
        Self {
            config,
            store,
            grades: Arc::new(BroadcastGradePublisher::new()),
            locks: StudentLocks::new(),
            defaults,
        }
    }
}

pub mod answer_service;
pub mod credit_resolver;
pub mod display;
pub mod grade_publisher;
pub mod hint_service;
pub mod locks;
pub mod settings_service;
pub mod store;
