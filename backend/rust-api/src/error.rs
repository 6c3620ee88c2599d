use thiserror::Error;

/// Failures of the settings/state store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to (de)serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store timeout after {0}ms")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid settings: {}", .0.join("; "))]
    Validation(Vec<String>),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
