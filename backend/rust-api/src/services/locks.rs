use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::StudentKey;

/// One async mutex per student and problem. Holding the guard serializes
/// load, compute and save for that student.
#[derive(Clone, Default)]
pub struct StudentLocks {
    inner: Arc<Mutex<HashMap<StudentKey, Arc<Mutex<()>>>>>,
}

impl StudentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &StudentKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            // Drop entries nobody holds or waits on.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(key.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_same_student_is_serialized() {
        let locks = StudentLocks::new();
        let key = StudentKey::new("p1", "s1");

        let guard = locks.acquire(&key).await;
        let blocked = timeout(Duration::from_millis(20), locks.acquire(&key)).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = timeout(Duration::from_millis(20), locks.acquire(&key)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_other_students_do_not_wait() {
        let locks = StudentLocks::new();
        let _guard = locks.acquire(&StudentKey::new("p1", "s1")).await;

        let other = timeout(
            Duration::from_millis(20),
            locks.acquire(&StudentKey::new("p1", "s2")),
        )
        .await;
        assert!(other.is_ok());
    }
}
