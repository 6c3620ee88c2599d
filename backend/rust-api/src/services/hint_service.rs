use std::sync::Arc;

use crate::error::ServiceResult;
use crate::metrics::HINTS_REQUESTED_TOTAL;
use crate::models::answer::STATUS_SUCCESS;
use crate::models::hint::HintResponse;
use crate::models::{ProblemSettings, StudentKey};

use super::display;
use super::locks::StudentLocks;
use super::settings_service::load_settings;
use super::store::ProblemStore;

pub struct HintService {
    store: Arc<dyn ProblemStore>,
    defaults: Arc<ProblemSettings>,
    locks: StudentLocks,
}

impl HintService {
    pub fn new(
        store: Arc<dyn ProblemStore>,
        defaults: Arc<ProblemSettings>,
        locks: StudentLocks,
    ) -> Self {
        Self {
            store,
            defaults,
            locks,
        }
    }

    /// Returns the next hint in rotation and advances the student's counter.
    /// Hints never affect score or attempts.
    pub async fn request_hint(&self, key: &StudentKey) -> ServiceResult<HintResponse> {
        let _guard = self.locks.acquire(key).await;
        let settings = load_settings(self.store.as_ref(), &self.defaults, &key.problem_id).await?;
        let mut state = self.store.load_state(key).await?.unwrap_or_default();

        let hint_message = display::hint_message(&settings, state.hint_counter);
        state.hint_counter = state.hint_counter.wrapping_add(1);
        self.store.save_state(key, &state).await?;

        let available = if hint_message.is_some() { "available" } else { "none" };
        HINTS_REQUESTED_TOTAL.with_label_values(&[available]).inc();

        tracing::info!(
            "Hint requested: {}, hint_counter={}, hints={}",
            key,
            state.hint_counter,
            settings.hints.len()
        );

        Ok(HintResponse {
            status: STATUS_SUCCESS.to_string(),
            hint_message: hint_message.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::InMemoryStore;

    fn service(hints: &[&str]) -> (HintService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let settings = ProblemSettings {
            hints: hints.iter().map(|hint| hint.to_string()).collect(),
            ..ProblemSettings::default()
        };
        let service = HintService::new(store.clone(), Arc::new(settings), StudentLocks::new());
        (service, store)
    }

    #[tokio::test]
    async fn test_hints_rotate() {
        let (service, _) = service(&["Check units", "Divide by two"]);
        let key = StudentKey::new("p1", "s1");

        let messages: Vec<String> = {
            let mut messages = Vec::new();
            for _ in 0..3 {
                messages.push(service.request_hint(&key).await.unwrap().hint_message);
            }
            messages
        };
        assert_eq!(
            messages,
            vec![
                "Hint (1 of 2): Check units",
                "Hint (2 of 2): Divide by two",
                "Hint (1 of 2): Check units",
            ]
        );
    }

    #[tokio::test]
    async fn test_hint_counter_is_per_student() {
        let (service, store) = service(&["Only hint"]);
        let first = StudentKey::new("p1", "s1");
        let second = StudentKey::new("p1", "s2");

        service.request_hint(&first).await.unwrap();
        service.request_hint(&first).await.unwrap();
        service.request_hint(&second).await.unwrap();

        let state = store.load_state(&first).await.unwrap().unwrap();
        assert_eq!(state.hint_counter, 2);
        assert_eq!(state.count_attempts, 0);
        let state = store.load_state(&second).await.unwrap().unwrap();
        assert_eq!(state.hint_counter, 1);
    }

    #[tokio::test]
    async fn test_no_hints_returns_empty_message() {
        let (service, store) = service(&[]);
        let key = StudentKey::new("p1", "s1");

        let response = service.request_hint(&key).await.unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(response.hint_message, "");
        assert_eq!(store.load_state(&key).await.unwrap().unwrap().hint_counter, 1);
    }
}
