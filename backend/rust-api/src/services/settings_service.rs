use serde_json::Value;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::metrics::SETTINGS_UPDATES_TOTAL;
use crate::models::ProblemSettings;

use super::store::ProblemStore;

pub struct SettingsService {
    store: Arc<dyn ProblemStore>,
    defaults: Arc<ProblemSettings>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn ProblemStore>, defaults: Arc<ProblemSettings>) -> Self {
        Self { store, defaults }
    }

    pub async fn get_settings(&self, problem_id: &str) -> ServiceResult<ProblemSettings> {
        load_settings(self.store.as_ref(), &self.defaults, problem_id).await
    }

    /// Stores authored settings where omitted keys keep the configured
    /// defaults rather than the built-in ones.
    pub async fn update_settings_partial(
        &self,
        problem_id: &str,
        authored: Value,
    ) -> ServiceResult<ProblemSettings> {
        let settings = merge_over_defaults(&self.defaults, authored).map_err(|e| {
            tracing::warn!("Malformed settings for problem={}: {}", problem_id, e);
            SETTINGS_UPDATES_TOTAL.with_label_values(&["rejected"]).inc();
            e
        })?;
        self.update_settings(problem_id, settings).await
    }

    /// Validates and stores new settings. Invalid settings are never stored.
    pub async fn update_settings(
        &self,
        problem_id: &str,
        settings: ProblemSettings,
    ) -> ServiceResult<ProblemSettings> {
        if let Err(messages) = settings.check() {
            tracing::warn!(
                "Rejected settings for problem={}: {}",
                problem_id,
                messages.join("; ")
            );
            SETTINGS_UPDATES_TOTAL.with_label_values(&["rejected"]).inc();
            return Err(ServiceError::Validation(messages));
        }

        self.store.save_settings(problem_id, &settings).await?;
        SETTINGS_UPDATES_TOTAL.with_label_values(&["saved"]).inc();

        tracing::info!(
            "Settings saved: problem={}, instructor_answer={}, max_attempts={}, weight={}, credit_entries={}, hints={}",
            problem_id,
            settings.instructor_answer,
            settings.max_attempts,
            settings.weight,
            settings.credit_list.len(),
            settings.hints.len()
        );

        Ok(settings)
    }
}

/// Overlays the top-level keys of `authored` on `defaults`.
pub fn merge_over_defaults(
    defaults: &ProblemSettings,
    authored: Value,
) -> ServiceResult<ProblemSettings> {
    let Value::Object(authored) = authored else {
        return Err(ServiceError::Validation(vec![
            "Settings must be a JSON object".to_string(),
        ]));
    };
    let mut merged = match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => map,
        Ok(_) => serde_json::Map::new(),
        Err(e) => return Err(ServiceError::Validation(vec![e.to_string()])),
    };
    merged.extend(authored);

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| ServiceError::Validation(vec![e.to_string()]))
}

/// Stored settings of a problem, or the configured defaults when the problem
/// was never authored.
pub async fn load_settings(
    store: &dyn ProblemStore,
    defaults: &ProblemSettings,
    problem_id: &str,
) -> ServiceResult<ProblemSettings> {
    match store.load_settings(problem_id).await? {
        Some(settings) => Ok(settings),
        None => {
            tracing::debug!("No settings stored for problem={}, using defaults", problem_id);
            Ok(defaults.clone())
        }
    }
}
