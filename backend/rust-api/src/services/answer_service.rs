use std::sync::Arc;

use crate::error::ServiceResult;
use crate::metrics::ANSWERS_SUBMITTED_TOTAL;
use crate::models::answer::{
    SaveAnswerRequest, SaveAnswerResponse, SubmitAnswerRequest, SubmitAnswerResponse,
};
use crate::models::grade::GradeEvent;
use crate::models::view::StudentView;
use crate::models::{ProblemSettings, StudentKey, StudentState};
use crate::utils::number::parse_number;

use super::credit_resolver::{finalize_score, render_feedback, select_best};
use super::display;
use super::grade_publisher::GradePublisher;
use super::locks::StudentLocks;
use super::settings_service::load_settings;
use super::store::ProblemStore;

pub struct AnswerService {
    store: Arc<dyn ProblemStore>,
    defaults: Arc<ProblemSettings>,
    locks: StudentLocks,
    grades: Arc<dyn GradePublisher>,
}

impl AnswerService {
    pub fn new(
        store: Arc<dyn ProblemStore>,
        defaults: Arc<ProblemSettings>,
        locks: StudentLocks,
        grades: Arc<dyn GradePublisher>,
    ) -> Self {
        Self {
            store,
            defaults,
            locks,
            grades,
        }
    }

    pub async fn student_view(&self, key: &StudentKey) -> ServiceResult<StudentView> {
        let settings = load_settings(self.store.as_ref(), &self.defaults, &key.problem_id).await?;
        let state = self.load_state(key).await?;
        Ok(display::student_view(&settings, &state))
    }

    /// Scores a submission.
    ///
    /// A non-numeric answer is stored but neither counted nor scored. Once the
    /// attempt limit is reached the answer is stored and the previous result
    /// is returned unchanged.
    pub async fn submit_answer(
        &self,
        key: &StudentKey,
        req: &SubmitAnswerRequest,
    ) -> ServiceResult<SubmitAnswerResponse> {
        tracing::info!(
            "Processing answer submission: problem={}, student={}, answer={}",
            key.problem_id,
            key.student_id,
            req.student_answer
        );

        let _guard = self.locks.acquire(key).await;
        let settings = load_settings(self.store.as_ref(), &self.defaults, &key.problem_id).await?;
        let mut state = self.load_state(key).await?;

        state.student_answer = req.student_answer.clone();
        state.student_answer_value = parse_number(&req.student_answer);

        let Some(student_value) = state.student_answer_value else {
            self.save_state(key, &state).await?;
            ANSWERS_SUBMITTED_TOTAL
                .with_label_values(&["non_numeric"])
                .inc();
            tracing::info!("Non-numeric answer ignored: {}", key);
            return Ok(SubmitAnswerResponse::acknowledged());
        };

        if !settings.accepts_attempt(state.count_attempts) {
            self.save_state(key, &state).await?;
            ANSWERS_SUBMITTED_TOTAL.with_label_values(&["gated"]).inc();
            tracing::warn!(
                "Attempt limit reached: {}, count_attempts={}, max_attempts={}",
                key,
                state.count_attempts,
                settings.max_attempts
            );
            return Ok(SubmitAnswerResponse::scored(display::submit_result(
                &settings, &state,
            )));
        }

        state.count_attempts += 1;
        let credit_match = select_best(
            &settings.credit_list,
            settings.instructor_answer,
            &state.student_answer,
            student_value,
        );
        state.feedback_message = render_feedback(credit_match.as_ref(), &settings.feedback_default);
        state.score = finalize_score(credit_match.as_ref());
        state.credit_match = credit_match;

        self.save_state(key, &state).await?;
        ANSWERS_SUBMITTED_TOTAL.with_label_values(&["scored"]).inc();

        self.grades.publish(GradeEvent::new(
            &key.problem_id,
            &key.student_id,
            state.score,
        ));

        tracing::info!(
            "Answer scored: {}, count_attempts={}, score={}, matched={}",
            key,
            state.count_attempts,
            state.score,
            state.credit_match.is_some()
        );

        Ok(SubmitAnswerResponse::scored(display::submit_result(
            &settings, &state,
        )))
    }

    /// Stores a draft answer without scoring it. Drafts are dropped once the
    /// attempt limit is reached.
    pub async fn save_answer(
        &self,
        key: &StudentKey,
        req: &SaveAnswerRequest,
    ) -> ServiceResult<SaveAnswerResponse> {
        tracing::info!("Saving draft answer: {}", key);

        let _guard = self.locks.acquire(key).await;
        let settings = load_settings(self.store.as_ref(), &self.defaults, &key.problem_id).await?;
        let mut state = self.load_state(key).await?;

        if settings.accepts_attempt(state.count_attempts) {
            state.student_answer = req.student_answer.clone();
            self.save_state(key, &state).await?;
        } else {
            tracing::warn!("Draft not stored, attempt limit reached: {}", key);
        }

        Ok(display::save_response(&settings, &state))
    }

    async fn load_state(&self, key: &StudentKey) -> ServiceResult<StudentState> {
        Ok(self.store.load_state(key).await?.unwrap_or_default())
    }

    async fn save_state(&self, key: &StudentKey, state: &StudentState) -> ServiceResult<()> {
        self.store.save_state(key, state).await.map_err(|e| {
            tracing::error!("Failed to save state for {}: {}", key, e);
            e.into()
        })
    }
}
