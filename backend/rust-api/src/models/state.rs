use serde::{Deserialize, Serialize};

use super::credit::CreditMatch;

/// Per-student state of one problem. Everything a submission, draft save or
/// hint request changes lives here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentState {
    pub count_attempts: u32,
    pub credit_match: Option<CreditMatch>,
    pub feedback_message: String,
    pub hint_counter: u32,
    pub score: f64,
    /// Last raw submission or draft, kept even when it is not numeric.
    pub student_answer: String,
    pub student_answer_value: Option<f64>,
}
