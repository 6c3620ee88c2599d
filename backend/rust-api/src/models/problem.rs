use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::credit::CreditEntry;

pub const DEFAULT_DISPLAY_NAME: &str = "Adaptive Numeric Input";
pub const DEFAULT_FEEDBACK: &str = "Answer is within %%ERROR_PERCENT%% percent.";
pub const DEFAULT_SUBMITTED_MESSAGE: &str = "Your submission has been received";
pub const DEFAULT_SAVED_MESSAGE: &str =
    "Your answers have been saved but not scored. Click \"Submit\" to score them.";
pub const DEFAULT_PROMPT: &str = "<h2>Default Example: Percent error feedback</h2>\
    <p>This problem demonstrates how to provide specific feedback based on the \
    percent error away from the answer.</p>\
    <p>In this example the answer is 10. Percent error ranges were added to the \
    credit list based on percent error away from 10. Error dependent feedback is \
    displayed if the submitted answer falls within one of the ranges.</p>";

/// Instructor-editable settings of one numeric problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProblemSettings {
    pub display_name: String,
    pub prompt: String,

    /// 0 means unlimited submissions.
    #[validate(range(min = 0, message = "Maximum Attempts cannot be negative"))]
    pub max_attempts: i64,

    pub instructor_answer: f64,

    #[validate(range(min = 0, message = "Weight Attempts cannot be negative"))]
    pub weight: i64,

    /// Template used when the matched credit entry has no feedback of its own.
    pub feedback_default: String,
    pub credit_list: Vec<CreditEntry>,
    pub hints: Vec<String>,
    pub display_correctness: bool,
    pub submitted_message: String,
    pub saved_message: String,
}

impl Default for ProblemSettings {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            max_attempts: 0,
            instructor_answer: 10.0,
            weight: 10,
            feedback_default: DEFAULT_FEEDBACK.to_string(),
            credit_list: default_credit_list(),
            hints: Vec::new(),
            display_correctness: true,
            submitted_message: DEFAULT_SUBMITTED_MESSAGE.to_string(),
            saved_message: DEFAULT_SAVED_MESSAGE.to_string(),
        }
    }
}

/// Ten percent tiers: exact answers earn full credit, every further 10% of
/// error costs a tenth of the score.
pub fn default_credit_list() -> Vec<CreditEntry> {
    (0..10)
        .map(|tier| {
            let tier = f64::from(tier);
            CreditEntry::percent_tier(tier * 10.0, (10.0 - tier) / 10.0)
        })
        .collect()
}

impl ProblemSettings {
    /// Whether another scored submission (or draft save) is allowed after
    /// `count_attempts` submissions.
    pub fn accepts_attempt(&self, count_attempts: u32) -> bool {
        self.max_attempts == 0 || i64::from(count_attempts) < self.max_attempts
    }

    pub fn attempts_exhausted(&self, count_attempts: u32) -> bool {
        self.max_attempts > 0 && i64::from(count_attempts) >= self.max_attempts
    }

    /// Validates the settings, returning the authoring messages on failure.
    pub fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|errors| validation_messages(&errors))
    }
}

/// Flattens validator errors into their user-facing messages, sorted so the
/// output is stable.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| error.code.to_string())
        })
        .collect();
    messages.sort();
    messages
}
