use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grade published to the host whenever a submission is scored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GradeEvent {
    pub problem_id: String,
    pub student_id: String,
    pub value: f64,
    pub max_value: u32,
    pub timestamp: DateTime<Utc>,
}

impl GradeEvent {
    pub fn new(problem_id: &str, student_id: &str, value: f64) -> Self {
        Self {
            problem_id: problem_id.to_string(),
            student_id: student_id.to_string(),
            value,
            max_value: 1,
            timestamp: Utc::now(),
        }
    }

    pub fn to_sse_data(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn event_name(&self) -> &'static str {
        "grade"
    }
}
