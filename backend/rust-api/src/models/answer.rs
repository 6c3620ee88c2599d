use serde::{Deserialize, Deserializer, Serialize};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default, deserialize_with = "answer_text")]
    pub student_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveAnswerRequest {
    #[serde(default, deserialize_with = "answer_text")]
    pub student_answer: String,
}

/// Accepts the answer as a JSON string or a bare JSON number.
fn answer_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Submit response. Non-numeric submissions only carry `status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub status: String,
    #[serde(flatten)]
    pub result: Option<SubmitResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub attempts_message: String,
    pub feedback_label: String,
    pub feedback_message: String,
    pub indicator_class: String,
    pub indicator_visibility_class: String,
    pub hide_submit_class: String,
    pub progress_message: String,
    pub saved_message: String,
    pub submitted_message: String,
}

impl SubmitAnswerResponse {
    pub fn acknowledged() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            result: None,
        }
    }

    pub fn scored(result: SubmitResult) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            result: Some(result),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveAnswerResponse {
    pub status: String,
    pub hide_submit_class: String,
    pub progress_message: String,
    pub saved_message: String,
    pub submitted_message: String,
}
