use serde::{Deserialize, Serialize};

/// Display fields for rendering a problem to a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentView {
    pub display_name: String,
    pub prompt: String,
    pub student_answer: String,
    pub attempts_message: String,
    pub feedback_label: String,
    pub feedback_message: String,
    pub hint_message: String,
    pub hintdisplay_class: String,
    pub hide_submit_class: String,
    pub indicator_class: String,
    pub indicator_visibility_class: String,
    pub progress_message: String,
    pub saved_message: String,
    pub submitted_message: String,
}
