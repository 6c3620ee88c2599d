//! Display state derived from problem settings and a student's state.
//!
//! None of these functions mutate anything; the services call them after the
//! new state has been computed so the response reflects what was stored.

use crate::models::answer::{SaveAnswerResponse, SubmitResult, STATUS_SUCCESS};
use crate::models::view::StudentView;
use crate::models::{ProblemSettings, StudentState};
use crate::utils::number::format_general;

pub const CLASS_HIDDEN: &str = "hidden";
pub const CLASS_NO_DISPLAY: &str = "nodisplay";

pub fn attempts_message(settings: &ProblemSettings, state: &StudentState) -> String {
    if settings.max_attempts <= 0 {
        return String::new();
    }
    let noun = if settings.max_attempts == 1 {
        "submission"
    } else {
        "submissions"
    };
    format!(
        "You have used {} of {} {}",
        state.count_attempts, settings.max_attempts, noun
    )
}

pub fn indicator_class(settings: &ProblemSettings, state: &StudentState) -> &'static str {
    if !settings.display_correctness || state.count_attempts == 0 {
        "unanswered"
    } else if state.score == 0.0 {
        "incorrect"
    } else {
        "correct"
    }
}

pub fn indicator_visibility_class(settings: &ProblemSettings) -> &'static str {
    if settings.display_correctness {
        ""
    } else {
        CLASS_HIDDEN
    }
}

pub fn hint_button_class(settings: &ProblemSettings) -> &'static str {
    if settings.hints.is_empty() {
        CLASS_NO_DISPLAY
    } else {
        ""
    }
}

pub fn hide_submit_class(settings: &ProblemSettings, state: &StudentState) -> &'static str {
    if settings.attempts_exhausted(state.count_attempts) {
        CLASS_NO_DISPLAY
    } else {
        ""
    }
}

pub fn feedback_label(state: &StudentState) -> &'static str {
    if state.feedback_message.is_empty() {
        ""
    } else if state.score == 0.0 {
        "Incorrect:"
    } else {
        "Correct:"
    }
}

/// Points earned out of the problem weight, e.g. `(9/10 points)`.
pub fn progress_message(settings: &ProblemSettings, state: &StudentState) -> String {
    let weight = settings.weight;
    if weight == 0 {
        return String::new();
    }
    let noun = if weight == 1 { "point" } else { "points" };
    if state.score == 0.0 {
        format!("({} {} possible)", weight, noun)
    } else {
        let earned = format_general(state.score * weight as f64);
        format!("({}/{} {})", earned, weight, noun)
    }
}

/// The configured receipt message, suppressed once there is feedback to show.
pub fn submitted_message(settings: &ProblemSettings, state: &StudentState) -> String {
    if state.feedback_message.is_empty() {
        settings.submitted_message.clone()
    } else {
        String::new()
    }
}

/// Hint shown for the current counter, `None` when the problem has no hints.
pub fn hint_message(settings: &ProblemSettings, hint_counter: u32) -> Option<String> {
    if settings.hints.is_empty() {
        return None;
    }
    let total = settings.hints.len();
    let index = hint_counter as usize % total;
    Some(format!(
        "Hint ({} of {}): {}",
        index + 1,
        total,
        settings.hints[index]
    ))
}

pub fn submit_result(settings: &ProblemSettings, state: &StudentState) -> SubmitResult {
    SubmitResult {
        attempts_message: attempts_message(settings, state),
        feedback_label: feedback_label(state).to_string(),
        feedback_message: state.feedback_message.clone(),
        indicator_class: indicator_class(settings, state).to_string(),
        indicator_visibility_class: indicator_visibility_class(settings).to_string(),
        hide_submit_class: hide_submit_class(settings, state).to_string(),
        progress_message: progress_message(settings, state),
        saved_message: String::new(),
        submitted_message: submitted_message(settings, state),
    }
}

pub fn save_response(settings: &ProblemSettings, state: &StudentState) -> SaveAnswerResponse {
    SaveAnswerResponse {
        status: STATUS_SUCCESS.to_string(),
        hide_submit_class: hide_submit_class(settings, state).to_string(),
        progress_message: progress_message(settings, state),
        saved_message: settings.saved_message.clone(),
        submitted_message: String::new(),
    }
}

/// Initial rendering data. Transient messages start out empty.
pub fn student_view(settings: &ProblemSettings, state: &StudentState) -> StudentView {
    StudentView {
        display_name: settings.display_name.clone(),
        prompt: settings.prompt.clone(),
        student_answer: state.student_answer.clone(),
        attempts_message: attempts_message(settings, state),
        feedback_label: String::new(),
        feedback_message: String::new(),
        hint_message: String::new(),
        hintdisplay_class: hint_button_class(settings).to_string(),
        hide_submit_class: hide_submit_class(settings, state).to_string(),
        indicator_class: indicator_class(settings, state).to_string(),
        indicator_visibility_class: indicator_visibility_class(settings).to_string(),
        progress_message: progress_message(settings, state),
        saved_message: String::new(),
        submitted_message: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(count_attempts: u32, score: f64, feedback: &str) -> StudentState {
        StudentState {
            count_attempts,
            score,
            feedback_message: feedback.to_string(),
            ..StudentState::default()
        }
    }

    #[test]
    fn test_attempts_message() {
        let mut settings = ProblemSettings::default();
        assert_eq!(attempts_message(&settings, &state(3, 0.0, "")), "");

        settings.max_attempts = 1;
        assert_eq!(
            attempts_message(&settings, &state(0, 0.0, "")),
            "You have used 0 of 1 submission"
        );

        settings.max_attempts = 3;
        assert_eq!(
            attempts_message(&settings, &state(2, 0.0, "")),
            "You have used 2 of 3 submissions"
        );
    }

    #[test]
    fn test_indicator_class() {
        let mut settings = ProblemSettings::default();
        assert_eq!(indicator_class(&settings, &state(0, 0.0, "")), "unanswered");
        assert_eq!(indicator_class(&settings, &state(1, 0.0, "")), "incorrect");
        assert_eq!(indicator_class(&settings, &state(1, 0.5, "")), "correct");

        settings.display_correctness = false;
        assert_eq!(indicator_class(&settings, &state(1, 0.5, "")), "unanswered");
        assert_eq!(indicator_visibility_class(&settings), "hidden");
    }

    #[test]
    fn test_hide_submit_class() {
        let mut settings = ProblemSettings::default();
        assert_eq!(hide_submit_class(&settings, &state(50, 0.0, "")), "");

        settings.max_attempts = 2;
        assert_eq!(hide_submit_class(&settings, &state(1, 0.0, "")), "");
        assert_eq!(hide_submit_class(&settings, &state(2, 0.0, "")), "nodisplay");
    }

    #[test]
    fn test_feedback_label() {
        assert_eq!(feedback_label(&state(1, 0.0, "")), "");
        assert_eq!(feedback_label(&state(1, 0.0, "Too far")), "Incorrect:");
        assert_eq!(feedback_label(&state(1, 0.3, "Close")), "Correct:");
    }

    #[test]
    fn test_progress_message() {
        let mut settings = ProblemSettings::default();
        assert_eq!(progress_message(&settings, &state(0, 0.0, "")), "(10 points possible)");
        assert_eq!(progress_message(&settings, &state(1, 0.9, "")), "(9/10 points)");
        assert_eq!(progress_message(&settings, &state(1, 1.0, "")), "(10/10 points)");

        settings.weight = 1;
        assert_eq!(progress_message(&settings, &state(0, 0.0, "")), "(1 point possible)");
        assert_eq!(progress_message(&settings, &state(1, 0.5, "")), "(0.5/1 point)");

        settings.weight = 3;
        assert_eq!(progress_message(&settings, &state(1, 0.7, "")), "(2.1/3 points)");

        settings.weight = 0;
        assert_eq!(progress_message(&settings, &state(1, 0.7, "")), "");
    }

    #[test]
    fn test_submitted_message() {
        let settings = ProblemSettings::default();
        assert_eq!(
            submitted_message(&settings, &state(1, 0.0, "")),
            "Your submission has been received"
        );
        assert_eq!(submitted_message(&settings, &state(1, 0.9, "Close")), "");
    }

    #[test]
    fn test_hint_message_rotates() {
        let mut settings = ProblemSettings::default();
        assert_eq!(hint_message(&settings, 0), None);
        assert_eq!(hint_button_class(&settings), "nodisplay");

        settings.hints = vec!["First".to_string(), "Second".to_string()];
        assert_eq!(hint_button_class(&settings), "");
        assert_eq!(hint_message(&settings, 0).unwrap(), "Hint (1 of 2): First");
        assert_eq!(hint_message(&settings, 1).unwrap(), "Hint (2 of 2): Second");
        assert_eq!(hint_message(&settings, 2).unwrap(), "Hint (1 of 2): First");
    }

    #[test]
    fn test_student_view_clears_transient_messages() {
        let settings = ProblemSettings::default();
        let view = student_view(&settings, &state(2, 0.9, "Answer is within 10.0 percent."));
        assert_eq!(view.display_name, "Adaptive Numeric Input");
        assert_eq!(view.feedback_message, "");
        assert_eq!(view.feedback_label, "");
        assert_eq!(view.indicator_class, "correct");
        assert_eq!(view.hintdisplay_class, "nodisplay");
        assert_eq!(view.progress_message, "(9/10 points)");
    }
}
