//! Credit resolution for numeric answers.
//!
//! Every credit entry is normalized against the problem's instructor answer,
//! measured against the student's answer and kept only when its tolerance
//! covers the answer. The highest scored entries compete on tie-break: the
//! tighter percent tolerance wins, then the tighter absolute tolerance.

use std::cmp::Ordering;

use crate::models::credit::{CreditEntry, CreditMatch, FeedbackToken, ResolvedCredit};
use crate::utils::number::round_to;

/// Score of an entry that leaves `score` out.
pub const DEFAULT_ENTRY_SCORE: f64 = 1.0;

/// Tolerances and errors are compared at this many decimal places so that a
/// value sitting exactly on a tolerance edge does not flicker.
const TOLERANCE_PRECISION: i32 = 6;

const ABSENT_VALUE: &str = "--";

/// Absolute and percent error of `actual` away from `expected`.
///
/// The percent error is `None` when `expected` is zero.
pub fn measure(expected: Option<f64>, actual: Option<f64>) -> (Option<f64>, Option<f64>) {
    let (Some(expected), Some(actual)) = (expected, actual) else {
        return (None, None);
    };
    let absolute_error = (expected - actual).abs();
    let percent_error = if expected != 0.0 {
        Some(100.0 * (absolute_error / expected.abs()))
    } else {
        None
    };
    (Some(absolute_error), percent_error)
}

/// Applies defaults to an authored entry. The result has not been evaluated
/// yet, so `credit_score` and `student_error` are empty.
pub fn normalize(entry: &CreditEntry, instructor_answer: f64, student_answer: &str) -> ResolvedCredit {
    let answer = entry.answer.value().unwrap_or(instructor_answer);
    let error_absolute = entry.error_absolute.value();
    let error_percent = match (entry.error_percent.value(), error_absolute) {
        (None, None) => Some(0.0),
        (error_percent, _) => error_percent,
    };
    let score = entry
        .score
        .value_or_default(DEFAULT_ENTRY_SCORE)
        .map_or(0.0, |score| score.clamp(0.0, 1.0));

    ResolvedCredit {
        answer,
        credit_score: None,
        error_percent,
        error_absolute,
        feedback: entry.feedback.clone(),
        score,
        student_answer: student_answer.to_string(),
        student_error: None,
    }
}

/// Returns `(credit_score, student_error)` for an entry, both `None` when the
/// measured error is outside the entry's tolerance. Percent tolerance is
/// checked first.
pub fn evaluate(
    credit: &ResolvedCredit,
    absolute_error: Option<f64>,
    percent_error: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    if let (Some(tolerance), Some(error)) = (credit.error_percent, percent_error) {
        if within_tolerance(tolerance, error) {
            return (Some(credit.score), Some(error));
        }
    }
    if let (Some(tolerance), Some(error)) = (credit.error_absolute, absolute_error) {
        if within_tolerance(tolerance, error) {
            return (Some(credit.score), Some(error));
        }
    }
    (None, None)
}

fn within_tolerance(tolerance: f64, error: f64) -> bool {
    round_to(tolerance, TOLERANCE_PRECISION) >= round_to(error, TOLERANCE_PRECISION)
}

/// Normalizes and evaluates every entry in authored order.
pub fn resolve_entries(
    entries: &[CreditEntry],
    instructor_answer: f64,
    student_answer: &str,
    student_value: f64,
) -> Vec<ResolvedCredit> {
    entries
        .iter()
        .map(|entry| {
            let mut credit = normalize(entry, instructor_answer, student_answer);
            let (absolute_error, percent_error) = measure(Some(credit.answer), Some(student_value));
            let (credit_score, student_error) = evaluate(&credit, absolute_error, percent_error);
            tracing::debug!(
                "Credit entry answer={} error_percent={:?} error_absolute={:?} -> credit_score={:?}",
                credit.answer,
                credit.error_percent,
                credit.error_absolute,
                credit_score
            );
            credit.credit_score = credit_score;
            credit.student_error = student_error;
            credit
        })
        .collect()
}

/// Keeps the matched entries that share the highest credit score.
fn high_score_candidates(resolved: Vec<ResolvedCredit>) -> Vec<ResolvedCredit> {
    let high_score = resolved
        .iter()
        .filter_map(|credit| credit.credit_score)
        .fold(None, |high: Option<f64>, score| {
            Some(high.map_or(score, |high| high.max(score)))
        });
    let Some(high_score) = high_score else {
        return Vec::new();
    };
    resolved
        .into_iter()
        .filter(|credit| credit.credit_score == Some(high_score))
        .collect()
}

/// Absent tolerances order before present ones.
fn compare_tolerance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// Picks the credit decision for a numeric submission.
///
/// An answer equal to the instructor answer always earns full credit: the
/// winning entry keeps its feedback but its score is raised to 1.0, and when
/// no entry matched at all the bare [`CreditMatch::ExactAnswer`] is returned.
pub fn select_best(
    entries: &[CreditEntry],
    instructor_answer: f64,
    student_answer: &str,
    student_value: f64,
) -> Option<CreditMatch> {
    let resolved = resolve_entries(entries, instructor_answer, student_answer, student_value);
    let mut candidates = high_score_candidates(resolved);

    // Both sorts are stable, so the percent tolerance ends up as the primary key.
    candidates.sort_by(|a, b| compare_tolerance(a.error_absolute, b.error_absolute));
    candidates.sort_by(|a, b| compare_tolerance(a.error_percent, b.error_percent));

    let exact_answer = student_value == instructor_answer;
    match candidates.into_iter().next() {
        Some(mut best) => {
            if exact_answer {
                best.score = 1.0;
            }
            Some(CreditMatch::Entry(best))
        }
        None if exact_answer => Some(CreditMatch::ExactAnswer),
        None => None,
    }
}

/// Final score in tenths, rounded down. Scores outside [0, 1] earn nothing.
pub fn finalize_score(credit_match: Option<&CreditMatch>) -> f64 {
    quantize_score(credit_match.map_or(0.0, CreditMatch::score))
}

pub fn quantize_score(raw: f64) -> f64 {
    if (0.0..=1.0).contains(&raw) {
        (10.0 * raw).floor() / 10.0
    } else {
        0.0
    }
}

/// Renders the feedback for a credit decision. Without a decision there is
/// no feedback at all.
pub fn render_feedback(credit_match: Option<&CreditMatch>, default_template: &str) -> String {
    let Some(credit_match) = credit_match else {
        return String::new();
    };
    let template = credit_match.feedback().unwrap_or(default_template);

    FeedbackToken::ALL
        .iter()
        .fold(template.to_string(), |message, token| {
            let value = credit_match
                .token_value(*token)
                .unwrap_or_else(|| ABSENT_VALUE.to_string());
            message.replace(token.marker(), &value)
        })
}
