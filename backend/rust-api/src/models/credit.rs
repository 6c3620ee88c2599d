use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::number::{format_number, parse_number};

/// A numeric field as authored by an instructor.
///
/// Credit entries arrive as loosely typed JSON (the default tiers use strings
/// such as `"0.9"`), so every field keeps track of whether the key was left
/// out, was present but not a number, or carried a usable value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum NumericField {
    #[default]
    Missing,
    Invalid,
    Number(f64),
}

impl NumericField {
    pub fn value(&self) -> Option<f64> {
        match self {
            NumericField::Number(value) => Some(*value),
            NumericField::Missing | NumericField::Invalid => None,
        }
    }

    /// Like [`NumericField::value`], but a missing key falls back to `default`.
    /// A key that is present with an unusable value stays absent.
    pub fn value_or_default(&self, default: f64) -> Option<f64> {
        match self {
            NumericField::Missing => Some(default),
            NumericField::Invalid => None,
            NumericField::Number(value) => Some(*value),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, NumericField::Missing)
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        let parsed = match value {
            serde_json::Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
            serde_json::Value::String(raw) => parse_number(raw),
            _ => None,
        };
        parsed.map_or(NumericField::Invalid, NumericField::Number)
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Number(value)
    }
}

impl Serialize for NumericField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericField::Number(value) => serializer.serialize_f64(*value),
            NumericField::Missing | NumericField::Invalid => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for NumericField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(NumericField::from_json(&value))
    }
}

/// One instructor-defined tolerance range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditEntry {
    #[serde(default, skip_serializing_if = "NumericField::is_missing")]
    pub answer: NumericField,
    #[serde(default, skip_serializing_if = "NumericField::is_missing")]
    pub error_percent: NumericField,
    #[serde(default, skip_serializing_if = "NumericField::is_missing")]
    pub error_absolute: NumericField,
    #[serde(default, skip_serializing_if = "NumericField::is_missing")]
    pub score: NumericField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl CreditEntry {
    /// A percent tier around the instructor answer.
    pub fn percent_tier(error_percent: f64, score: f64) -> Self {
        Self {
            error_percent: error_percent.into(),
            score: score.into(),
            ..Self::default()
        }
    }
}

/// A credit entry after defaults were applied and the student's answer was
/// measured against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCredit {
    pub answer: f64,
    /// Only set when the student's answer is inside this entry's tolerance.
    pub credit_score: Option<f64>,
    pub error_percent: Option<f64>,
    pub error_absolute: Option<f64>,
    pub feedback: Option<String>,
    /// Instructor ceiling for this entry.
    pub score: f64,
    pub student_answer: String,
    pub student_error: Option<f64>,
}

/// The credit decision kept for a student's latest scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreditMatch {
    Entry(ResolvedCredit),
    /// The answer equals the instructor answer but no entry matched.
    ExactAnswer,
}

/// Placeholders instructors may use inside feedback templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackToken {
    Answer,
    ErrorAbsolute,
    ErrorPercent,
    StudentAnswer,
    StudentError,
}

impl FeedbackToken {
    pub const ALL: [FeedbackToken; 5] = [
        FeedbackToken::Answer,
        FeedbackToken::ErrorAbsolute,
        FeedbackToken::ErrorPercent,
        FeedbackToken::StudentAnswer,
        FeedbackToken::StudentError,
    ];

    pub fn marker(&self) -> &'static str {
        match self {
            FeedbackToken::Answer => "%%ANSWER%%",
            FeedbackToken::ErrorAbsolute => "%%ERROR_ABSOLUTE%%",
            FeedbackToken::ErrorPercent => "%%ERROR_PERCENT%%",
            FeedbackToken::StudentAnswer => "%%STUDENT_ANSWER%%",
            FeedbackToken::StudentError => "%%STUDENT_ERROR%%",
        }
    }
}

impl CreditMatch {
    pub fn score(&self) -> f64 {
        match self {
            CreditMatch::Entry(credit) => credit.score,
            CreditMatch::ExactAnswer => 1.0,
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match self {
            CreditMatch::Entry(credit) => credit.feedback.as_deref(),
            CreditMatch::ExactAnswer => None,
        }
    }

    /// Text substituted for `token`, or `None` when the value is absent.
    pub fn token_value(&self, token: FeedbackToken) -> Option<String> {
        let CreditMatch::Entry(credit) = self else {
            return None;
        };
        match token {
            FeedbackToken::Answer => Some(format_number(credit.answer)),
            FeedbackToken::ErrorAbsolute => credit.error_absolute.map(format_number),
            FeedbackToken::ErrorPercent => credit.error_percent.map(format_number),
            FeedbackToken::StudentAnswer => Some(credit.student_answer.clone()),
            FeedbackToken::StudentError => credit.student_error.map(format_number),
        }
    }
}
