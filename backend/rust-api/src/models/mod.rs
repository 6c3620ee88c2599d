use std::fmt;

use serde::{Deserialize, Serialize};

pub mod answer;
pub mod credit;
pub mod grade;
pub mod hint;
pub mod problem;
pub mod state;
pub mod view;

pub use credit::{CreditEntry, CreditMatch, NumericField, ResolvedCredit};
pub use problem::ProblemSettings;
pub use state::StudentState;

/// Identifies one student's state within one problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentKey {
    pub problem_id: String,
    pub student_id: String,
}

impl StudentKey {
    pub fn new(problem_id: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            problem_id: problem_id.into(),
            student_id: student_id.into(),
        }
    }
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.problem_id, self.student_id)
    }
}
