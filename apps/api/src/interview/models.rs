use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of questions in every interview.
pub const TOTAL_QUESTIONS: usize = 5;

/// Literal stand-in for the candidate's input when a question is skipped.
/// It is also what seeds the next question prompt after a skip.
pub const SKIP_MARKER: &str = "[Question Skipped]";

/// Difficulty of the interview. Drives prompt templates, the evaluation
/// rubric and the final assessment text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of the person running the interview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExaminerProfile {
    #[default]
    #[serde(rename = "HR Manager")]
    HrManager,
    #[serde(rename = "Technical Lead")]
    TechnicalLead,
    #[serde(rename = "Senior Developer")]
    SeniorDeveloper,
    #[serde(rename = "Team Lead")]
    TeamLead,
    Manager,
    Director,
    Other,
}

impl ExaminerProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExaminerProfile::HrManager => "HR Manager",
            ExaminerProfile::TechnicalLead => "Technical Lead",
            ExaminerProfile::SeniorDeveloper => "Senior Developer",
            ExaminerProfile::TeamLead => "Team Lead",
            ExaminerProfile::Manager => "Manager",
            ExaminerProfile::Director => "Director",
            ExaminerProfile::Other => "Other",
        }
    }
}

impl fmt::Display for ExaminerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata form submitted before the first question.
///
/// `password` is only checked for presence; it is never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoForm {
    pub examiner_name: String,
    pub password: String,
    #[serde(default)]
    pub difficulty_level: Difficulty,
    /// Defaults to today when omitted.
    pub interview_date: Option<NaiveDate>,
    #[serde(default)]
    pub examiner_profile: ExaminerProfile,
}

/// Validated interview metadata held by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewInfo {
    pub examiner_name: String,
    pub difficulty_level: Difficulty,
    pub interview_date: NaiveDate,
    pub examiner_profile: ExaminerProfile,
    pub password_provided: bool,
}

/// Terminal result of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    Answered {
        answer: String,
        evaluation: String,
        score: u8,
    },
    Skipped,
}

/// One question/answer(or skip)/evaluation cycle.
///
/// `outcome == None` while the question is waiting for the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub index: usize,
    pub question: String,
    pub outcome: Option<TurnOutcome>,
}

impl Turn {
    pub fn pending(index: usize, question: String) -> Self {
        Self {
            index,
            question,
            outcome: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Score contributed to the overall total. Skips and pending turns give 0.
    pub fn score(&self) -> u8 {
        match &self.outcome {
            Some(TurnOutcome::Answered { score, .. }) => *score,
            _ => 0,
        }
    }

    /// Raw candidate input used to ground the next question.
    pub fn candidate_input(&self) -> Option<&str> {
        match &self.outcome {
            Some(TurnOutcome::Answered { answer, .. }) => Some(answer),
            Some(TurnOutcome::Skipped) => Some(SKIP_MARKER),
            None => None,
        }
    }
}
