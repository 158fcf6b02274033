//! End-of-interview aggregation.
//!
//! Two score denominators are kept on purpose and labelled separately:
//! `overall_score` divides by the fixed question count (skips count as 0),
//! `avg_answered_score` divides by the number of answered questions.

use serde::Serialize;

use crate::interview::models::{Difficulty, Turn, TurnOutcome, TOTAL_QUESTIONS};

/// Score band shared by per-question scores and the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 4 and above
    Excellent,
    /// 2 up to (not including) 4
    Good,
    /// below 2
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            ScoreBand::Excellent
        } else if score >= 2.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub excellent: usize,
    pub good: usize,
    pub needs_improvement: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewSummary {
    pub difficulty_level: Difficulty,
    pub total_questions: usize,
    pub total_points: u32,
    pub answered_count: usize,
    pub skipped_count: usize,
    /// total_points / TOTAL_QUESTIONS; skipped questions count as 0.
    pub overall_score: f64,
    /// total_points / answered_count; 0 when nothing was answered.
    pub avg_answered_score: f64,
    pub scores: Vec<u8>,
    pub breakdown: ScoreBreakdown,
    pub band: ScoreBand,
    pub assessment: &'static str,
}

impl InterviewSummary {
    /// Aggregates terminal turns. Pending turns are ignored.
    pub fn from_turns(difficulty: Difficulty, turns: &[Turn]) -> Self {
        let mut scores = Vec::new();
        let mut breakdown = ScoreBreakdown::default();

        for turn in turns {
            match &turn.outcome {
                Some(TurnOutcome::Answered { score, .. }) => {
                    scores.push(*score);
                    match ScoreBand::from_score(*score as f64) {
                        ScoreBand::Excellent => breakdown.excellent += 1,
                        ScoreBand::Good => breakdown.good += 1,
                        ScoreBand::NeedsImprovement => breakdown.needs_improvement += 1,
                    }
                }
                Some(TurnOutcome::Skipped) => breakdown.skipped += 1,
                None => {}
            }
        }

        let total_points: u32 = scores.iter().map(|&s| s as u32).sum();
        let answered_count = scores.len();
        let overall_score = total_points as f64 / TOTAL_QUESTIONS as f64;
        let avg_answered_score = if answered_count > 0 {
            total_points as f64 / answered_count as f64
        } else {
            0.0
        };
        let band = ScoreBand::from_score(overall_score);

        Self {
            difficulty_level: difficulty,
            total_questions: TOTAL_QUESTIONS,
            total_points,
            answered_count,
            skipped_count: breakdown.skipped,
            overall_score,
            avg_answered_score,
            scores,
            breakdown,
            band,
            assessment: assessment_message(difficulty, band),
        }
    }
}

/// Assessment shown alongside the summary.
pub fn assessment_message(difficulty: Difficulty, band: ScoreBand) -> &'static str {
    use Difficulty::*;
    use ScoreBand::*;
    match (difficulty, band) {
        (Beginner, Excellent) => "Excellent! You have strong fundamental Excel skills. Consider advancing to Intermediate level.",
        (Beginner, Good) => "Good progress! You understand basic Excel concepts. Practice more with formulas and formatting.",
        (Beginner, NeedsImprovement) => "Keep learning! Focus on basic Excel functions, formulas, and data entry.",
        (Intermediate, Excellent) => "Outstanding! You have solid intermediate Excel skills. Ready for Advanced challenges!",
        (Intermediate, Good) => "Good work! You're developing intermediate skills. Practice with pivot tables and data analysis.",
        (Intermediate, NeedsImprovement) => "Keep practicing! Focus on intermediate formulas like VLOOKUP and data analysis features.",
        (Advanced, Excellent) => "Exceptional! You have advanced Excel expertise. You're ready for complex business scenarios!",
        (Advanced, Good) => "Strong skills! You handle advanced features well. Practice with complex case studies.",
        (Advanced, NeedsImprovement) => "Keep advancing! Focus on complex formulas, automation, and business problem-solving.",
    }
}

/// Shorter assessment line written into the exported report.
pub fn report_assessment(difficulty: Difficulty, band: ScoreBand) -> &'static str {
    use Difficulty::*;
    use ScoreBand::*;
    match (difficulty, band) {
        (Beginner, Excellent) => "Excellent! Strong fundamental Excel skills. Ready for Intermediate level.",
        (Beginner, Good) => "Good progress! Understanding basic concepts. Practice more with formulas.",
        (Beginner, NeedsImprovement) => "Keep learning! Focus on basic Excel functions and data entry.",
        (Intermediate, Excellent) => "Outstanding! Solid intermediate skills. Ready for Advanced challenges!",
        (Intermediate, Good) => "Good work! Developing intermediate skills. Practice pivot tables.",
        (Intermediate, NeedsImprovement) => "Keep practicing! Focus on VLOOKUP and data analysis.",
        (Advanced, Excellent) => "Exceptional! Advanced Excel expertise. Ready for complex scenarios!",
        (Advanced, Good) => "Strong skills! Handle advanced features well. Practice case studies.",
        (Advanced, NeedsImprovement) => "Keep advancing! Focus on complex formulas and automation.",
    }
}
