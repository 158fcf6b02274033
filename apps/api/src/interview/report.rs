//! Plain-text interview report: rendering, file naming, export, and
//! re-parsing of the per-question results block.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::interview::models::{InterviewInfo, Turn, TurnOutcome, SKIP_MARKER, TOTAL_QUESTIONS};
use crate::interview::summary::{report_assessment, InterviewSummary};

const RESULTS_HEADER: &str = "DETAILED RESULTS:";
const BREAKDOWN_HEADER: &str = "Performance Breakdown:";
/// Continuation lines of a multi-line answer are indented so they can never
/// be mistaken for a result line.
const CONTINUATION_INDENT: &str = "  ";

/// Per-question result as it appears in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionResult {
    Scored(u8),
    Skipped,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportParseError {
    #[error("report has no 'DETAILED RESULTS:' section")]
    MissingResults,

    #[error("malformed result line for Q{index}: {line}")]
    MalformedLine { index: usize, line: String },
}

/// `excel_interview_results_<YYYYMMDD_HHMMSS>.txt`
pub fn report_filename(generated_at: NaiveDateTime) -> String {
    format!(
        "excel_interview_results_{}.txt",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn render_report(
    info: &InterviewInfo,
    turns: &[Turn],
    summary: &InterviewSummary,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, info, turns, summary, generated_at);
    out
}

fn write_report(
    out: &mut String,
    info: &InterviewInfo,
    turns: &[Turn],
    summary: &InterviewSummary,
    generated_at: NaiveDateTime,
) -> std::fmt::Result {
    writeln!(out, "Excel Interview Results")?;
    writeln!(out, "========================")?;
    writeln!(out)?;
    writeln!(out, "INTERVIEW INFORMATION:")?;
    writeln!(out, "Examiner Name: {}", info.examiner_name)?;
    writeln!(out, "Difficulty Level: {}", info.difficulty_level)?;
    writeln!(out, "Interview Date: {}", info.interview_date.format("%Y-%m-%d"))?;
    writeln!(out, "Examiner Profile: {}", info.examiner_profile)?;
    writeln!(out)?;
    writeln!(out, "PERFORMANCE SUMMARY:")?;
    writeln!(
        out,
        "Overall Score (skipped questions count as 0): {:.1}/5",
        summary.overall_score
    )?;
    writeln!(
        out,
        "Average Score (answered questions only): {:.1}/5",
        summary.avg_answered_score
    )?;
    writeln!(
        out,
        "Questions Answered: {}/{}",
        summary.answered_count, TOTAL_QUESTIONS
    )?;
    writeln!(
        out,
        "Questions Skipped: {}/{}",
        summary.skipped_count, TOTAL_QUESTIONS
    )?;
    writeln!(out)?;
    writeln!(out, "DIFFICULTY LEVEL ASSESSMENT:")?;
    writeln!(out, "Difficulty: {}", info.difficulty_level)?;
    writeln!(
        out,
        "Assessment: {}",
        report_assessment(info.difficulty_level, summary.band)
    )?;
    writeln!(out)?;
    writeln!(out, "{RESULTS_HEADER}")?;

    for turn in turns {
        writeln!(out)?;
        match &turn.outcome {
            Some(TurnOutcome::Answered { answer, score, .. }) => {
                writeln!(out, "Q{}: {}/5", turn.index, score)?;
                writeln!(out, "Answer: {}", indent_continuation(answer))?;
            }
            Some(TurnOutcome::Skipped) => {
                writeln!(out, "Q{}: Skipped", turn.index)?;
                writeln!(out, "Answer: {SKIP_MARKER}")?;
            }
            None => continue,
        }
        writeln!(out, "---")?;
    }

    let answered = summary.answered_count;
    let breakdown = &summary.breakdown;
    writeln!(out)?;
    writeln!(out, "{BREAKDOWN_HEADER}")?;
    writeln!(out, "- Excellent (4-5): {}/{}", breakdown.excellent, answered)?;
    writeln!(out, "- Good (2-3): {}/{}", breakdown.good, answered)?;
    writeln!(
        out,
        "- Needs Improvement (0-1): {}/{}",
        breakdown.needs_improvement, answered
    )?;
    writeln!(out, "- Skipped: {}/{}", breakdown.skipped, TOTAL_QUESTIONS)?;
    writeln!(out)?;
    writeln!(
        out,
        "Generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    Ok(())
}

fn indent_continuation(answer: &str) -> String {
    answer
        .trim_end()
        .lines()
        .collect::<Vec<_>>()
        .join(&format!("\n{CONTINUATION_INDENT}"))
}

/// Recovers the per-question score/skip sequence from a rendered report.
/// Reading starts after the last results header, so header text can't
/// shadow the real block.
pub fn parse_report_results(report: &str) -> Result<Vec<QuestionResult>, ReportParseError> {
    let lines: Vec<&str> = report.lines().collect();
    let start = lines
        .iter()
        .rposition(|line| *line == RESULTS_HEADER)
        .ok_or(ReportParseError::MissingResults)?;

    let mut results = Vec::new();
    for &line in &lines[start + 1..] {
        if line == BREAKDOWN_HEADER {
            break;
        }
        let expected = results.len() + 1;
        let prefix = format!("Q{expected}: ");
        let Some(rest) = line.strip_prefix(&prefix) else {
            continue;
        };
        let result = match rest {
            "Skipped" => QuestionResult::Skipped,
            scored => scored
                .strip_suffix("/5")
                .and_then(|digits| digits.parse::<u8>().ok())
                .map(QuestionResult::Scored)
                .ok_or_else(|| ReportParseError::MalformedLine {
                    index: expected,
                    line: line.to_string(),
                })?,
        };
        results.push(result);
    }

    Ok(results)
}

/// Writes the report into `dir`, creating it if needed. Returns the file path.
pub fn export_report(dir: &Path, report: &str, generated_at: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
    let path = dir.join(report_filename(generated_at));
    std::fs::write(&path, report)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::interview::models::{Difficulty, ExaminerProfile};

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn info() -> InterviewInfo {
        InterviewInfo {
            examiner_name: "Dana Reyes".to_string(),
            difficulty_level: Difficulty::Intermediate,
            interview_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            examiner_profile: ExaminerProfile::TeamLead,
            password_provided: true,
        }
    }

    fn answered(index: usize, score: u8, answer: &str) -> Turn {
        Turn {
            index,
            question: format!("Question {index}"),
            outcome: Some(TurnOutcome::Answered {
                answer: answer.to_string(),
                evaluation: format!("{score}/5"),
                score,
            }),
        }
    }

    fn skipped(index: usize) -> Turn {
        Turn {
            index,
            question: format!("Question {index}"),
            outcome: Some(TurnOutcome::Skipped),
        }
    }

    fn sample_turns() -> Vec<Turn> {
        vec![
            answered(1, 4, "Use SUMIFS over the region column"),
            answered(2, 2, "A pivot table"),
            skipped(3),
            answered(4, 5, "INDEX/MATCH"),
            answered(5, 1, "Not sure"),
        ]
    }

    #[test]
    fn test_report_filename_pattern() {
        assert_eq!(
            report_filename(generated_at()),
            "excel_interview_results_20261019_140509.txt"
        );
    }

    #[test]
    fn test_report_contains_header_summary_and_both_scores() {
        let turns = sample_turns();
        let summary = InterviewSummary::from_turns(Difficulty::Intermediate, &turns);
        let report = render_report(&info(), &turns, &summary, generated_at());

        assert!(report.starts_with("Excel Interview Results\n"));
        assert!(report.contains("Examiner Name: Dana Reyes\n"));
        assert!(report.contains("Difficulty Level: Intermediate\n"));
        assert!(report.contains("Interview Date: 2026-10-19\n"));
        assert!(report.contains("Examiner Profile: Team Lead\n"));
        assert!(report.contains("Overall Score (skipped questions count as 0): 2.4/5\n"));
        assert!(report.contains("Average Score (answered questions only): 3.0/5\n"));
        assert!(report.contains("Questions Answered: 4/5\n"));
        assert!(report.contains("Questions Skipped: 1/5\n"));
        assert!(report.contains(
            "Assessment: Good work! Developing intermediate skills. Practice pivot tables.\n"
        ));
        assert!(report.contains("Q3: Skipped\nAnswer: [Question Skipped]\n---\n"));
        assert!(report.contains("Q1: 4/5\nAnswer: Use SUMIFS over the region column\n---\n"));
        assert!(report.contains("- Excellent (4-5): 2/4\n"));
        assert!(report.contains("- Good (2-3): 1/4\n"));
        assert!(report.contains("- Needs Improvement (0-1): 1/4\n"));
        assert!(report.contains("- Skipped: 1/5\n"));
        assert!(report.trim_end().ends_with("Generated on: 2026-10-19 14:05:09"));
    }

    #[test]
    fn test_report_round_trips_score_sequence() {
        let turns = sample_turns();
        let summary = InterviewSummary::from_turns(Difficulty::Intermediate, &turns);
        let report = render_report(&info(), &turns, &summary, generated_at());

        assert_eq!(
            parse_report_results(&report).unwrap(),
            vec![
                QuestionResult::Scored(4),
                QuestionResult::Scored(2),
                QuestionResult::Skipped,
                QuestionResult::Scored(5),
                QuestionResult::Scored(1),
            ]
        );
    }

    #[test]
    fn test_multi_line_answer_cannot_spoof_result_lines() {
        let turns = vec![
            answered(1, 1, "first line\nQ2: 5/5\nPerformance Breakdown:"),
            skipped(2),
            skipped(3),
            skipped(4),
            skipped(5),
        ];
        let summary = InterviewSummary::from_turns(Difficulty::Beginner, &turns);
        let report = render_report(&info(), &turns, &summary, generated_at());

        assert!(report.contains("Answer: first line\n  Q2: 5/5\n  Performance Breakdown:\n"));
        assert_eq!(
            parse_report_results(&report).unwrap(),
            vec![
                QuestionResult::Scored(1),
                QuestionResult::Skipped,
                QuestionResult::Skipped,
                QuestionResult::Skipped,
                QuestionResult::Skipped,
            ]
        );
    }

    #[test]
    fn test_header_text_cannot_shadow_results_block() {
        let mut info = info();
        info.examiner_name = "Dana\nDETAILED RESULTS:\nQ1: 5/5".to_string();
        let turns: Vec<Turn> = (1..=5).map(skipped).collect();
        let summary = InterviewSummary::from_turns(Difficulty::Beginner, &turns);
        let report = render_report(&info, &turns, &summary, generated_at());

        assert_eq!(
            parse_report_results(&report).unwrap(),
            vec![QuestionResult::Skipped; 5]
        );
    }

    #[test]
    fn test_parse_rejects_text_without_results() {
        assert_eq!(
            parse_report_results("just some text"),
            Err(ReportParseError::MissingResults)
        );
    }

    #[test]
    fn test_parse_flags_malformed_score() {
        let report = "DETAILED RESULTS:\n\nQ1: four/5\n";
        assert!(matches!(
            parse_report_results(report),
            Err(ReportParseError::MalformedLine { index: 1, .. })
        ));
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports");

        let path = export_report(&target, "report body", generated_at()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "excel_interview_results_20261019_140509.txt"
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), "report body");
    }
}
