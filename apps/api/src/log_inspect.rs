//! Offline inspection of the per-day interview logs: daily summaries,
//! token usage across files, and retention cleanup.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::logging::{log_file_name, LOG_FILE_EXTENSION};

const INFO_BLOCK_MARKER: &str = "INTERVIEW INFORMATION COLLECTED";
const SESSION_COMPLETED_MARKER: &str = "SESSION COMPLETED";
const INFO_FIELDS: &[&str] = &[
    "Examiner Name:",
    "Difficulty Level:",
    "Interview Date:",
    "Examiner Profile:",
    "Password Provided:",
];

/// Counts of interesting entries in a single day's log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub api_calls: usize,
    pub questions_generated: usize,
    pub evaluations_completed: usize,
    pub sessions_completed: usize,
    pub info_collected: usize,
    pub errors: usize,
    pub recent: Vec<String>,
    pub error_lines: Vec<String>,
    pub info_lines: Vec<String>,
}

impl DailySummary {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>, recent: usize) -> Self {
        let lines: Vec<&str> = lines.into_iter().collect();
        let mut summary = DailySummary::default();

        for line in &lines {
            if line.contains("API Call") {
                summary.api_calls += 1;
            }
            if line.contains("ERROR") {
                summary.errors += 1;
                summary.error_lines.push(line.trim().to_string());
            }
            if line.contains("Question ") && line.contains(" generated:") {
                summary.questions_generated += 1;
            }
            if line.contains("Evaluation ") && line.contains(" completed - ") {
                summary.evaluations_completed += 1;
            }
            if line.contains(SESSION_COMPLETED_MARKER) {
                summary.sessions_completed += 1;
            }
            if line.contains(INFO_BLOCK_MARKER) {
                summary.info_collected += 1;
            }
        }

        summary.info_lines = info_block_lines(&lines);
        let start = lines.len().saturating_sub(recent);
        summary.recent = lines[start..].iter().map(|l| l.trim().to_string()).collect();
        summary
    }
}

/// Metadata echo lines from the first information block in the log.
fn info_block_lines(lines: &[&str]) -> Vec<String> {
    let Some(start) = lines.iter().position(|l| l.contains(INFO_BLOCK_MARKER)) else {
        return Vec::new();
    };
    lines[start + 1..]
        .iter()
        .take_while(|l| !l.contains("=========="))
        .filter(|l| INFO_FIELDS.iter().any(|field| l.contains(field)))
        .map(|l| l.trim().to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenReport {
    pub files_scanned: usize,
    pub total_tokens: u64,
    pub total_calls: u64,
    pub total_sessions: u64,
}

impl TokenReport {
    pub fn add_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            if line.contains("API Call") {
                if let Some(tokens) = total_tokens_in(line) {
                    self.total_tokens += tokens;
                    self.total_calls += 1;
                }
            }
            if line.contains(SESSION_COMPLETED_MARKER) {
                self.total_sessions += 1;
            }
        }
    }

    pub fn avg_tokens_per_session(&self) -> Option<f64> {
        (self.total_sessions > 0).then(|| self.total_tokens as f64 / self.total_sessions as f64)
    }

    pub fn avg_calls_per_session(&self) -> Option<f64> {
        (self.total_sessions > 0).then(|| self.total_calls as f64 / self.total_sessions as f64)
    }
}

/// `N` from `... Total: N, ...` in an API call line.
fn total_tokens_in(line: &str) -> Option<u64> {
    let (_, after) = line.split_once("Total:")?;
    after.split(',').next()?.trim().parse().ok()
}

/// `*.log` files directly under `dir`, sorted by name.
pub fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("No logs directory at {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == LOG_FILE_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Summary of the log for `date`, or `None` when that file does not exist.
pub fn daily_summary(dir: &Path, date: NaiveDate, recent: usize) -> Result<Option<DailySummary>> {
    let path = dir.join(log_file_name(date));
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(DailySummary::from_lines(content.lines(), recent)))
}

/// Aggregates token usage over every log file. Unreadable files are skipped
/// with a warning.
pub fn token_usage(dir: &Path) -> Result<TokenReport> {
    let mut report = TokenReport::default();
    for path in list_log_files(dir)? {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                report.files_scanned += 1;
                report.add_lines(content.lines());
            }
            Err(e) => warn!("Error reading {}: {}", path.display(), e),
        }
    }
    Ok(report)
}

/// Deletes log files last modified before `now - retention_days`.
/// Returns the removed paths. `retention_days` must be at least 1; a window
/// reaching past the representable date range removes nothing.
pub fn remove_expired_logs(
    dir: &Path,
    retention_days: i64,
    now: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    if retention_days < 1 {
        bail!("retention must be at least 1 day, got {retention_days}");
    }
    let Some(cutoff) = Duration::try_days(retention_days)
        .and_then(|window| now.checked_sub_signed(window))
    else {
        return Ok(Vec::new());
    };
    let cutoff: SystemTime = cutoff.into();
    let mut removed = Vec::new();

    for path in list_log_files(dir)? {
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if modified < cutoff {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            info!("Removed old log file: {}", path.display());
            removed.push(path);
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
2026-10-19T09:00:00Z  INFO interview_api::interview::session: New interview session started - Session ID: 1
2026-10-19T09:00:01Z  INFO interview_api::interview::session: ==================================================
2026-10-19T09:00:01Z  INFO interview_api::interview::session: INTERVIEW INFORMATION COLLECTED
2026-10-19T09:00:01Z  INFO interview_api::interview::session: Examiner Name: Dana
2026-10-19T09:00:01Z  INFO interview_api::interview::session: Difficulty Level: Beginner
2026-10-19T09:00:01Z  INFO interview_api::interview::session: Interview Date: 2026-10-19
2026-10-19T09:00:01Z  INFO interview_api::interview::session: Examiner Profile: HR Manager
2026-10-19T09:00:01Z  INFO interview_api::interview::session: Password Provided: Yes
2026-10-19T09:00:01Z  INFO interview_api::interview::session: ==================================================
2026-10-19T09:00:02Z  INFO interview_api::interview::metrics: API Call - Input: 70, Output: 12, Total: 82, Time: 1.10s
2026-10-19T09:00:02Z  INFO interview_api::interview::metrics: Question 1 generated: What is SUM?...
2026-10-19T09:00:09Z  INFO interview_api::interview::metrics: API Call - Input: 60, Output: 20, Total: 80, Time: 2.00s
2026-10-19T09:00:09Z  INFO interview_api::interview::metrics: Evaluation 1 completed - Score: 4, Time: 2.00s
2026-10-19T09:00:10Z ERROR interview_api::interview::metrics: Error - QuestionGeneration: Error generating question 2: LLM returned empty content
2026-10-19T09:05:00Z  INFO interview_api::interview::metrics: SESSION COMPLETED - ID: 1
2026-10-19T09:05:00Z  INFO interview_api::interview::metrics: Questions generated: 1
2026-10-19T09:05:00Z  INFO interview_api::interview::metrics: Evaluations completed: 1
";

    #[test]
    fn test_daily_summary_counts_entries() {
        let summary = DailySummary::from_lines(SAMPLE_LOG.lines(), 3);

        assert_eq!(summary.api_calls, 2);
        assert_eq!(summary.questions_generated, 1);
        assert_eq!(summary.evaluations_completed, 1);
        assert_eq!(summary.sessions_completed, 1);
        assert_eq!(summary.info_collected, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.recent.len(), 3);
        assert!(summary.recent[0].contains("SESSION COMPLETED"));
    }

    #[test]
    fn test_daily_summary_extracts_info_block() {
        let summary = DailySummary::from_lines(SAMPLE_LOG.lines(), 10);
        assert_eq!(summary.info_lines.len(), 5);
        assert!(summary.info_lines[0].ends_with("Examiner Name: Dana"));
        assert!(summary.info_lines[4].ends_with("Password Provided: Yes"));
    }

    #[test]
    fn test_token_report_sums_totals() {
        let mut report = TokenReport::default();
        report.add_lines(SAMPLE_LOG.lines());

        assert_eq!(report.total_tokens, 162);
        assert_eq!(report.total_calls, 2);
        assert_eq!(report.total_sessions, 1);
        assert_eq!(report.avg_tokens_per_session(), Some(162.0));
        assert_eq!(report.avg_calls_per_session(), Some(2.0));
    }

    #[test]
    fn test_token_report_without_sessions_has_no_averages() {
        let report = TokenReport::default();
        assert_eq!(report.avg_tokens_per_session(), None);
    }

    #[test]
    fn test_total_tokens_parsing() {
        assert_eq!(
            total_tokens_in("API Call - Input: 1, Output: 2, Total: 3, Time: 0.10s"),
            Some(3)
        );
        assert_eq!(total_tokens_in("API Call - Total: lots, Time: 1s"), None);
        assert_eq!(total_tokens_in("no totals here"), None);
    }

    #[test]
    fn test_files_on_disk_are_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        std::fs::write(dir.path().join(log_file_name(day)), SAMPLE_LOG).unwrap();
        std::fs::write(
            dir.path().join("excel_interview_20261018.log"),
            "API Call - Input: 5, Output: 5, Total: 10, Time: 0.50s\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "Total: 1000").unwrap();

        let report = token_usage(dir.path()).unwrap();
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.total_tokens, 172);

        let summary = daily_summary(dir.path(), day, 10).unwrap().unwrap();
        assert_eq!(summary.api_calls, 2);
        let missing = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(daily_summary(dir.path(), missing, 10).unwrap().is_none());
    }

    #[test]
    fn test_cleanup_removes_only_expired_logs() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("excel_interview_20261019.log");
        std::fs::write(&log, "fresh").unwrap();
        std::fs::write(dir.path().join("keep.txt"), "not a log").unwrap();

        let removed = remove_expired_logs(dir.path(), 7, Local::now()).unwrap();
        assert!(removed.is_empty());
        assert!(log.exists());

        // Ten days from now, the file is past the seven-day window.
        let later = Local::now() + Duration::days(10);
        let removed = remove_expired_logs(dir.path(), 7, later).unwrap();
        assert_eq!(removed, vec![log.clone()]);
        assert!(!log.exists());
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_cleanup_rejects_non_positive_retention() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("excel_interview_20261019.log");
        std::fs::write(&log, "today").unwrap();

        assert!(remove_expired_logs(dir.path(), 0, Local::now()).is_err());
        assert!(remove_expired_logs(dir.path(), -1, Local::now()).is_err());
        assert!(log.exists());
    }

    #[test]
    fn test_cleanup_with_huge_retention_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("excel_interview_20261019.log");
        std::fs::write(&log, "today").unwrap();

        let removed = remove_expired_logs(dir.path(), i64::MAX, Local::now()).unwrap();
        assert!(removed.is_empty());
        let removed = remove_expired_logs(dir.path(), 1_000_000_000, Local::now()).unwrap();
        assert!(removed.is_empty());
        assert!(log.exists());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_log_files(&dir.path().join("absent")).is_err());
    }
}
