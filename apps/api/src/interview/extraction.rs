//! Heuristics over raw model output.
//!
//! Pure functions only: nothing here touches the session or the network.

use once_cell::sync::Lazy;
use regex::Regex;

/// Line prefixes that mark the start of a second question.
const SECOND_QUESTION_MARKERS: &[&str] = &["Q2:", "Question 2:", "**Question 2:"];

/// Case-insensitive keywords that mark an evaluation or feedback section.
const FEEDBACK_KEYWORDS: &[&str] = &["evaluation:", "feedback:", "score:", "mark:"];

static SCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)/5").expect("score pattern is a valid regex"));

/// Highest score an evaluation can award.
pub const MAX_SCORE: u8 = 5;

/// Returns true for lines that end the first question.
pub fn is_cutoff_line(line: &str) -> bool {
    let line = line.trim();
    if SECOND_QUESTION_MARKERS
        .iter()
        .any(|marker| line.starts_with(marker))
    {
        return true;
    }
    let lower = line.to_lowercase();
    FEEDBACK_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Keeps the non-empty lines before the first cutoff line, joined with `\n`.
///
/// Returns an empty string when the very first line is a cutoff line;
/// callers fall back to the raw text in that case.
pub fn extract_single_question(response_text: &str) -> String {
    response_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take_while(|line| !is_cutoff_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `<digits>/5` in the text, clamped to `MAX_SCORE`.
/// `None` when there is no match or the digits overflow.
pub fn find_score(evaluation_text: &str) -> Option<u8> {
    let caps = SCORE_PATTERN.captures(evaluation_text)?;
    let value: u64 = caps[1].parse().ok()?;
    Some(value.min(MAX_SCORE as u64) as u8)
}

/// Score with the degraded default of 0.
pub fn extract_score(evaluation_text: &str) -> u8 {
    find_score(evaluation_text).unwrap_or(0)
}

/// Approximate token count: whitespace-delimited words.
pub fn approx_token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `max_chars` characters, for log previews.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
