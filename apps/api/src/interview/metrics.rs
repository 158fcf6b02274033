//! Session-scoped metrics recorder.
//!
//! Created with the session, replaced on reset, dropped with the session.
//! Every record is also emitted through `tracing` so the per-day log file
//! carries the same information for offline inspection.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::interview::extraction::preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Question,
    Evaluation,
}

/// One LLM invocation. Token counts are word-count estimates.
#[derive(Debug, Clone, Serialize)]
pub struct CallMetric {
    pub kind: CallKind,
    pub input_token_estimate: usize,
    pub output_token_estimate: usize,
    pub latency_secs: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub message: String,
    /// Full `source()` chain, outermost first.
    pub detail: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
    pub calls: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionMetricsSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total_time_secs: f64,
    pub token_usage: TokenUsage,
    pub questions_generated: usize,
    pub evaluations_completed: usize,
    pub errors_count: usize,
    pub avg_response_time_secs: f64,
    pub errors: Vec<ErrorRecord>,
}

#[derive(Debug)]
pub struct MetricsRecorder {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    started: Instant,
    calls: Vec<CallMetric>,
    errors: Vec<ErrorRecord>,
    questions_generated: usize,
    evaluations_completed: usize,
}

impl MetricsRecorder {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            started_at: Utc::now(),
            started: Instant::now(),
            calls: Vec::new(),
            errors: Vec::new(),
            questions_generated: 0,
            evaluations_completed: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn calls(&self) -> &[CallMetric] {
        &self.calls
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn questions_generated(&self) -> usize {
        self.questions_generated
    }

    pub fn evaluations_completed(&self) -> usize {
        self.evaluations_completed
    }

    pub fn record_call(
        &mut self,
        kind: CallKind,
        input_tokens: usize,
        output_tokens: usize,
        latency: Duration,
    ) {
        let latency_secs = latency.as_secs_f64();
        info!(
            "API Call - Input: {}, Output: {}, Total: {}, Time: {:.2}s",
            input_tokens,
            output_tokens,
            input_tokens + output_tokens,
            latency_secs
        );
        self.calls.push(CallMetric {
            kind,
            input_token_estimate: input_tokens,
            output_token_estimate: output_tokens,
            latency_secs,
            timestamp: Utc::now(),
        });
    }

    pub fn record_question(&mut self, index: usize, question: &str) {
        self.questions_generated += 1;
        info!("Question {} generated: {}...", index, preview(question, 100));
    }

    pub fn record_evaluation(&mut self, index: usize, score: u8, latency: Duration) {
        self.evaluations_completed += 1;
        info!(
            "Evaluation {} completed - Score: {}, Time: {:.2}s",
            index,
            score,
            latency.as_secs_f64()
        );
    }

    /// Records an error with its whole source chain and logs it.
    pub fn record_error(&mut self, kind: &str, err: &(dyn StdError + 'static)) {
        let message = err.to_string();
        let mut detail = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push(cause.to_string());
            source = cause.source();
        }

        error!("Error - {}: {}", kind, message);
        if !detail.is_empty() {
            error!("Caused by: {}", detail.join(" <- "));
        }

        self.errors.push(ErrorRecord {
            timestamp: Utc::now(),
            kind: kind.to_string(),
            message,
            detail,
        });
    }

    pub fn token_usage(&self) -> TokenUsage {
        let input_tokens: usize = self.calls.iter().map(|c| c.input_token_estimate).sum();
        let output_tokens: usize = self.calls.iter().map(|c| c.output_token_estimate).sum();
        TokenUsage {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            calls: self.calls.len(),
        }
    }

    pub fn avg_response_time_secs(&self) -> f64 {
        if self.calls.is_empty() {
            return 0.0;
        }
        self.calls.iter().map(|c| c.latency_secs).sum::<f64>() / self.calls.len() as f64
    }

    /// Snapshot of the session's metrics. Does not log.
    pub fn summary(&self) -> SessionMetricsSummary {
        SessionMetricsSummary {
            session_id: self.session_id,
            started_at: self.started_at,
            total_time_secs: self.started.elapsed().as_secs_f64(),
            token_usage: self.token_usage(),
            questions_generated: self.questions_generated,
            evaluations_completed: self.evaluations_completed,
            errors_count: self.errors.len(),
            avg_response_time_secs: self.avg_response_time_secs(),
            errors: self.errors.clone(),
        }
    }

    /// Builds the summary and writes the session-completion block to the log.
    pub fn finish(&self) -> SessionMetricsSummary {
        let summary = self.summary();
        info!("SESSION COMPLETED - ID: {}", summary.session_id);
        info!("Total tokens: {}", summary.token_usage.total_tokens);
        info!("Questions generated: {}", summary.questions_generated);
        info!("Evaluations completed: {}", summary.evaluations_completed);
        info!("Errors encountered: {}", summary.errors_count);
        info!("Session duration: {:.2} seconds", summary.total_time_secs);
        info!(
            "Average response time: {:.2} seconds",
            summary.avg_response_time_secs
        );
        info!("{}", "=".repeat(50));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_new_recorder_is_empty() {
        let recorder = MetricsRecorder::new(Uuid::new_v4());
        assert_eq!(recorder.token_usage(), TokenUsage::default());
        assert_eq!(recorder.avg_response_time_secs(), 0.0);
        assert!(recorder.errors().is_empty());
    }

    #[test]
    fn test_token_usage_and_latency_accumulate() {
        let mut recorder = MetricsRecorder::new(Uuid::new_v4());
        recorder.record_call(CallKind::Question, 40, 12, Duration::from_millis(1000));
        recorder.record_call(CallKind::Evaluation, 60, 30, Duration::from_millis(3000));

        let usage = recorder.token_usage();
        assert_eq!(usage.input_tokens, 100);
        assert_eq!(usage.output_tokens, 42);
        assert_eq!(usage.total_tokens, 142);
        assert_eq!(usage.calls, 2);
        assert!((recorder.avg_response_time_secs() - 2.0).abs() < 1e-9);
        assert_eq!(recorder.calls()[1].kind, CallKind::Evaluation);
    }

    #[test]
    fn test_counters_feed_summary() {
        let mut recorder = MetricsRecorder::new(Uuid::new_v4());
        recorder.record_question(1, "What is SUM?");
        recorder.record_question(2, "What is COUNT?");
        recorder.record_evaluation(1, 4, Duration::from_millis(500));

        let summary = recorder.summary();
        assert_eq!(summary.session_id, recorder.session_id());
        assert_eq!(summary.questions_generated, 2);
        assert_eq!(summary.evaluations_completed, 1);
        assert_eq!(summary.errors_count, 0);
    }

    #[test]
    fn test_error_records_keep_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("question 3 failed")]
        struct Outer(#[source] LlmError);

        let mut recorder = MetricsRecorder::new(Uuid::new_v4());
        let err = Outer(LlmError::EmptyContent);
        recorder.record_error("QuestionGeneration", &err);

        let record = &recorder.errors()[0];
        assert_eq!(record.kind, "QuestionGeneration");
        assert_eq!(record.message, "question 3 failed");
        assert_eq!(record.detail, vec!["LLM returned empty content".to_string()]);
        assert_eq!(recorder.summary().errors_count, 1);
    }
}
