//! Question and evaluation generation.
//!
//! Flow per call: build prompt → invoke model → record metrics → extract.
//! The generator itself is stateless; the caller passes the session's
//! `MetricsRecorder` so all accounting stays session-scoped.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::interview::extraction::{approx_token_count, extract_single_question, find_score};
use crate::interview::metrics::{CallKind, MetricsRecorder};
use crate::interview::models::Difficulty;
use crate::interview::prompts::{evaluation_prompt, question_prompt};
use crate::llm_client::{LanguageModel, LlmError};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Error generating question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: LlmError,
    },

    #[error("Error evaluating answer {index}: {source}")]
    Evaluation {
        index: usize,
        #[source]
        source: LlmError,
    },
}

impl GenerationError {
    /// Short label used in error records and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Question { .. } => "QuestionGeneration",
            GenerationError::Evaluation { .. } => "Evaluation",
        }
    }
}

/// Result of a successful evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
}

#[derive(Clone)]
pub struct Generator {
    llm: Arc<dyn LanguageModel>,
}

impl Generator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Generates question `index`. `previous_answer` is the raw input of the
    /// prior turn (or the skip marker) and is ignored for the first question.
    pub async fn generate_question(
        &self,
        index: usize,
        difficulty: Difficulty,
        previous_answer: Option<&str>,
        metrics: &mut MetricsRecorder,
    ) -> Result<String, GenerationError> {
        let previous_answer = if index > 1 { previous_answer } else { None };
        let prompt = question_prompt(difficulty, previous_answer);

        let started = Instant::now();
        let raw = match self.llm.invoke(&prompt).await {
            Ok(raw) => raw,
            Err(source) => {
                let err = GenerationError::Question { index, source };
                metrics.record_error(err.kind(), &err);
                return Err(err);
            }
        };
        let latency = started.elapsed();

        metrics.record_call(
            CallKind::Question,
            approx_token_count(&prompt),
            approx_token_count(&raw),
            latency,
        );

        let mut question = extract_single_question(&raw);
        if question.is_empty() {
            warn!(
                "Question {} extraction found no question lines; using raw response",
                index
            );
            question = raw.trim().to_string();
        }

        metrics.record_question(index, &question);
        info!("Question {} generated for {} level", index, difficulty);

        Ok(question)
    }

    /// Scores `answer` against `question`. A response without a `N/5`
    /// pattern scores 0 rather than failing the turn.
    pub async fn evaluate_answer(
        &self,
        index: usize,
        difficulty: Difficulty,
        question: &str,
        answer: &str,
        metrics: &mut MetricsRecorder,
    ) -> Result<Evaluation, GenerationError> {
        let prompt = evaluation_prompt(difficulty, question, answer);

        let started = Instant::now();
        let feedback = match self.llm.invoke(&prompt).await {
            Ok(feedback) => feedback,
            Err(source) => {
                let err = GenerationError::Evaluation { index, source };
                metrics.record_error(err.kind(), &err);
                return Err(err);
            }
        };
        let latency = started.elapsed();

        metrics.record_call(
            CallKind::Evaluation,
            approx_token_count(&prompt),
            approx_token_count(&feedback),
            latency,
        );

        let score = find_score(&feedback).unwrap_or_else(|| {
            warn!("Evaluation {} has no N/5 score; defaulting to 0", index);
            0
        });

        metrics.record_evaluation(index, score, latency);
        info!("Answer evaluated for {} level - Score: {}", difficulty, score);

        Ok(Evaluation {
            score,
            feedback: feedback.trim().to_string(),
        })
    }
}
