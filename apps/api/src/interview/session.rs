//! Interview session state machine.
//!
//! Phases: CollectingUserInfo → InProgress → Completed. Every user action is
//! a `SessionEvent` consumed by `InterviewSession::apply`, which returns an
//! immutable `SessionView` for rendering. Validation and phase errors leave
//! the session untouched. Generation failures are recorded in the session's
//! metrics and keep any progress made before the failed call: a failed first
//! question still moves to `InProgress` with the info stored, and a failed
//! next question keeps the just-completed turn. Both park the session with
//! `awaiting_question` set until `Retry` succeeds.
//!
//! `current_question_index()` is `turns.len()`. A new turn is only pushed
//! once the previous one is terminal.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::time::{Duration, Instant};
use tracing::info;
use uuid::Uuid;

use crate::interview::generator::{GenerationError, Generator};
use crate::interview::metrics::{MetricsRecorder, SessionMetricsSummary};
use crate::interview::models::{
    InfoForm, InterviewInfo, Turn, TurnOutcome, TOTAL_QUESTIONS,
};
use crate::interview::summary::InterviewSummary;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    CollectingUserInfo,
    InProgress,
    Completed,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SubmitInfo(InfoForm),
    Answer(String),
    Skip,
    Retry,
    Reset,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::SubmitInfo(_) => "submit_info",
            SessionEvent::Answer(_) => "answer",
            SessionEvent::Skip => "skip",
            SessionEvent::Retry => "retry",
            SessionEvent::Reset => "reset",
        }
    }
}

/// Final aggregation produced on the transition to `Completed`.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub summary: InterviewSummary,
    pub metrics: SessionMetricsSummary,
    pub completed_at: DateTime<Utc>,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub info: Option<InterviewInfo>,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub turns: Vec<Turn>,
    /// Text of the question waiting for an answer or skip.
    pub pending_question: Option<String>,
    /// True when the session is in progress but the next question still has
    /// to be generated (after a generation failure).
    pub awaiting_question: bool,
    pub questions_generated: usize,
    pub evaluations_completed: usize,
    pub completion: Option<Completion>,
}

#[derive(Debug)]
pub struct InterviewSession {
    id: Uuid,
    phase: Phase,
    info: Option<InterviewInfo>,
    turns: Vec<Turn>,
    metrics: MetricsRecorder,
    completion: Option<Completion>,
    last_activity: Instant,
}

impl InterviewSession {
    pub fn new(id: Uuid) -> Self {
        info!("New interview session started - Session ID: {}", id);
        Self {
            id,
            phase: Phase::CollectingUserInfo,
            info: None,
            turns: Vec::new(),
            metrics: MetricsRecorder::new(id),
            completion: None,
            last_activity: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn info(&self) -> Option<&InterviewInfo> {
        self.info.as_ref()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn current_question_index(&self) -> usize {
        self.turns.len()
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Time since the session was created or last received an event.
    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    fn pending_turn(&self) -> Option<&Turn> {
        self.turns.last().filter(|t| !t.is_terminal())
    }

    fn awaiting_question(&self) -> bool {
        self.phase == Phase::InProgress
            && self.pending_turn().is_none()
            && self.turns.len() < TOTAL_QUESTIONS
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            phase: self.phase,
            info: self.info.clone(),
            current_question_index: self.current_question_index(),
            total_questions: TOTAL_QUESTIONS,
            turns: self.turns.clone(),
            pending_question: self.pending_turn().map(|t| t.question.clone()),
            awaiting_question: self.awaiting_question(),
            questions_generated: self.metrics.questions_generated(),
            evaluations_completed: self.metrics.evaluations_completed(),
            completion: self.completion.clone(),
        }
    }

    /// Consumes one event and returns the resulting view.
    pub async fn apply(
        &mut self,
        event: SessionEvent,
        generator: &Generator,
    ) -> Result<SessionView, SessionError> {
        let name = event.name();
        self.last_activity = Instant::now();
        match event {
            SessionEvent::SubmitInfo(form) => self.submit_info(form, generator).await?,
            SessionEvent::Answer(answer) => self.answer(answer, generator).await?,
            SessionEvent::Skip => self.skip(generator).await?,
            SessionEvent::Retry => self.retry(generator).await?,
            SessionEvent::Reset => self.reset(),
        }
        info!(
            session_id = %self.id,
            event = name,
            index = self.current_question_index(),
            "Session event applied"
        );
        Ok(self.view())
    }

    async fn submit_info(
        &mut self,
        form: InfoForm,
        generator: &Generator,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::CollectingUserInfo {
            return Err(SessionError::InvalidState(
                "interview information has already been collected".to_string(),
            ));
        }

        let examiner_name = form.examiner_name.trim();
        if examiner_name.is_empty() || form.password.trim().is_empty() {
            return Err(SessionError::Validation(
                "Please fill in all required fields (Examiner Name and Password)".to_string(),
            ));
        }
        if examiner_name.chars().any(char::is_control) {
            return Err(SessionError::Validation(
                "Examiner Name must be a single line of text".to_string(),
            ));
        }

        let info = InterviewInfo {
            examiner_name: examiner_name.to_string(),
            difficulty_level: form.difficulty_level,
            interview_date: form
                .interview_date
                .unwrap_or_else(|| Local::now().date_naive()),
            examiner_profile: form.examiner_profile,
            password_provided: true,
        };

        info!("{}", "=".repeat(50));
        info!("INTERVIEW INFORMATION COLLECTED");
        info!("Examiner Name: {}", info.examiner_name);
        info!("Difficulty Level: {}", info.difficulty_level);
        info!("Interview Date: {}", info.interview_date.format("%Y-%m-%d"));
        info!("Examiner Profile: {}", info.examiner_profile);
        info!("Password Provided: Yes");
        info!("{}", "=".repeat(50));

        self.info = Some(info);
        self.phase = Phase::InProgress;

        self.generate_next_question(generator).await
    }

    async fn answer(&mut self, answer: String, generator: &Generator) -> Result<(), SessionError> {
        let (index, question) = {
            let turn = self.require_pending_turn("answer")?;
            (turn.index, turn.question.clone())
        };
        if answer.trim().is_empty() {
            return Err(SessionError::Validation("answer cannot be empty".to_string()));
        }
        let difficulty = self.difficulty();

        let evaluation = generator
            .evaluate_answer(index, difficulty, &question, &answer, &mut self.metrics)
            .await?;

        self.complete_pending_turn(TurnOutcome::Answered {
            answer,
            evaluation: evaluation.feedback,
            score: evaluation.score,
        })?;

        self.advance(generator).await
    }

    async fn skip(&mut self, generator: &Generator) -> Result<(), SessionError> {
        let index = self.require_pending_turn("skip")?.index;
        self.complete_pending_turn(TurnOutcome::Skipped)?;
        info!("Question {} skipped by user", index);

        self.advance(generator).await
    }

    async fn retry(&mut self, generator: &Generator) -> Result<(), SessionError> {
        if !self.awaiting_question() {
            return Err(SessionError::InvalidState(
                "no question generation is pending".to_string(),
            ));
        }
        self.generate_next_question(generator).await
    }

    fn reset(&mut self) {
        info!("Interview reset - Session ID: {}", self.id);
        self.phase = Phase::CollectingUserInfo;
        self.info = None;
        self.turns.clear();
        self.completion = None;
        self.metrics = MetricsRecorder::new(self.id);
    }

    fn require_pending_turn(&self, action: &str) -> Result<&Turn, SessionError> {
        if self.phase != Phase::InProgress {
            return Err(SessionError::InvalidState(format!(
                "cannot {action}: interview is not in progress"
            )));
        }
        self.pending_turn().ok_or_else(|| {
            SessionError::InvalidState(format!("cannot {action}: no question is pending"))
        })
    }

    fn complete_pending_turn(&mut self, outcome: TurnOutcome) -> Result<(), SessionError> {
        match self.turns.last_mut() {
            Some(turn) if turn.outcome.is_none() => {
                turn.outcome = Some(outcome);
                Ok(())
            }
            Some(turn) => Err(SessionError::InvalidState(format!(
                "turn {} is already complete",
                turn.index
            ))),
            None => Err(SessionError::InvalidState(
                "no question has been asked yet".to_string(),
            )),
        }
    }

    fn difficulty(&self) -> crate::interview::models::Difficulty {
        self.info
            .as_ref()
            .map(|i| i.difficulty_level)
            .unwrap_or_default()
    }

    /// After a terminal turn: ask the next question or finish.
    async fn advance(&mut self, generator: &Generator) -> Result<(), SessionError> {
        if self.turns.len() < TOTAL_QUESTIONS {
            self.generate_next_question(generator).await
        } else {
            self.complete();
            Ok(())
        }
    }

    async fn generate_next_question(&mut self, generator: &Generator) -> Result<(), SessionError> {
        let index = self.turns.len() + 1;
        let difficulty = self.difficulty();
        let previous = self
            .turns
            .last()
            .and_then(|t| t.candidate_input())
            .map(str::to_owned);

        let question = generator
            .generate_question(index, difficulty, previous.as_deref(), &mut self.metrics)
            .await?;

        self.turns.push(Turn::pending(index, question));
        Ok(())
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        let difficulty = self.difficulty();
        let summary = InterviewSummary::from_turns(difficulty, &self.turns);

        info!("Interview completed successfully");
        info!("FINAL INTERVIEW SUMMARY:");
        if let Some(info) = &self.info {
            info!("Examiner: {}", info.examiner_name);
            info!("Difficulty: {}", info.difficulty_level);
            info!("Date: {}", info.interview_date.format("%Y-%m-%d"));
            info!("Profile: {}", info.examiner_profile);
        }
        info!(
            "Overall score: {:.1}/5 (answered average {:.1}/5, answered {}, skipped {})",
            summary.overall_score,
            summary.avg_answered_score,
            summary.answered_count,
            summary.skipped_count
        );

        let metrics = self.metrics.finish();
        self.completion = Some(Completion {
            summary,
            metrics,
            completed_at: Utc::now(),
        });
    }
}
