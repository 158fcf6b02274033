//! Axum route handlers for the Interview API.
//!
//! Each handler turns one user action into a `SessionEvent`, applies it under
//! the session's lock, and returns the resulting `SessionView`.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::InfoForm;
use crate::interview::report::{export_report, render_report, report_filename};
use crate::interview::session::{InterviewSession, SessionEvent, SessionView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Opens a new session waiting for the interview information form.
pub async fn handle_create_interview(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    let view = session.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!("Interview session {} closed", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/interviews/:id/info
///
/// Validates the metadata form and generates the first question.
pub async fn handle_submit_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<InfoForm>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, id, SessionEvent::SubmitInfo(form)).await
}

/// POST /api/v1/interviews/:id/answer
///
/// Evaluates the answer to the pending question, then asks the next one
/// (or completes the interview after the fifth).
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, id, SessionEvent::Answer(request.answer)).await
}

/// POST /api/v1/interviews/:id/skip
pub async fn handle_skip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, id, SessionEvent::Skip).await
}

/// POST /api/v1/interviews/:id/retry
///
/// Re-attempts question generation after a failed call.
pub async fn handle_retry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, id, SessionEvent::Retry).await
}

/// POST /api/v1/interviews/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    apply_event(&state, id, SessionEvent::Reset).await
}

/// GET /api/v1/interviews/:id/report
///
/// Plain-text report download. Only available once the interview is complete.
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = find_session(&state, id).await?;
    let session = session.lock().await;

    let generated_at = Local::now().naive_local();
    let report = build_report(&session, generated_at)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_filename(generated_at)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Interview {id} not found"))
}

async fn find_session(
    state: &AppState,
    id: Uuid,
) -> Result<std::sync::Arc<tokio::sync::Mutex<InterviewSession>>, AppError> {
    state.sessions.get(id).await.ok_or_else(|| not_found(id))
}

async fn apply_event(
    state: &AppState,
    id: Uuid,
    event: SessionEvent,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(state, id).await?;
    let mut session = session.lock().await;

    let was_completed = session.is_completed();
    let view = session.apply(event, &state.generator).await?;

    if !was_completed && session.is_completed() {
        export_on_completion(state, &session);
    }

    Ok(Json(view))
}

fn build_report(
    session: &InterviewSession,
    generated_at: chrono::NaiveDateTime,
) -> Result<String, AppError> {
    match (session.info(), session.completion()) {
        (Some(info), Some(completion)) => Ok(render_report(
            info,
            session.turns(),
            &completion.summary,
            generated_at,
        )),
        _ => Err(AppError::InvalidState(
            "the report is available once the interview is completed".to_string(),
        )),
    }
}

/// Writes the report to `REPORT_DIR` when configured. Export failures are
/// logged; they never fail the answer that completed the interview.
fn export_on_completion(state: &AppState, session: &InterviewSession) {
    let Some(dir) = &state.config.report_dir else {
        return;
    };
    let generated_at = Local::now().naive_local();
    let result = build_report(session, generated_at)
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .and_then(|report| export_report(dir, &report, generated_at));
    match result {
        Ok(path) => info!("Interview report exported to {}", path.display()),
        Err(e) => warn!("Failed to export interview report: {e:?}"),
    }
}
