pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/interviews", post(handlers::handle_create_interview))
        .route(
            "/api/v1/interviews/:id",
            get(handlers::handle_get_interview).delete(handlers::handle_delete_interview),
        )
        .route("/api/v1/interviews/:id/info", post(handlers::handle_submit_info))
        .route("/api/v1/interviews/:id/answer", post(handlers::handle_answer))
        .route("/api/v1/interviews/:id/skip", post(handlers::handle_skip))
        .route("/api/v1/interviews/:id/retry", post(handlers::handle_retry))
        .route("/api/v1/interviews/:id/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/interviews/:id/report",
            get(handlers::handle_download_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::interview::generator::tests::ScriptedModel;
    use crate::interview::report::{parse_report_results, QuestionResult};

    fn config(report_dir: Option<PathBuf>) -> Config {
        Config {
            google_api_key: "test-key".to_string(),
            llm_model: "scripted".to_string(),
            llm_temperature: 0.3,
            port: 0,
            rust_log: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            log_retention_days: 7,
            session_idle_mins: 60,
            report_dir,
        }
    }

    fn app(replies: &[&str], report_dir: Option<PathBuf>) -> Router {
        let llm = Arc::new(ScriptedModel::ok(replies));
        build_router(AppState::new(llm, config(report_dir)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn start_interview(app: &Router) -> String {
        let (status, created) = send_json(app, "POST", "/api/v1/interviews", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["phase"], "collecting_user_info");
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, view) = send_json(
            app,
            "POST",
            &format!("/api/v1/interviews/{id}/info"),
            Some(json!({
                "examiner_name": "Dana",
                "password": "secret",
                "difficulty_level": "Advanced",
                "interview_date": "2026-10-19",
                "examiner_profile": "Director"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"], "in_progress");
        id
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(&[], None);
        let (status, body) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_interview_is_not_found() {
        let app = app(&[], None);
        let uri = format!("/api/v1/interviews/{}", uuid::Uuid::new_v4());
        let (status, body) = send_json(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_password_is_a_validation_error() {
        let app = app(&[], None);
        let (_, created) = send_json(&app, "POST", "/api/v1/interviews", None).await;
        let id = created["session_id"].as_str().unwrap();

        let (status, body) = send_json(
            &app,
            "POST",
            &format!("/api/v1/interviews/{id}/info"),
            Some(json!({"examiner_name": "Dana", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generation_failure_returns_bad_gateway_and_retry_recovers() {
        // the scripted model has nothing left after the first reply
        let app = app(&["Q1"], None);
        let id = start_interview(&app).await;

        let (status, body) =
            send_json(&app, "POST", &format!("/api/v1/interviews/{id}/skip"), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");

        let (_, view) = send_json(&app, "GET", &format!("/api/v1/interviews/{id}"), None).await;
        assert_eq!(view["current_question_index"], 1);
        assert_eq!(view["awaiting_question"], true);
    }

    #[tokio::test]
    async fn test_report_before_completion_is_conflict() {
        let app = app(&["Q1"], None);
        let id = start_interview(&app).await;
        let (status, _) =
            send(&app, "GET", &format!("/api/v1/interviews/{id}/report"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_full_interview_over_http_and_report_export() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(
            &[
                "Q1", "4/5 good", "Q2", "Q3", "1/5 weak", "Q4", "Q5", "5/5 great",
            ],
            Some(dir.path().to_path_buf()),
        );
        let id = start_interview(&app).await;
        let base = format!("/api/v1/interviews/{id}");

        let answer = |text: &str| Some(json!({ "answer": text }));
        send_json(&app, "POST", &format!("{base}/answer"), answer("a1")).await;
        send_json(&app, "POST", &format!("{base}/skip"), None).await;
        send_json(&app, "POST", &format!("{base}/answer"), answer("a3")).await;
        send_json(&app, "POST", &format!("{base}/skip"), None).await;
        let (status, view) =
            send_json(&app, "POST", &format!("{base}/answer"), answer("a5")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"], "completed");
        assert_eq!(view["current_question_index"], 5);
        let summary = &view["completion"]["summary"];
        assert_eq!(summary["answered_count"], 3);
        assert_eq!(summary["skipped_count"], 2);
        assert!((summary["overall_score"].as_f64().unwrap() - 2.0).abs() < 1e-9);
        assert!((summary["avg_answered_score"].as_f64().unwrap() - 10.0 / 3.0).abs() < 1e-9);

        let (status, report) = send(&app, "GET", &format!("{base}/report"), None).await;
        assert_eq!(status, StatusCode::OK);
        let report = String::from_utf8(report).unwrap();
        assert_eq!(
            parse_report_results(&report).unwrap(),
            vec![
                QuestionResult::Scored(4),
                QuestionResult::Skipped,
                QuestionResult::Scored(1),
                QuestionResult::Skipped,
                QuestionResult::Scored(5),
            ]
        );

        let exported: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(exported.len(), 1);

        let (status, _) = send(&app, "DELETE", &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
