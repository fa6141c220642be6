//! JSON API over the correction pipeline.
//!
//! `POST /check` takes `{"text": "..."}` and answers with the corrected text
//! and the grammar issues. Input is trimmed and capped before any service is
//! called. Pipeline calls block, so they run on tokio's blocking pool.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::AppError;
use crate::grammar::Issue;
use crate::pipeline::{CorrectionPipeline, PipelineResult};
use crate::text::preview;

/// Suggestions returned per issue.
pub const MAX_SUGGESTIONS: usize = 3;

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<CorrectionPipeline>,
    max_chars: usize,
}

impl AppState {
    pub fn new(pipeline: Arc<CorrectionPipeline>, max_chars: usize) -> Self {
        Self {
            pipeline,
            max_chars,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Missing and `null` are both treated as no text.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IssueView {
    pub message: String,
    pub context: String,
    pub replacements: Vec<String>,
    pub offset: usize,
    pub length: usize,
}

impl From<&Issue> for IssueView {
    fn from(issue: &Issue) -> Self {
        Self {
            message: issue.message.clone(),
            context: issue.context.clone(),
            replacements: issue
                .replacements
                .iter()
                .take(MAX_SUGGESTIONS)
                .cloned()
                .collect(),
            offset: issue.offset,
            length: issue.length,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub original: String,
    pub corrected: String,
    pub spelling_fixed: bool,
    pub grammar_issues: usize,
    pub issues: Vec<IssueView>,
}

impl From<&PipelineResult> for CheckResponse {
    fn from(result: &PipelineResult) -> Self {
        Self {
            original: result.original.clone(),
            corrected: result.corrected.clone(),
            spelling_fixed: result.spelling.changed,
            grammar_issues: result.grammar.issue_count(),
            issues: result.grammar.issues.iter().map(IssueView::from).collect(),
        }
    }
}

/// Error body `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(details: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Server error: {}", details),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::EmptyInput => Self {
                status: StatusCode::BAD_REQUEST,
                message: "No text provided".to_string(),
            },
            AppError::TextTooLong { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: error.to_string(),
            },
            other => Self::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Invalid request: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Trim and admit request text: not empty, at most `max_chars` characters.
pub fn validate_text(raw: &str, max_chars: usize) -> Result<&str, AppError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let len = text.chars().count();
    if len > max_chars {
        return Err(AppError::TextTooLong {
            len,
            max: max_chars,
        });
    }

    Ok(text)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/check", post(check_text))
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("🛑 Shutting down");
        })
        .await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn check_text(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(request) = payload?;
    let raw = request.text.as_deref().unwrap_or_default();
    let text = validate_text(raw, state.max_chars)?.to_string();
    info!("Checking text: {}", preview(&text, 50));

    let pipeline = Arc::clone(&state.pipeline);
    let result = tokio::task::spawn_blocking(move || pipeline.run(&text))
        .await
        .map_err(ApiError::internal)?
        .map_err(|e| {
            error!("❌ Correction failed: {}", e);
            ApiError::from(AppError::from(e))
        })?;

    info!("Result: {}", preview(&result.corrected, 50));
    Ok(Json(CheckResponse::from(&result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{apply_issues, GrammarError, MockGrammarService};
    use crate::spell_check::MockSpellingService;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(grammar: MockGrammarService, spelling: Option<MockSpellingService>) -> Router {
        let spelling = spelling.map(|s| Arc::new(s) as Arc<dyn crate::spell_check::SpellingService>);
        let pipeline = CorrectionPipeline::new(Arc::new(grammar), spelling);
        router(AppState::new(Arc::new(pipeline), 5000))
    }

    fn unused_grammar() -> MockGrammarService {
        let mut grammar = MockGrammarService::new();
        grammar.expect_check().times(0);
        grammar.expect_apply().times(0);
        grammar
    }

    async fn post_check(app: Router, body: Value) -> (StatusCode, Value) {
        post_raw(app, Some("application/json"), body.to_string()).await
    }

    async fn post_raw(app: Router, content_type: Option<&str>, body: String) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri("/check");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_validate_text() {
        assert_eq!(validate_text("  hi there \n", 10).unwrap(), "hi there");
        assert!(matches!(validate_text(" \t ", 10), Err(AppError::EmptyInput)));
        assert!(matches!(
            validate_text("ééééé", 4),
            Err(AppError::TextTooLong { len: 5, max: 4 })
        ));
        assert!(validate_text("ééééé", 5).is_ok());
    }

    #[test]
    fn test_issue_view_caps_suggestions() {
        let issue = Issue::new("spelling", 0, 4).with_replacements(["a", "b", "c", "d", "e"]);
        assert_eq!(IssueView::from(&issue).replacements, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_check_success() {
        let mut grammar = MockGrammarService::new();
        grammar.expect_check().times(1).returning(|_| {
            Ok(vec![Issue::new("Use 'have'", 2, 3)
                .with_context("I has a pen")
                .with_replacements(["have", "had", "hat", "ham"])])
        });
        grammar
            .expect_apply()
            .returning(|text, issues| apply_issues(text, issues));

        let (status, body) = post_check(app(grammar, None), json!({"text": "  I has a pen  "})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original"], "I has a pen");
        assert_eq!(body["corrected"], "I have a pen");
        assert_eq!(body["spelling_fixed"], false);
        assert_eq!(body["grammar_issues"], 1);
        assert_eq!(body["issues"][0]["offset"], 2);
        assert_eq!(body["issues"][0]["length"], 3);
        assert_eq!(body["issues"][0]["context"], "I has a pen");
        assert_eq!(body["issues"][0]["replacements"], json!(["have", "had", "hat"]));
    }

    #[tokio::test]
    async fn test_check_reports_spelling_fix() {
        let mut spelling = MockSpellingService::new();
        spelling
            .expect_correct()
            .returning(|_| "tomorrow was a holiday".to_string());
        let mut grammar = MockGrammarService::new();
        grammar.expect_check().returning(|_| Ok(vec![]));
        grammar
            .expect_apply()
            .returning(|text, issues| apply_issues(text, issues));

        let (status, body) =
            post_check(app(grammar, Some(spelling)), json!({"text": "tommorrow was a holiday"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["spelling_fixed"], true);
        assert_eq!(body["corrected"], "tomorrow was a holiday");
        assert_eq!(body["grammar_issues"], 0);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_services() {
        let mut spelling = MockSpellingService::new();
        spelling.expect_correct().times(0);

        let (status, body) =
            post_check(app(unused_grammar(), Some(spelling)), json!({"text": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_missing_text_field_is_rejected() {
        let (status, body) = post_check(app(unused_grammar(), None), json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_null_text_is_rejected() {
        let (status, body) = post_check(app(unused_grammar(), None), json!({"text": null})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_errors() {
        let cases = [
            (Some("application/json"), "not json".to_string(), StatusCode::BAD_REQUEST),
            (Some("application/json"), json!({"text": 5}).to_string(), StatusCode::UNPROCESSABLE_ENTITY),
            (Some("text/plain"), json!({"text": "hi"}).to_string(), StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (None, json!({"text": "hi"}).to_string(), StatusCode::UNSUPPORTED_MEDIA_TYPE),
        ];

        for (content_type, payload, expected) in cases {
            let (status, body) = post_raw(app(unused_grammar(), None), content_type, payload).await;
            assert_eq!(status, expected);
            let message = body["error"].as_str().unwrap();
            assert!(message.starts_with("Invalid request: "), "{}", message);
        }
    }

    #[tokio::test]
    async fn test_oversized_text_is_rejected_before_services() {
        let text = "a".repeat(5001);
        let (status, body) = post_check(app(unused_grammar(), None), json!({"text": text})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Text too long. Maximum 5000 characters.");
    }

    #[tokio::test]
    async fn test_text_at_cap_is_accepted() {
        let mut grammar = MockGrammarService::new();
        grammar.expect_check().times(1).returning(|_| Ok(vec![]));
        grammar
            .expect_apply()
            .returning(|text, issues| apply_issues(text, issues));

        let (status, _) = post_check(app(grammar, None), json!({"text": "a".repeat(5000)})).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_grammar_failure_is_server_error() {
        let mut grammar = MockGrammarService::new();
        grammar.expect_check().returning(|_| {
            Err(GrammarError::Status {
                status: 503,
                body: "overloaded".to_string(),
            })
        });
        grammar.expect_apply().times(0);

        let (status, body) = post_check(app(grammar, None), json!({"text": "I has a pen"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Server error:"));
        assert!(message.contains("overloaded"));
        assert!(body.get("corrected").is_none());
    }

    #[tokio::test]
    async fn test_index_page() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(unused_grammar(), None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/check"));
    }
}
