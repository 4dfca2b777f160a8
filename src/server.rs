use axum::{
    Json, Router,
    extract::State,
    http::{Method, header},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{MoodError, Result};
use crate::generator::Generator;
use crate::models::{AnalyzeRequest, SuggestionResponse};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text.";

const EMPTY_INPUT_COLOR: &str = "#ffffff";
const SUGGESTION_COLOR: &str = "#ffcc00";
const FONT_COLOR: &str = "#000000";

const INDEX_HTML: &str = include_str!("../assets/mood.html");
const MOOD_JS: &str = include_str!("../assets/mood.js");

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/static/js/mood.js", get(mood_js))
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn mood_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        MOOD_JS,
    )
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<SuggestionResponse> {
    let input = req.text.as_deref().map(str::trim).unwrap_or_default();

    if input.is_empty() {
        return Json(SuggestionResponse {
            suggestion: EMPTY_INPUT_MESSAGE.to_string(),
            color: EMPTY_INPUT_COLOR.to_string(),
            font_color: FONT_COLOR.to_string(),
        });
    }

    let suggestion = state.generator.suggest(input).await;
    tracing::info!(source = ?suggestion.source, "Generated suggestion");

    Json(SuggestionResponse {
        suggestion: suggestion.text,
        color: SUGGESTION_COLOR.to_string(),
        font_color: FONT_COLOR.to_string(),
    })
}

/// Run the HTTP server until it fails or the process is interrupted
pub async fn run(cfg: &ServerConfig, state: AppState) -> Result<()> {
    let addr: SocketAddr = cfg.bind.parse().map_err(|e| {
        MoodError::Config(format!("Invalid bind address '{}': {e}", cfg.bind))
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(name = %cfg.name, %addr, "Starting server");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, Mode};
    use crate::error::{UpstreamError, UpstreamErrorKind};
    use crate::generator::{Suggestion, SuggestionGenerator, UNAVAILABLE_MESSAGE};
    use crate::mock_pool::{FixedPicker, MOCK_RESPONSES, MockPool};
    use crate::models::{Candidate, Content, GenerateContentResponse, Part};
    use crate::transport::MockTransport;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records every input it is asked about
    #[derive(Default)]
    struct RecordingGenerator {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Generator for RecordingGenerator {
        async fn suggest(&self, input_text: &str) -> Suggestion {
            self.inputs.lock().unwrap().push(input_text.to_string());
            Suggestion {
                text: format!("echo: {input_text}"),
                source: crate::generator::SuggestionSource::Live,
            }
        }
    }

    fn live_app(transport: MockTransport) -> Router {
        let generator = SuggestionGenerator::new(
            Mode::Live,
            Arc::new(transport),
            MockPool::with_picker(Arc::new(FixedPicker(0))),
            GenerationConfig::default(),
        );
        create_router(AppState::new(Arc::new(generator)))
    }

    async fn post_analyze(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_live_success_envelope() {
        let mut transport = MockTransport::new();
        transport.expect_generate_content().times(1).returning(|_| {
            Ok(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(Content {
                        role: Some("model".to_string()),
                        parts: vec![Part {
                            text: Some("Go for a run! 🎶".to_string()),
                        }],
                    }),
                    finish_reason: Some("STOP".to_string()),
                }],
                prompt_feedback: None,
            })
        });

        let (status, body) =
            post_analyze(live_app(transport), r#"{"text": "I feel great today!"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "suggestion": "Go for a run! 🎶",
                "color": "#ffcc00",
                "fontColor": "#000000"
            })
        );
    }

    #[tokio::test]
    async fn test_empty_and_missing_text_skip_generator() {
        for payload in [
            r#"{"text": ""}"#,
            r#"{"text": "   \n\t"}"#,
            r#"{}"#,
            r#"{"text": null}"#,
        ] {
            let mut transport = MockTransport::new();
            transport.expect_generate_content().never();

            let (status, body) = post_analyze(live_app(transport), payload).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body,
                serde_json::json!({
                    "suggestion": "Please enter some text.",
                    "color": "#ffffff",
                    "fontColor": "#000000"
                }),
                "payload {payload}"
            );
        }
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_generation() {
        let generator = Arc::new(RecordingGenerator::default());
        let app = create_router(AppState::new(generator.clone()));

        let (_, body) = post_analyze(app, r#"{"text": "  tired but ok  "}"#).await;
        assert_eq!(body["suggestion"], "echo: tired but ok");
        assert_eq!(*generator.inputs.lock().unwrap(), vec!["tired but ok".to_string()]);
    }

    #[tokio::test]
    async fn test_upstream_failures_still_return_ok() {
        let mut transport = MockTransport::new();
        transport.expect_generate_content().times(1).returning(|_| {
            Err(UpstreamError::new(UpstreamErrorKind::Network, "connection reset"))
        });
        let (status, body) = post_analyze(live_app(transport), r#"{"text": "hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestion"], UNAVAILABLE_MESSAGE);
        assert_eq!(body["color"], "#ffcc00");

        let mut transport = MockTransport::new();
        transport.expect_generate_content().times(1).returning(|_| {
            Err(UpstreamError::new(UpstreamErrorKind::QuotaExhausted, "quota"))
        });
        let (status, body) = post_analyze(live_app(transport), r#"{"text": "hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestion"], MOCK_RESPONSES[0]);
    }

    #[tokio::test]
    async fn test_index_serves_landing_page() {
        let app = create_router(AppState::new(Arc::new(RecordingGenerator::default())));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/static/js/mood.js"));
    }

    #[tokio::test]
    async fn test_script_and_health_routes() {
        let app = create_router(AppState::new(Arc::new(RecordingGenerator::default())));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/static/js/mood.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let app = create_router(AppState::new(Arc::new(RecordingGenerator::default())));
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/analyze")
                    .header("origin", "http://example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_request_header() {
        let app = create_router(AppState::new(Arc::new(RecordingGenerator::default())));
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/analyze")
                    .header("origin", "http://example.com")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type,x-requested-with")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
    }
}
