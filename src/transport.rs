use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

#[cfg(test)]
use mockall::automock;

use crate::config::GeminiConfig;
use crate::error::{Result, UpstreamError, UpstreamErrorKind};
use crate::models::{GeminiErrorBody, GenerateContentRequest, GenerateContentResponse};

/// Seam between the generator and the generative-language API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> std::result::Result<GenerateContentResponse, UpstreamError>;
}

pub struct GeminiTransport {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiTransport {
    pub fn new(cfg: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: cfg.api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                cfg.base_url.trim_end_matches('/'),
                cfg.model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Turn a non-success status and its body into a classified error
fn classify_failure(status: u16, body: &str) -> UpstreamError {
    let parsed = serde_json::from_str::<GeminiErrorBody>(body).ok();
    let message = match &parsed {
        Some(b) => format!(
            "{} {}: {}",
            b.error.code.unwrap_or(status),
            b.error.status.as_deref().unwrap_or("UNKNOWN"),
            b.error.message
        ),
        None => format!("{status}: {body}"),
    };

    let kind = UpstreamErrorKind::from_status(status)
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|b| b.error.status.as_deref())
                .and_then(UpstreamErrorKind::from_api_status)
        })
        .unwrap_or_else(|| UpstreamErrorKind::from_message(&message));

    UpstreamError::new(kind, message)
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> std::result::Result<GenerateContentResponse, UpstreamError> {
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await
            .map_err(|e| {
                UpstreamError::new(
                    UpstreamErrorKind::Network,
                    format!("Failed to send request to Gemini API: {e}"),
                )
            })?;

        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Gemini API responded"
        );

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_failure(status.as_u16(), &body));
        }

        response.json().await.map_err(|e| {
            UpstreamError::malformed(format!("Failed to parse Gemini API response: {e}"))
        })
    }
}
