use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, GenerationConfig, Mode};
use crate::error::Result;
use crate::mock_pool::MockPool;
use crate::models::GenerateContentRequest;
use crate::prompt::mood_prompt;
use crate::transport::{GeminiTransport, Transport};

pub const SAFETY_BLOCK_MESSAGE: &str =
    "I couldn't analyze that text due to safety guidelines. Please try expressing it differently.";

pub const UNAVAILABLE_MESSAGE: &str =
    "I'm having trouble connecting to the AI right now. Please try again.";

/// Which path produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Model output, returned as-is
    Live,
    /// Mock mode, no upstream call made
    Mock,
    /// Upstream quota or not-found failure downgraded to the pool
    Fallback,
    /// Upstream safety filter withheld the output
    SafetyBlocked,
    /// Any other upstream failure
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub source: SuggestionSource,
}

impl Suggestion {
    fn new(text: impl Into<String>, source: SuggestionSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a suggestion for already-trimmed, non-empty input. Never fails.
    async fn suggest(&self, input_text: &str) -> Suggestion;

    async fn generate(&self, input_text: &str) -> String {
        self.suggest(input_text).await.text
    }
}

pub struct SuggestionGenerator {
    mode: Mode,
    transport: Arc<dyn Transport>,
    pool: MockPool,
    generation: GenerationConfig,
}

impl SuggestionGenerator {
    pub fn new(
        mode: Mode,
        transport: Arc<dyn Transport>,
        pool: MockPool,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            mode,
            transport,
            pool,
            generation,
        }
    }

    /// Wire the Gemini transport and the built-in pool from configuration
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(GeminiTransport::new(&cfg.gemini)?);
        Ok(Self::new(
            cfg.mode(),
            transport as Arc<dyn Transport>,
            MockPool::new(),
            cfg.generation.clone(),
        ))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[async_trait]
impl Generator for SuggestionGenerator {
    async fn suggest(&self, input_text: &str) -> Suggestion {
        if self.mode == Mode::Mock {
            tracing::debug!("Mock mode, skipping Gemini API");
            return Suggestion::new(self.pool.pick(), SuggestionSource::Mock);
        }

        let request =
            GenerateContentRequest::from_prompt(mood_prompt(input_text), &self.generation);

        match self.transport.generate_content(&request).await {
            Ok(response) => {
                if let Some(reason) = response.block_reason() {
                    tracing::info!(reason, "Gemini safety filter blocked the response");
                    return Suggestion::new(
                        SAFETY_BLOCK_MESSAGE,
                        SuggestionSource::SafetyBlocked,
                    );
                }
                match response.text() {
                    Some(text) => Suggestion::new(text, SuggestionSource::Live),
                    None => {
                        tracing::warn!("Gemini API returned no candidate text");
                        Suggestion::new(UNAVAILABLE_MESSAGE, SuggestionSource::Unavailable)
                    }
                }
            }
            Err(e) if e.kind.is_recoverable() => {
                tracing::warn!(
                    kind = ?e.kind,
                    "Gemini API error, switching to mock response: {}",
                    e.message
                );
                Suggestion::new(self.pool.pick(), SuggestionSource::Fallback)
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind, "Gemini API error: {}", e.message);
                Suggestion::new(UNAVAILABLE_MESSAGE, SuggestionSource::Unavailable)
            }
        }
    }
}
