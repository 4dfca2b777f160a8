pub mod config;
pub mod error;
pub mod generator;
pub mod mock_pool;
pub mod models;
pub mod prompt;
pub mod server;
pub mod transport;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generator::{Generator, SuggestionGenerator};
use crate::server::AppState;

/// Build the shared application state from configuration
pub fn build_state(cfg: &Config) -> Result<AppState> {
    let generator = SuggestionGenerator::from_config(cfg)?;
    Ok(AppState::new(Arc::new(generator) as Arc<dyn Generator>))
}
