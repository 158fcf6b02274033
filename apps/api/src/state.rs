use std::sync::Arc;

use crate::config::Config;
use crate::interview::generator::Generator;
use crate::interview::store::SessionStore;
use crate::llm_client::LanguageModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless question/evaluation generator over the configured model.
    pub generator: Generator,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(llm: Arc<dyn LanguageModel>, config: Config) -> Self {
        Self {
            generator: Generator::new(llm),
            sessions: SessionStore::new(),
            config,
        }
    }
}
