use std::sync::Arc;
use std::time::Duration;

pub mod cache;
pub mod commands;
pub mod config;
pub mod generation;
pub mod pages;
pub mod runlog;
pub mod server;
pub mod session;
pub mod words;

use config::Config;
use generation::{GenerationError, JobRegistry, OpenAiClient, TextGenerator};
use runlog::RunLog;
use session::SessionStore;
use words::WordStore;

pub struct AppState {
    pub word_store: WordStore,
    pub run_log: RunLog,
    pub sessions: SessionStore,
    pub jobs: JobRegistry,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: &Config, generator: Arc<dyn TextGenerator>) -> Self {
        let ttl = Duration::from_secs(config.sessions.ttl_secs);
        let capacity = config.sessions.max_entries;

        Self {
            word_store: WordStore::new(config.word_list.clone()),
            run_log: RunLog::new(config.run_log.clone()),
            sessions: SessionStore::new(ttl, capacity),
            jobs: JobRegistry::new(ttl, capacity),
            generator,
        }
    }

    /// State backed by the configured OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        if config.llm.api_key.is_none() {
            log::warn!("No language model API key configured; stories will be unavailable");
        }
        let client = OpenAiClient::new(&config.llm)?;
        Ok(Self::new(config, Arc::new(client)))
    }
}
