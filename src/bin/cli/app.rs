use std::path::Path;

use anyhow::{Context, Result};

use wortschatz_lib::config::Config;
use wortschatz_lib::runlog::RunLog;
use wortschatz_lib::words::{WordRecord, WordStore};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub word_store: WordStore,
    pub run_log: RunLog,
}

impl App {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load configuration")?;
        let word_store = WordStore::new(config.word_list.clone());
        let run_log = RunLog::new(config.run_log.clone());

        Ok(Self {
            config,
            word_store,
            run_log,
        })
    }

    /// Every word in the list, in file order
    pub fn load_words(&self) -> Result<Vec<WordRecord>> {
        self.word_store
            .load()
            .with_context(|| format!("Failed to read word list {:?}", self.word_store.path()))
    }
}
