use std::sync::Arc;

use anyhow::{Context, Result};

use wortschatz_lib::server;
use wortschatz_lib::AppState;

use crate::app::App;

pub fn run(app: &App, bind: Option<&str>) -> Result<()> {
    let bind = bind.unwrap_or(&app.config.bind);
    if !app.word_store.exists() {
        log::warn!(
            "Word list {:?} does not exist yet; run `wortschatz rebuild` to create it",
            app.word_store.path()
        );
    }

    let state = AppState::from_config(&app.config)
        .context("Failed to create language model client")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(server::serve(Arc::new(state), bind))
        .with_context(|| format!("Review server on {} failed", bind))
}
