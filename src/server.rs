//! Embedded HTTP server for the review pages
//!
//! Serves the landing page, the story page and the flashcards on a local
//! address. All state lives in `AppState`; handlers are in `commands`.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::commands;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(commands::index))
        .route("/story", post(commands::start_review))
        .route("/story/status", get(commands::story_status))
        .route("/story/translate", post(commands::translate_story))
        .route("/anki", post(commands::show_card))
        .route("/anki/translate", post(commands::translate_word))
        .route("/anki/answer", post(commands::answer_card))
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(state: Arc<AppState>, bind: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    log::info!("Review server started on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Could not listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            log::info!("Review server shutting down");
        })
        .await
}
