//! Story status polling and on-demand translations
//!
//! These endpoints return fragments for page scripts, so failures come back
//! as plain text or JSON rather than full pages.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::generation::prompts::{translation_messages, word_translation_messages};
use crate::generation::{generate_or_placeholder, JobStatus, GENERATION_PLACEHOLDER};
use crate::session::SessionError;
use crate::AppState;

use super::{require_session, CommandError};

/// Status of the session's story job
pub async fn story_status(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let job = require_session(&headers)
        .and_then(|id| state.sessions.with_session(id, |s| s.story_job()));

    let job = match job {
        Ok(job) => job,
        Err(e) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "status": "failed", "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let body = match job.and_then(|job| state.jobs.poll(job)) {
        Some(JobStatus::Pending) => json!({ "status": "pending" }),
        Some(JobStatus::Done(result)) => json!({
            "status": "done",
            "story": result.story,
            "sentences": result.sentences,
        }),
        Some(JobStatus::Failed(error)) => {
            log::warn!("Reporting failed story job: {}", error);
            json!({ "status": "failed", "error": GENERATION_PLACEHOLDER })
        }
        None => json!({ "status": "failed", "error": GENERATION_PLACEHOLDER }),
    };

    Json(body).into_response()
}

/// English translation of the finished story
pub async fn translate_story(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let job = match require_session(&headers)
        .and_then(|id| state.sessions.with_session(id, |s| s.story_job()))
    {
        Ok(job) => job,
        Err(e) => return CommandError::from(e).into_text_response(),
    };

    let result = match job.and_then(|job| state.jobs.poll(job)) {
        Some(JobStatus::Done(result)) => result,
        Some(JobStatus::Pending) => {
            return (StatusCode::ACCEPTED, "The story is not ready yet.").into_response()
        }
        _ => return GENERATION_PLACEHOLDER.into_response(),
    };

    let messages = translation_messages(result.conversation, &result.story);
    let options = state.generator.default_options();
    generate_or_placeholder(state.generator.as_ref(), &messages, &options)
        .await
        .into_response()
}

/// One-word English translation of the current flashcard
pub async fn translate_word(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let word = require_session(&headers).and_then(|id| {
        state
            .sessions
            .with_session(id, |s| s.current().map(|e| e.word.clone()))?
            .ok_or(SessionError::AlreadyComplete)
    });

    let word = match word {
        Ok(word) => word,
        Err(e) => return CommandError::from(e).into_text_response(),
    };

    let messages = word_translation_messages(&word);
    let options = state.generator.default_options();
    generate_or_placeholder(state.generator.as_ref(), &messages, &options)
        .await
        .into_response()
}
