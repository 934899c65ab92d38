//! Review flow: start a batch, show flashcards, record answers

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use crate::generation::{JobHandle, JobStatus, StoryRequest};
use crate::pages::{self, CardView};
use crate::session::{ReviewSession, SessionError, Step};
use crate::words::{selector, FrequencyCode};
use crate::AppState;

use super::{require_session, session_cookie, session_id, CommandError, CommandResult};

/// Landing page with list statistics
pub async fn index(State(state): State<Arc<AppState>>) -> CommandResult<Html<String>> {
    let today = Local::now().date_naive();
    let counts = if state.word_store.exists() {
        selector::count_buckets(&state.word_store.load()?, today)
    } else {
        log::warn!("Word list {:?} does not exist", state.word_store.path());
        Default::default()
    };
    let last_run = state.run_log.last_run().unwrap_or_else(|e| {
        log::warn!("Could not read run log: {}", e);
        None
    });

    Ok(Html(pages::index_page(&counts, last_run)))
}

/// Select a batch, start the story job and show the story page
pub async fn start_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> CommandResult<Response> {
    let now = Local::now().naive_local();
    let today = now.date();

    let records = state.word_store.load()?;
    let selection = selector::select(&records, today, &mut rand::thread_rng());

    if let Err(e) = state.run_log.append(now) {
        log::warn!("Could not record review start: {}", e);
    }

    let id = session_id(&headers).unwrap_or_else(Uuid::new_v4);
    if let Ok(Some(previous)) = state.sessions.with_session(id, |s| s.story_job()) {
        state.jobs.remove(previous);
    }

    let words = selection.batch.words();
    let burned_ratio = selection.counts.burned_ratio();
    let mut session = ReviewSession::new(selection.batch);

    if !words.is_empty() {
        let job = state.jobs.submit(
            JobHandle(Uuid::new_v4()),
            Arc::clone(&state.generator),
            StoryRequest {
                words: words.clone(),
                temperature: burned_ratio,
            },
        );
        session = session.with_story_job(job);
    }
    state.sessions.start(id, session);

    let page = pages::story_page(&words, burned_ratio * 100.0);
    Ok(([(header::SET_COOKIE, session_cookie(id))], Html(page)).into_response())
}

/// Flashcard for the current word
pub async fn show_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> CommandResult<Html<String>> {
    let id = require_session(&headers)?;
    render_current(&state, id)
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub choice: String,
}

/// Record the answer for the current word; save once the batch is done
pub async fn answer_card(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AnswerForm>,
) -> CommandResult<Html<String>> {
    let id = require_session(&headers)?;
    let choice: FrequencyCode = form
        .choice
        .parse()
        .map_err(|e| CommandError::new(StatusCode::BAD_REQUEST, format!("{}", e)))?;

    let today = Local::now().date_naive();

    match state.sessions.with_session(id, |s| s.answer(choice, today))?? {
        Step::Next => render_current(&state, id),
        Step::Complete(updates) => {
            let session = state.sessions.finish(id).ok_or(SessionError::Missing)?;
            if let Some(job) = session.story_job() {
                state.jobs.remove(job);
            }
            state.word_store.save(&updates)?;
            Ok(Html(pages::complete_page(session.entries())))
        }
    }
}

fn render_current(state: &AppState, id: Uuid) -> CommandResult<Html<String>> {
    let (card, job) = state.sessions.with_session(id, |s| {
        let card = s.current().map(|entry| CardView {
            number: s.position() + 1,
            total: s.len(),
            word: entry.word.clone(),
            choices: s.choices().unwrap_or([FrequencyCode::Tomorrow; 2]),
            sentence: None,
        });
        (card, s.story_job())
    })?;

    let Some(mut card) = card else {
        // Nothing left to review in this session
        let session = state.sessions.finish(id).ok_or(SessionError::Missing)?;
        return Ok(Html(pages::complete_page(session.entries())));
    };

    if let Some(JobStatus::Done(result)) = job.and_then(|job| state.jobs.poll(job)) {
        card.sentence = result.sentences.get(&card.word).cloned();
    }

    Ok(Html(pages::card_page(&card)))
}
