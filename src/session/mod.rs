//! Review sessions
//!
//! A session owns the batch selected when the reviewer pressed "start" and a
//! cursor into it. Answers update entries in place; nothing reaches the word
//! list until the last word is answered and the coordinator saves
//! `Step::Complete`'s updates.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::ExpiringMap;
use crate::generation::JobHandle;
use crate::words::{
    apply_choice, next_choices, FrequencyCode, ReviewBatch, ReviewError, RowUpdate, SelectionEntry,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No active review session, start a new session")]
    Missing,

    #[error("This review session is already complete, start a new session")]
    AlreadyComplete,

    #[error(transparent)]
    Review(#[from] ReviewError),
}

/// Outcome of answering one flashcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// More words remain
    Next,
    /// The batch is exhausted; these rows must be saved
    Complete(BTreeMap<usize, RowUpdate>),
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    entries: Vec<SelectionEntry>,
    position: usize,
    story_job: Option<JobHandle>,
}

impl ReviewSession {
    pub fn new(batch: ReviewBatch) -> Self {
        Self {
            entries: batch.into_entries(),
            position: 0,
            story_job: None,
        }
    }

    pub fn with_story_job(mut self, job: JobHandle) -> Self {
        self.story_job = Some(job);
        self
    }

    pub fn story_job(&self) -> Option<JobHandle> {
        self.story_job
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    /// Index of the word being reviewed
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.entries.len()
    }

    pub fn current(&self) -> Option<&SelectionEntry> {
        self.entries.get(self.position)
    }

    /// The two choices offered for the current word
    pub fn choices(&self) -> Option<[FrequencyCode; 2]> {
        self.current().map(|e| next_choices(e.frequency))
    }

    /// Record the reviewer's choice for the current word and move on
    ///
    /// The next review date counts from `today`, the day of the answer.
    pub fn answer(
        &mut self,
        choice: FrequencyCode,
        today: NaiveDate,
    ) -> Result<Step, SessionError> {
        let entry = self
            .entries
            .get_mut(self.position)
            .ok_or(SessionError::AlreadyComplete)?;

        let outcome = apply_choice(entry.frequency, choice, today)?;
        log::debug!(
            "{}: {} -> {} (next review {})",
            entry.word,
            entry.frequency.code(),
            outcome.frequency.code(),
            outcome.next_review
        );
        entry.frequency = outcome.frequency;
        entry.review_date = Some(outcome.next_review);
        self.position += 1;

        if self.is_complete() {
            Ok(Step::Complete(self.updates()))
        } else {
            Ok(Step::Next)
        }
    }

    /// Current frequency and date of every entry, keyed by row
    pub fn updates(&self) -> BTreeMap<usize, RowUpdate> {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.row,
                    RowUpdate {
                        frequency: e.frequency,
                        next_review: e.review_date,
                    },
                )
            })
            .collect()
    }
}

/// Active review sessions keyed by session id
pub struct SessionStore {
    sessions: Mutex<ExpiringMap<Uuid, ReviewSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(ExpiringMap::new(ttl, capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExpiringMap<Uuid, ReviewSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Begin a session, replacing any unfinished one with the same id
    pub fn start(&self, id: Uuid, session: ReviewSession) {
        log::info!("Review session {} started with {} words", id, session.len());
        if self.lock().insert(id, session).is_some() {
            log::info!("Review session {} replaced an unfinished batch", id);
        }
    }

    /// Run `f` against the session, failing when none is active
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ReviewSession) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id).ok_or(SessionError::Missing)?;
        Ok(f(session))
    }

    pub fn finish(&self, id: Uuid) -> Option<ReviewSession> {
        let session = self.lock().remove(&id);
        if session.is_some() {
            log::info!("Review session {} finished", id);
        }
        session
    }
}
