//! Background story generation
//!
//! Starting a review kicks off one story job per session. The job runs on
//! the tokio runtime while the reviewer works through flashcards and is
//! polled for its result. Jobs cannot be cancelled; results expire with the
//! registry's TTL.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use super::prompts::{parse_sentences, sentence_messages, story_messages};
use super::{ChatMessage, TextGenerator};
use crate::cache::ExpiringMap;

/// Identifies a story job; one per review session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct JobHandle(pub Uuid);

/// What to generate for a batch
#[derive(Debug, Clone)]
pub struct StoryRequest {
    pub words: Vec<String>,
    /// Sampling temperature for the story, 0.0 to 1.0
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResult {
    pub story: String,
    /// Example sentence per word, where the model supplied one
    pub sentences: BTreeMap<String, String>,
    /// Story prompt, kept so a translation can continue the conversation
    #[serde(skip)]
    pub conversation: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
pub enum JobStatus {
    Pending,
    Done(StoryResult),
    Failed(String),
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Holds the status of every running or finished story job
#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<Mutex<ExpiringMap<JobHandle, JobStatus>>>,
}

impl JobRegistry {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(ExpiringMap::new(ttl, capacity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExpiringMap<JobHandle, JobStatus>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start generating a story in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        handle: JobHandle,
        generator: Arc<dyn TextGenerator>,
        request: StoryRequest,
    ) -> JobHandle {
        self.lock().insert(handle, JobStatus::Pending);
        log::info!("Story job {} started for {} words", handle.0, request.words.len());

        let registry = self.clone();
        tokio::spawn(async move {
            let status = run_story_job(generator.as_ref(), request).await;
            registry.complete(handle, status);
        });

        handle
    }

    /// Current status, or `None` for unknown or expired jobs
    pub fn poll(&self, handle: JobHandle) -> Option<JobStatus> {
        self.lock().get(&handle).cloned()
    }

    /// Forget a job, e.g. when its review session ends
    pub fn remove(&self, handle: JobHandle) {
        self.lock().remove(&handle);
    }

    fn complete(&self, handle: JobHandle, status: JobStatus) {
        let mut jobs = self.lock();
        match jobs.get_mut(&handle) {
            Some(slot) => {
                log::info!("Story job {} finished: {}", handle.0, status.label());
                *slot = status;
            }
            None => log::debug!("Story job {} finished after it was dropped", handle.0),
        }
    }
}

async fn run_story_job(generator: &dyn TextGenerator, request: StoryRequest) -> JobStatus {
    let mut options = generator.default_options();
    options.temperature = request.temperature.clamp(0.0, 1.0);

    let conversation = story_messages(&request.words);
    let story = match generator.generate(&conversation, &options).await {
        Ok(story) => story,
        Err(e) => {
            log::error!("Story generation failed: {}", e);
            return JobStatus::Failed(e.to_string());
        }
    };

    // A story without sentences is still useful
    let sentences = match generator
        .generate(&sentence_messages(&request.words), &generator.default_options())
        .await
    {
        Ok(reply) => parse_sentences(&reply, &request.words),
        Err(e) => {
            log::warn!("Example sentence generation failed: {}", e);
            BTreeMap::new()
        }
    };

    JobStatus::Done(StoryResult {
        story,
        sentences,
        conversation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::{FailingGenerator, ScriptedGenerator};

    async fn wait_for(registry: &JobRegistry, handle: JobHandle) -> JobStatus {
        for _ in 0..200 {
            match registry.poll(handle) {
                Some(status) if !status.is_pending() => return status,
                Some(_) => tokio::time::sleep(Duration::from_millis(5)).await,
                None => panic!("job disappeared"),
            }
        }
        panic!("job did not finish");
    }

    fn request() -> StoryRequest {
        StoryRequest {
            words: vec!["Apfel".to_string(), "Brot".to_string()],
            temperature: 0.2,
        }
    }

    #[tokio::test]
    async fn test_job_completes_with_story_and_sentences() {
        let registry = JobRegistry::new(Duration::from_secs(60), 8);
        let generator = Arc::new(ScriptedGenerator::new(&[
            "Ich esse Brot mit Apfel.",
            "Apfel: Der Apfel ist rot.\nBrot: Das Brot ist frisch.",
        ]));
        let handle = JobHandle(Uuid::new_v4());

        registry.submit(handle, generator.clone(), request());
        match wait_for(&registry, handle).await {
            JobStatus::Done(result) => {
                assert_eq!(result.story, "Ich esse Brot mit Apfel.");
                assert_eq!(result.sentences.len(), 2);
                assert_eq!(result.conversation.len(), 2);
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_job_failure_is_reported() {
        let registry = JobRegistry::new(Duration::from_secs(60), 8);
        let handle = JobHandle(Uuid::new_v4());

        registry.submit(handle, Arc::new(FailingGenerator), request());
        match wait_for(&registry, handle).await {
            JobStatus::Failed(message) => assert!(message.contains("upstream exploded")),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_and_removed_jobs() {
        let registry = JobRegistry::new(Duration::from_secs(60), 8);
        assert!(registry.poll(JobHandle(Uuid::new_v4())).is_none());

        let handle = JobHandle(Uuid::new_v4());
        registry.submit(handle, Arc::new(ScriptedGenerator::new(&["x"])), request());
        registry.remove(handle);
        assert!(registry.poll(handle).is_none());
    }
}
