//! The generation worker: single consumer of epoch-tagged jobs.
//!
//! One worker per process. Because jobs are processed one at a time, in
//! queue order, narrative segments append in checkpoint-confirmation
//! order no matter how long each external call takes. The session lock
//! is held only to snapshot inputs and to append the result, never
//! across the external call.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;

use trailtale_core::clock::Clock;
use trailtale_core::storyteller::{StoryRequest, Storyteller, WordContribution};
use trailtale_session::domain::session::{CommittedWord, GenerationJob, Session};

use crate::fallback::fallback_segment;

/// Capacity of the generation job queue. Outstanding jobs are bounded by
/// the plan length, so the queue can only fill across pathological
/// reset storms; the controller drops and rolls back in that case.
pub const QUEUE_CAPACITY: usize = 64;

/// Creates the job channel shared by the controller and the worker.
#[must_use]
pub fn generation_channel() -> (mpsc::Sender<GenerationJob>, mpsc::Receiver<GenerationJob>) {
    mpsc::channel(QUEUE_CAPACITY)
}

/// Consumes generation jobs until the channel closes.
pub struct GenerationWorker {
    session: Arc<RwLock<Session>>,
    storyteller: Arc<dyn Storyteller>,
    clock: Arc<dyn Clock>,
    jobs: mpsc::Receiver<GenerationJob>,
}

impl GenerationWorker {
    /// Wires the worker to the shared session and the job queue.
    #[must_use]
    pub fn new(
        session: Arc<RwLock<Session>>,
        storyteller: Arc<dyn Storyteller>,
        clock: Arc<dyn Clock>,
        jobs: mpsc::Receiver<GenerationJob>,
    ) -> Self {
        Self {
            session,
            storyteller,
            clock,
            jobs,
        }
    }

    /// Runs the worker loop. Spawn this on the runtime at startup.
    pub async fn run(mut self) {
        while let Some(job) = self.jobs.recv().await {
            self.process(job).await;
        }
        tracing::debug!("generation queue closed, worker exiting");
    }

    /// One generation cycle: snapshot under the lock, call the service
    /// without it, then append the segment and clear the in-flight
    /// accounting as the final mutation. Stale jobs are discarded both
    /// before the call and again at append time.
    async fn process(&self, job: GenerationJob) {
        let story_so_far = {
            let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
            if session.epoch() != job.epoch {
                tracing::debug!(job_epoch = job.epoch, "discarding stale generation job");
                return;
            }
            session.story_so_far()
        };

        let words: Vec<WordContribution> =
            job.words.iter().map(CommittedWord::to_contribution).collect();
        let request = StoryRequest {
            story_so_far,
            words,
            guidance: job.guidance.clone(),
            is_final: job.is_final,
        };

        let text = match self.storyteller.continue_story(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("storyteller returned empty text, composing fallback");
                fallback_segment(&request.words, job.is_final)
            }
            Err(err) => {
                tracing::warn!(%err, "storyteller failed, composing fallback");
                fallback_segment(&request.words, job.is_final)
            }
        };

        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        if session.complete_generation(job.epoch, text, self.clock.as_ref()) {
            tracing::info!(is_final = job.is_final, "narrative segment appended");
        } else {
            tracing::debug!(job_epoch = job.epoch, "discarding stale generation result");
        }
    }
}
