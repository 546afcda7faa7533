//! The session controller: lock-guarded operations over the single
//! shared session.
//!
//! Every operation takes the session lock for its whole synchronous body
//! and never holds it across an await. Generation jobs are enqueued while
//! the lock is held, so the in-flight accounting is atomic with the
//! transition that produced the job.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::mpsc;

use trailtale_core::clock::Clock;
use trailtale_core::error::GameError;
use trailtale_core::rng::DeterministicRng;

use crate::domain::plan::{HuntConfig, HuntPlan};
use crate::domain::session::{ConfirmOutcome, GenerationJob, Session, StatusSnapshot};

/// Caller-facing result of a checkpoint confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The session advanced; `completed` is true when the hunt finished.
    Advanced {
        /// True when this was the final checkpoint.
        completed: bool,
    },
    /// A future code was scanned; nothing changed.
    WrongStep {
        /// The scanned id.
        scanned: u32,
        /// The id currently awaited.
        expected: u32,
    },
    /// Idempotent no-op (re-scan, scan during input, or unparseable code).
    Joined,
}

/// Drives the session state machine. One instance per process, shared by
/// all request handlers and the generation worker.
pub struct SessionController {
    session: Arc<RwLock<Session>>,
    plan: Arc<HuntPlan>,
    participants: Vec<String>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    jobs: mpsc::Sender<GenerationJob>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("participants", &self.participants)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Validates the configuration and initializes the first session at
    /// epoch 1.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationMismatch` (strict mode) or `InvalidPlan` when
    /// the configuration is unusable. This is the startup fail-fast path.
    pub fn new(
        config: HuntConfig,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        jobs: mpsc::Sender<GenerationJob>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let plan = Arc::new(config.plan.clone());
        let session = {
            let mut rng_guard = rng.lock().unwrap_or_else(PoisonError::into_inner);
            Session::new(Arc::clone(&plan), &config.participants, &mut *rng_guard, 1)
        };
        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            plan,
            participants: config.participants,
            clock,
            rng,
            jobs,
        })
    }

    /// Shared handle to the session, for the generation worker.
    #[must_use]
    pub fn session(&self) -> Arc<RwLock<Session>> {
        Arc::clone(&self.session)
    }

    /// Overwrites the value of one slot on the current checkpoint.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside INPUT, `InvalidIndex` out of bounds.
    pub fn update_slot_value(&self, index: usize, value: &str) -> Result<(), GameError> {
        self.write_session().update_slot(index, value)
    }

    /// Commits the current checkpoint's slots and moves to HINT.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside INPUT, `IncompleteInputs` with blank slots.
    pub fn approve_step(&self) -> Result<(), GameError> {
        self.write_session().commit_checkpoint(self.clock.as_ref())
    }

    /// Handles a scanned checkpoint code. Unparseable ids are treated as a
    /// no-op join, matching the physical-code redirect behavior.
    pub fn confirm_checkpoint(&self, raw_id: &str) -> Confirmation {
        let Ok(scanned) = raw_id.trim().parse::<u32>() else {
            return Confirmation::Joined;
        };
        let mut session = self.write_session();
        match session.confirm_checkpoint(scanned) {
            ConfirmOutcome::Advanced { job, completed } => {
                self.enqueue(job, &mut session);
                Confirmation::Advanced { completed }
            }
            ConfirmOutcome::WrongStep { scanned, expected } => {
                Confirmation::WrongStep { scanned, expected }
            }
            ConfirmOutcome::Joined => Confirmation::Joined,
        }
    }

    /// Read-only status snapshot, safe while generation is in flight.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Replaces the session wholesale with a fresh one at the next epoch.
    /// In-flight generation is not cancelled; its result will be discarded
    /// by the epoch check.
    pub fn reset(&self) {
        let mut session = self.write_session();
        let next_epoch = session.epoch() + 1;
        let mut rng_guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        *session = Session::new(
            Arc::clone(&self.plan),
            &self.participants,
            &mut *rng_guard,
            next_epoch,
        );
    }

    /// Debug/test operation: jumps the session to COMPLETED and enqueues a
    /// final generation job over the full word history.
    pub fn force_complete(&self) {
        let mut session = self.write_session();
        let job = session.force_complete(self.clock.as_ref());
        self.enqueue(job, &mut session);
    }

    /// Enqueues a generation job while the session lock is held. A full
    /// queue drops the job and rolls back the in-flight accounting so the
    /// status flag cannot stick.
    fn enqueue(&self, job: GenerationJob, session: &mut Session) {
        let epoch = job.epoch;
        if let Err(err) = self.jobs.try_send(job) {
            tracing::error!(%err, "generation queue full, dropping job");
            session.abort_generation(epoch);
        }
    }

    fn write_session(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}
