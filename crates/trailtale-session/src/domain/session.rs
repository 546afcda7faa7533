//! The hunt session aggregate: phase machine, slots, committed words,
//! and narrative segments.
//!
//! A session is created once per game and replaced wholesale on reset.
//! Every mutation happens under the controller's lock; the aggregate
//! itself is plain single-threaded state. Generation results arrive
//! later, tagged with the epoch they were launched against, and are
//! discarded when the epoch no longer matches.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use trailtale_core::clock::Clock;
use trailtale_core::error::GameError;
use trailtale_core::rng::DeterministicRng;
use trailtale_core::storyteller::WordContribution;

use super::plan::{HuntPlan, PLACEHOLDER_PARTICIPANT, shuffled_roster};

/// Session-wide mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Collecting slot values for the current checkpoint.
    Input,
    /// Words committed; the group is out hunting for the physical code.
    Hint,
    /// All checkpoints confirmed.
    Completed,
}

impl Phase {
    /// Stable name used in errors and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Hint => "HINT",
            Self::Completed => "COMPLETED",
        }
    }
}

/// One word input on the current checkpoint, owned by a participant.
#[derive(Debug, Clone)]
pub struct Slot {
    /// The participant this slot is assigned to.
    pub participant: String,
    /// Display label from the plan.
    pub label: String,
    /// Semantic word kind from the plan.
    pub kind: String,
    /// Current value; empty until the participant submits something.
    pub value: String,
}

impl Slot {
    /// True once the slot holds a non-blank value.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// Immutable record of one committed word.
#[derive(Debug, Clone, Serialize)]
pub struct CommittedWord {
    /// The contributing participant.
    pub participant: String,
    /// Semantic word kind.
    pub kind: String,
    /// Display label of the slot.
    pub label: String,
    /// The committed value.
    pub value: String,
    /// When the word was committed.
    pub committed_at: DateTime<Utc>,
}

impl CommittedWord {
    /// Projects this word into the storyteller contract type.
    #[must_use]
    pub fn to_contribution(&self) -> WordContribution {
        WordContribution {
            participant: self.participant.clone(),
            kind: self.kind.clone(),
            label: self.label.clone(),
            value: self.value.clone(),
        }
    }
}

/// One atomically appended block of narrative text.
#[derive(Debug, Clone)]
pub struct NarrativeSegment {
    /// The segment text.
    pub text: String,
    /// When the segment was appended.
    pub appended_at: DateTime<Utc>,
}

/// Epoch-tagged unit of generation work, produced when a checkpoint is
/// confirmed and consumed by the single generation worker.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Epoch of the session this job was launched against.
    pub epoch: u64,
    /// Words committed for the checkpoint that just completed.
    pub words: Vec<CommittedWord>,
    /// Folded guidance tag for the checkpoint, if any.
    pub guidance: Option<String>,
    /// True when this job produces the closing segment.
    pub is_final: bool,
}

/// Result of a checkpoint confirmation (physical code scan).
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// A future code was scanned; nothing changed.
    WrongStep {
        /// The scanned id.
        scanned: u32,
        /// The id the session is currently waiting for.
        expected: u32,
    },
    /// Re-scan of a past code, scan while still collecting input, or an
    /// unparseable code; nothing changed.
    Joined,
    /// The awaited code was scanned in HINT phase; the session advanced
    /// and a generation job must be enqueued.
    Advanced {
        /// The work item for the generation worker.
        job: GenerationJob,
        /// True when the hunt is now complete.
        completed: bool,
    },
}

/// Read-only view of one current slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    /// Position within the current checkpoint.
    pub index: usize,
    /// Owning participant.
    pub participant: String,
    /// Display label.
    pub label: String,
    /// Semantic word kind.
    pub kind: String,
    /// Current value.
    pub value: String,
    /// True once non-blank.
    pub filled: bool,
}

/// Point-in-time snapshot of the session, safe to serialize while
/// generation is in flight.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Session epoch (bumped on every reset).
    pub epoch: u64,
    /// 1-based number of the checkpoint in play (clamped to the total
    /// once the hunt completes).
    pub step_number: usize,
    /// Total checkpoints in the plan.
    pub total_steps: usize,
    /// Hint for the current checkpoint; absent once completed.
    pub hint: Option<String>,
    /// Current slots; empty once completed.
    pub slots: Vec<SlotView>,
    /// All narrative segments joined in append order.
    pub narrative: String,
    /// The most recently appended segment.
    pub latest_segment: Option<String>,
    /// True while a generation job is queued or running for this epoch.
    pub generation_in_flight: bool,
    /// Full committed-word history; present only once completed.
    pub results: Option<Vec<CommittedWord>>,
}

/// The aggregate root for one hunt session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    epoch: u64,
    phase: Phase,
    checkpoint_index: usize,
    plan: Arc<HuntPlan>,
    roster: Vec<String>,
    slot_cursor: usize,
    slots: Vec<Slot>,
    history: Vec<CommittedWord>,
    segments: Vec<NarrativeSegment>,
    pending_generations: u32,
}

impl Session {
    /// Creates a fresh session at the given epoch: phase INPUT, checkpoint
    /// 0, roster shuffled, slots for the first checkpoint assigned by
    /// consuming the shuffled roster in slot order.
    ///
    /// The plan/roster invariant is validated at configuration time, not
    /// here; in lenient mode slots beyond the roster are assigned to
    /// [`PLACEHOLDER_PARTICIPANT`].
    #[must_use]
    pub fn new(
        plan: Arc<HuntPlan>,
        participants: &[String],
        rng: &mut dyn DeterministicRng,
        epoch: u64,
    ) -> Self {
        let roster = shuffled_roster(participants, rng);
        let mut session = Self {
            id: Uuid::new_v4(),
            epoch,
            phase: Phase::Input,
            checkpoint_index: 0,
            plan,
            roster,
            slot_cursor: 0,
            slots: Vec::new(),
            history: Vec::new(),
            segments: Vec::new(),
            pending_generations: 0,
        };
        session.slots = session.take_slots(0);
        tracing::info!(session_id = %session.id, epoch, "session initialized");
        session
    }

    /// Builds the runtime slots for a checkpoint, consuming roster names
    /// from the global running cursor.
    fn take_slots(&mut self, checkpoint_index: usize) -> Vec<Slot> {
        let plan = Arc::clone(&self.plan);
        plan.checkpoints[checkpoint_index]
            .slots
            .iter()
            .map(|spec| {
                let participant = self
                    .roster
                    .get(self.slot_cursor)
                    .cloned()
                    .unwrap_or_else(|| PLACEHOLDER_PARTICIPANT.to_owned());
                self.slot_cursor += 1;
                Slot {
                    participant,
                    label: spec.label.clone(),
                    kind: spec.kind.clone(),
                    value: String::new(),
                }
            })
            .collect()
    }

    /// The session epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// All narrative segments joined in append order.
    #[must_use]
    pub fn story_so_far(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Overwrites the value of one current slot. Last write wins.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside INPUT, `InvalidIndex` outside the current
    /// slot bounds. No mutation on error.
    pub fn update_slot(&mut self, index: usize, value: &str) -> Result<(), GameError> {
        if self.phase != Phase::Input {
            return Err(GameError::InvalidPhase {
                operation: "update_input",
                phase: self.phase.as_str(),
            });
        }
        let len = self.slots.len();
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(GameError::InvalidIndex { index, len });
        };
        slot.value = value.to_owned();
        Ok(())
    }

    /// Commits the current checkpoint's slots: appends one word per slot
    /// to the history (in slot order) and transitions INPUT -> HINT.
    /// Does not advance the checkpoint and does not trigger generation.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` outside INPUT, `IncompleteInputs` when any slot is
    /// blank. No mutation on error.
    pub fn commit_checkpoint(&mut self, clock: &dyn Clock) -> Result<(), GameError> {
        if self.phase != Phase::Input {
            return Err(GameError::InvalidPhase {
                operation: "approve_step",
                phase: self.phase.as_str(),
            });
        }
        let missing = self.slots.iter().filter(|slot| !slot.is_filled()).count();
        if missing > 0 {
            return Err(GameError::IncompleteInputs { missing });
        }
        let committed_at = clock.now();
        for slot in &self.slots {
            self.history.push(CommittedWord {
                participant: slot.participant.clone(),
                kind: slot.kind.clone(),
                label: slot.label.clone(),
                value: slot.value.clone(),
                committed_at,
            });
        }
        self.phase = Phase::Hint;
        Ok(())
    }

    /// Handles a physical code scan.
    ///
    /// A future id is reported as `WrongStep` without mutation. Anything
    /// other than the awaited id in HINT phase is an idempotent `Joined`
    /// no-op. The exact match extracts the just-committed words, advances
    /// the checkpoint, repopulates slots (or completes the hunt), and
    /// hands back an epoch-tagged generation job. The caller must enqueue
    /// the job while still holding the session lock.
    pub fn confirm_checkpoint(&mut self, scanned: u32) -> ConfirmOutcome {
        let expected = u32::try_from(self.checkpoint_index + 1).unwrap_or(u32::MAX);
        if scanned > expected {
            return ConfirmOutcome::WrongStep { scanned, expected };
        }
        if self.phase != Phase::Hint || scanned != expected {
            return ConfirmOutcome::Joined;
        }

        let checkpoint = &self.plan.checkpoints[self.checkpoint_index];
        let slot_count = checkpoint.slots.len();
        let guidance = checkpoint.guidance();
        let words = self.history[self.history.len() - slot_count..].to_vec();

        self.checkpoint_index += 1;
        let completed = self.checkpoint_index >= self.plan.len();
        if completed {
            self.phase = Phase::Completed;
            self.slots = Vec::new();
        } else {
            self.phase = Phase::Input;
            self.slots = self.take_slots(self.checkpoint_index);
        }
        self.pending_generations += 1;

        tracing::info!(
            session_id = %self.id,
            checkpoint = scanned,
            completed,
            "checkpoint confirmed"
        );

        ConfirmOutcome::Advanced {
            job: GenerationJob {
                epoch: self.epoch,
                words,
                guidance,
                is_final: completed,
            },
            completed,
        }
    }

    /// Debug/test operation: jumps straight to COMPLETED and hands back a
    /// final generation job over the full history. Seeds placeholder words
    /// when nothing has been committed yet so the storyteller has input.
    pub fn force_complete(&mut self, clock: &dyn Clock) -> GenerationJob {
        if self.history.is_empty() {
            let committed_at = clock.now();
            for (kind, label, value) in [
                ("Place", "A place", "a forgotten attic"),
                ("Noun", "An object", "a brass compass"),
                ("Verb (Past Tense)", "An action", "vanished"),
            ] {
                self.history.push(CommittedWord {
                    participant: PLACEHOLDER_PARTICIPANT.to_owned(),
                    kind: kind.to_owned(),
                    label: label.to_owned(),
                    value: value.to_owned(),
                    committed_at,
                });
            }
        }
        self.checkpoint_index = self.plan.len();
        self.phase = Phase::Completed;
        self.slots = Vec::new();
        self.pending_generations += 1;

        tracing::warn!(session_id = %self.id, "session force-completed");

        GenerationJob {
            epoch: self.epoch,
            words: self.history.clone(),
            guidance: None,
            is_final: true,
        }
    }

    /// Appends a generated (or fallback) segment and clears the in-flight
    /// accounting, as the final mutation of a generation cycle. Returns
    /// false when `epoch` no longer matches: the result is stale and the
    /// session is left untouched.
    pub fn complete_generation(&mut self, epoch: u64, text: String, clock: &dyn Clock) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.segments.push(NarrativeSegment {
            text,
            appended_at: clock.now(),
        });
        self.pending_generations = self.pending_generations.saturating_sub(1);
        true
    }

    /// Rolls back the in-flight accounting for a job that could not be
    /// enqueued. No-op when `epoch` is stale.
    pub fn abort_generation(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.pending_generations = self.pending_generations.saturating_sub(1);
        }
    }

    /// Read-only snapshot for status reads. Safe to call at any time,
    /// including while generation is in flight.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        let completed = self.phase == Phase::Completed;
        let total_steps = self.plan.len();
        let step_number = (self.checkpoint_index + 1).min(total_steps);
        let hint = (!completed).then(|| self.plan.checkpoints[self.checkpoint_index].hint.clone());
        StatusSnapshot {
            phase: self.phase,
            epoch: self.epoch,
            step_number,
            total_steps,
            hint,
            slots: self
                .slots
                .iter()
                .enumerate()
                .map(|(index, slot)| SlotView {
                    index,
                    participant: slot.participant.clone(),
                    label: slot.label.clone(),
                    kind: slot.kind.clone(),
                    value: slot.value.clone(),
                    filled: slot.is_filled(),
                })
                .collect(),
            narrative: self.story_so_far(),
            latest_segment: self.segments.last().map(|segment| segment.text.clone()),
            generation_in_flight: self.pending_generations > 0,
            results: completed.then(|| self.history.clone()),
        }
    }
}
