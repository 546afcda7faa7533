//! Hunt plan configuration: checkpoints, slots, and the roster.
//!
//! The plan is authored as a small YAML file and parsed once at startup.
//! Checkpoint ids are the 1-based numbers printed on the physical codes;
//! they must appear in order so that scanning code N always means
//! "checkpoint index N - 1".

use serde::Deserialize;

use trailtale_core::error::GameError;
use trailtale_core::rng::DeterministicRng;

/// Participant name substituted for slots beyond the roster in lenient mode.
pub const PLACEHOLDER_PARTICIPANT: &str = "Unknown";

/// One required word input on a checkpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotSpec {
    /// Display label shown to the participant, e.g. "A hiding place".
    pub label: String,
    /// Semantic word kind, e.g. "Place" or "Noun (Plural)".
    pub kind: String,
    /// Optional narrative-guidance tag passed to the storyteller.
    #[serde(default)]
    pub guidance: Option<String>,
}

/// One physical checkpoint in the hunt.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckpointSpec {
    /// 1-based id matching the physical confirmation code.
    pub id: u32,
    /// Hint shown while the group is out looking for this code.
    pub hint: String,
    /// Word slots that must be filled before this checkpoint can be
    /// committed. At least one.
    pub slots: Vec<SlotSpec>,
}

impl CheckpointSpec {
    /// Folds the slot guidance tags into a single batch tag for the
    /// storyteller: the first non-empty tag in slot order.
    #[must_use]
    pub fn guidance(&self) -> Option<String> {
        self.slots
            .iter()
            .filter_map(|slot| slot.guidance.as_deref())
            .map(str::trim)
            .find(|tag| !tag.is_empty())
            .map(ToOwned::to_owned)
    }
}

/// The ordered checkpoint plan for one hunt.
#[derive(Debug, Clone, Deserialize)]
pub struct HuntPlan {
    /// Checkpoints in visiting order.
    pub checkpoints: Vec<CheckpointSpec>,
}

impl HuntPlan {
    /// Total number of word slots across the whole plan.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.checkpoints.iter().map(|c| c.slots.len()).sum()
    }

    /// Number of checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// True when the plan has no checkpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Validates plan structure: at least one checkpoint, ids numbered
    /// `1..=N` in order, at least one slot per checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPlan` describing the first problem found.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.checkpoints.is_empty() {
            return Err(GameError::InvalidPlan(
                "the plan has no checkpoints".to_owned(),
            ));
        }
        for (index, checkpoint) in self.checkpoints.iter().enumerate() {
            let expected = u32::try_from(index + 1).unwrap_or(u32::MAX);
            if checkpoint.id != expected {
                return Err(GameError::InvalidPlan(format!(
                    "checkpoint at position {index} has id {}, expected {expected}",
                    checkpoint.id
                )));
            }
            if checkpoint.slots.is_empty() {
                return Err(GameError::InvalidPlan(format!(
                    "checkpoint {} has no word slots",
                    checkpoint.id
                )));
            }
        }
        Ok(())
    }
}

/// The full hunt configuration file: who plays, and where they go.
#[derive(Debug, Clone, Deserialize)]
pub struct HuntConfig {
    /// Participant display names, unique within the roster.
    pub participants: Vec<String>,
    /// When true (the default), a roster/slot-count mismatch is fatal at
    /// startup. When false, extra slots are assigned to a placeholder
    /// participant with a logged warning.
    #[serde(default = "default_strict")]
    pub strict_roster: bool,
    /// The checkpoint plan.
    #[serde(flatten)]
    pub plan: HuntPlan,
}

fn default_strict() -> bool {
    true
}

impl HuntConfig {
    /// Parses a hunt configuration from YAML and validates it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPlan` on parse or structural errors, and
    /// `GameError::ConfigurationMismatch` when `strict_roster` is set and
    /// the roster size differs from the total slot count.
    pub fn from_yaml(source: &str) -> Result<Self, GameError> {
        let config: Self = serde_yaml::from_str(source)
            .map_err(|e| GameError::InvalidPlan(format!("YAML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates plan structure and the roster/slot-count invariant.
    ///
    /// # Errors
    ///
    /// See [`HuntConfig::from_yaml`].
    pub fn validate(&self) -> Result<(), GameError> {
        self.plan.validate()?;
        if self.participants.iter().any(|name| name.trim().is_empty()) {
            return Err(GameError::InvalidPlan(
                "participant names must not be blank".to_owned(),
            ));
        }
        let slots = self.plan.total_slots();
        if self.participants.len() != slots {
            if self.strict_roster {
                return Err(GameError::ConfigurationMismatch {
                    participants: self.participants.len(),
                    slots,
                });
            }
            tracing::warn!(
                participants = self.participants.len(),
                slots,
                "roster does not match slot count; extra slots go to \"{PLACEHOLDER_PARTICIPANT}\""
            );
        }
        Ok(())
    }
}

/// Produces the session roster: a Fisher-Yates shuffle of the configured
/// participant names, driven through the injected RNG.
#[must_use]
pub fn shuffled_roster(participants: &[String], rng: &mut dyn DeterministicRng) -> Vec<String> {
    let mut roster = participants.to_vec();
    for i in (1..roster.len()).rev() {
        let j = rng.next_u32_range(0, u32::try_from(i).unwrap_or(u32::MAX)) as usize;
        roster.swap(i, j);
    }
    roster
}
