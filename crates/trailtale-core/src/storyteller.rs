//! Storyteller abstraction — the external text-generation contract.
//!
//! The session core depends only on this trait; the concrete HTTP client
//! lives in the narrative crate and test doubles in test-support.

use async_trait::async_trait;

use crate::error::GameError;

/// One committed word handed to the storyteller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordContribution {
    /// Display name of the participant who contributed the word.
    pub participant: String,
    /// Semantic word kind, e.g. "Place" or "Verb (Past Tense)".
    pub kind: String,
    /// Display label of the slot the word filled.
    pub label: String,
    /// The word itself.
    pub value: String,
}

/// A request to extend the hunt narrative.
#[derive(Debug, Clone)]
pub struct StoryRequest {
    /// All narrative segments generated so far, joined in append order.
    pub story_so_far: String,
    /// Newly committed words for the checkpoint just confirmed.
    pub words: Vec<WordContribution>,
    /// Optional guidance tag from the checkpoint configuration.
    pub guidance: Option<String>,
    /// True when this is the closing segment of the hunt.
    pub is_final: bool,
}

/// Abstraction over the external text-generation service.
#[async_trait]
pub trait Storyteller: Send + Sync {
    /// Produce the next narrative segment for `request`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Generation` on any service failure, including
    /// timeouts and malformed responses.
    async fn continue_story(&self, request: &StoryRequest) -> Result<String, GameError>;
}
