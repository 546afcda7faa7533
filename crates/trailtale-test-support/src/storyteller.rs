//! Test storytellers — deterministic `Storyteller` implementations.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use trailtale_core::error::GameError;
use trailtale_core::storyteller::{StoryRequest, Storyteller};

/// One scripted reply: an artificial service latency plus the result.
#[derive(Debug)]
pub struct ScriptedResponse {
    /// Simulated service latency before the result is returned.
    pub delay: Duration,
    /// The scripted outcome.
    pub result: Result<String, String>,
}

impl ScriptedResponse {
    /// An immediate successful reply.
    #[must_use]
    pub fn ok(text: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(text.to_owned()),
        }
    }

    /// A successful reply delivered after `delay`, for simulating slow
    /// service completions.
    #[must_use]
    pub fn ok_after(delay: Duration, text: &str) -> Self {
        Self {
            delay,
            result: Ok(text.to_owned()),
        }
    }

    /// An immediate failure.
    #[must_use]
    pub fn fail(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(message.to_owned()),
        }
    }
}

/// A storyteller that replays a scripted sequence of responses, one per
/// call, honoring each response's delay. Panics if called more times
/// than the script provides.
#[derive(Debug)]
pub struct ScriptedStoryteller {
    script: Mutex<VecDeque<ScriptedResponse>>,
}

impl ScriptedStoryteller {
    /// Create a storyteller that will reply with `responses` in order.
    #[must_use]
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
        }
    }
}

#[async_trait]
impl Storyteller for ScriptedStoryteller {
    async fn continue_story(&self, _request: &StoryRequest) -> Result<String, GameError> {
        let response = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedStoryteller called more times than scripted");
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result.map_err(GameError::Generation)
    }
}

/// A storyteller that always fails, driving the fallback path.
#[derive(Debug)]
pub struct FailingStoryteller;

#[async_trait]
impl Storyteller for FailingStoryteller {
    async fn continue_story(&self, _request: &StoryRequest) -> Result<String, GameError> {
        Err(GameError::Generation("service unavailable".to_owned()))
    }
}
