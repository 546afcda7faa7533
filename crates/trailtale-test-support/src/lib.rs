//! Shared test mocks and utilities for the Trailtale hunt server.

mod clock;
mod rng;
mod storyteller;

pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
pub use storyteller::{FailingStoryteller, ScriptedResponse, ScriptedStoryteller};
