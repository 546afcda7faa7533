//! Trailtale — Hunt Session bounded context.
//!
//! Responsible for the hunt plan, the shuffled roster, the session
//! phase machine, and the lock-guarded controller that drives it.

pub mod application;
pub mod domain;
