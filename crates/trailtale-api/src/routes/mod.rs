//! Route modules.

pub mod admin;
pub mod health;
pub mod hunt;
