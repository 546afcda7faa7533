//! Application layer for the Hunt Session context.

pub mod controller;
