//! Engagement state, the per-pair toggle controller and its registry.

pub mod controller;
pub mod registry;
pub mod state;
