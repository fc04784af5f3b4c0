//! Phineas - driver assignment engine for rental deliveries
//!
//! Ranks drivers for unassigned bookings, turns the best match into a
//! reviewable proposal, and commits approved proposals to the fleet's
//! routes exactly once.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod fleet;
pub mod geo;
pub mod logging;
pub mod metrics;
pub mod proposals;
pub mod scoring;
