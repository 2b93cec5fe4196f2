//! Domain models for VIGIL.
//!
//! These are the core types shared across all crates.

pub mod incident;
pub mod incident_update;
pub mod organization;
pub mod service;
pub mod team_member;
