//! VIGIL Core — the status & incident lifecycle engine.
//!
//! This crate holds everything with real invariants to protect: the
//! ordered status vocabulary, the domain models, the incident
//! lifecycle rules with their append-only timeline, the status
//! aggregation logic, and the access policy gate.
//!
//! It is storage- and transport-agnostic: durable state is reached
//! only through the repository traits in [`repository`], and identity
//! only through [`identity::IdentityProvider`]. Concrete
//! implementations live in `vigil-db` and in the external identity
//! collaborator.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod models;
pub mod policy;
pub mod registration;
pub mod repository;
pub mod status;
