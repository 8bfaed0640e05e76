//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] — Fixed actor addresses, amounts and market builders.
//! - [`world`] — A fully deployed in-memory setup with helpers for each flow.
//! - [`adapter`] — Swap adapters that attack the orchestrator.
//! - [`config`] — Canonical test configurations.

pub mod adapter;
pub mod config;
pub mod domain;
pub mod world;
