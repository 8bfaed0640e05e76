//! Application services (use cases).
//!
//! These services compose the domain types and drive the outbound ports to
//! implement the crate's use cases.

pub mod orchestration;
