//! Shared vertical-profile pipeline domain primitives.
//!
//! This crate owns the trigger-event contract, input validation, and the
//! coverage freshness decision. It intentionally excludes AWS SDK and Lambda
//! runtime concerns.

pub mod contract;
pub mod freshness;
