//! AWS-oriented adapters and handlers for the vertical-profile pipeline.
//!
//! This crate owns runtime integration details (Lambda handlers and the S3
//! and SNS adapter seams) on top of the event contract and freshness rules
//! in `vp_pipeline_core`.

pub mod adapters;
pub mod handlers;
