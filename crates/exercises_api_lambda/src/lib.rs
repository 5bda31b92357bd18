//! AWS-oriented adapters and handlers for the exercises API.
//!
//! This crate owns runtime integration details (the Lambda handler, DynamoDB
//! reads and S3 presigning) and wires them to the domain contract exported by
//! `exercises_api_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
