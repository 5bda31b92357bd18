//! Shared exercises API domain primitives.
//!
//! This crate owns stored-row validation, link expiry arithmetic, and the
//! response/envelope contract. It intentionally excludes AWS SDK and Lambda
//! runtime concerns, which live in `exercises_api_lambda`.

pub mod contract;
pub mod entity;
pub mod links;
