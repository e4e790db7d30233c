//! Deterministic cache keys for resolver results.
//!
//! The [`cache::KeyCalculator`] turns a set of key factors into a SHA-256 key
//! that a resolver result cache can store entries under. See [`cache`] for
//! the calculation rules and [`factors`] for the built-in providers.

pub mod application;
pub mod cache;
pub mod config;
pub mod factors;
pub mod infra;
