//! Wiring used by the command-line tool.

pub mod calculator;
pub mod error;
