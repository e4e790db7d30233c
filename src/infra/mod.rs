//! Process-level infrastructure for the command-line tool.

pub mod error;
pub mod telemetry;
