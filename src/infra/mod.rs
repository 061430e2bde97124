//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod fixture;
pub mod panel;
pub mod telemetry;
