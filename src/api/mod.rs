//! API Module - presentation-facing commands

pub mod commands;
pub mod engine_status;

pub use commands::*;
pub use engine_status::EngineStatus;
