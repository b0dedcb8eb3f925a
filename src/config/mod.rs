// src/config/mod.rs
// Configuration: environment variables layered over ~/.support-triage/config.toml

pub mod env;
pub mod file;

pub use env::{ApiKeys, ConfigValidation, EnvConfig};
pub use file::TriageConfig;
