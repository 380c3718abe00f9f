//! taskdeck - A small task-tracking service with LLM-assisted augmentation.
//!
//! This library provides the core functionality for the `taskdeck` binary:
//! task records and their validation, whole-file JSON persistence, the CRUD
//! service on top of it, and the model-backed augmentation flows.

pub mod ai;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod server;
pub mod storage;


/// Library-level error type for taskdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type alias for taskdeck operations.
pub type Result<T> = std::result::Result<T, Error>;
