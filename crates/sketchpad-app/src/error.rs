//! Application errors.

use sketchpad_core::{ConfigError, ToolError};
use sketchpad_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the application shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Usage error: {0}")]
    Usage(String),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid event script: {0}")]
    Script(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Invalid tool in script: {0}")]
    Tool(#[from] ToolError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
