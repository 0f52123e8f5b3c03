//! Error types
//!
//! Only initialisation and persistence failures surface as errors. Per-frame
//! input gaps are absorbed by the decoder and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gesture model could not be loaded; the session cannot start.
    #[error("failed to load gesture model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// A scripted gesture replay could not be read.
    #[error("failed to load gesture replay {path}: {reason}")]
    Replay { path: PathBuf, reason: String },

    /// Camera or frame source unavailable at session start.
    #[error("camera unavailable: {0}")]
    Camera(String),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
