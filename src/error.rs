//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the mannequin crate.
#[derive(Debug)]
pub enum MannequinError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to load or decode a humanoid figure asset. Carries the asset
    /// path and a reason, so the embedding UI can name the failed file.
    FigureLoad {
        /// Path of the asset that failed to load.
        path: String,
        /// Human-readable failure reason.
        reason: String,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options or profile parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for MannequinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::FigureLoad { path, reason } => {
                write!(f, "failed to load figure {path}: {reason}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MannequinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for MannequinError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for MannequinError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
