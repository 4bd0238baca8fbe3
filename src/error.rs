//! Error types
//!
//! Rejections are routine tracking noise and never leave the registry as a
//! hard error. Everything a caller has to react to lives in `SessionError`,
//! `RendererError` and `ConfigError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::SurfaceId;

/// Why the registry dropped an incoming surface
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Reported extents are below the configured minimums
    #[error("surface is too small to place on")]
    InvalidSurface,

    /// Same physical surface as one already accepted
    #[error("surface duplicates an accepted surface")]
    DuplicateSurface,

    /// Target count already reached
    #[error("registry is closed, target count reached")]
    CapacityClosed,

    /// Alignment is not tracked by this session
    #[error("surface alignment is not tracked by this session")]
    AlignmentFiltered,
}

/// Errors surfaced to session callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Scatter requested without enough accepted surfaces
    #[error("no surfaces available: {accepted} accepted, {required} required")]
    NoSurfacesAvailable { accepted: usize, required: usize },

    /// The session task has stopped
    #[error("session task is no longer running")]
    Disconnected,
}

/// Failure reported by a scene renderer for a single object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("renderer failed to place object on surface {surface_id}: {reason}")]
pub struct RendererError {
    pub surface_id: SurfaceId,
    pub reason: String,
}

impl RendererError {
    pub fn new(surface_id: SurfaceId, reason: impl Into<String>) -> Self {
        Self {
            surface_id,
            reason: reason.into(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("capacity must be greater than zero")]
    InvalidCapacity,

    #[error("invalid threshold `{name}`: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("scatter minimum {min_scatter} exceeds capacity {capacity}")]
    InvalidScatterMinimum { min_scatter: usize, capacity: usize },

    #[error("unknown scan profile `{0}`")]
    UnknownProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result alias for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
