//! Plane Scout - surface acceptance and card placement for AR sessions
//!
//! Core modules:
//! - `surface`: Deterministic acceptance core (validity, deduplication, capacity)
//! - `session`: Session controller, AR engine seams and the single-writer task
//! - `settings`: Session config and scan profiles
//! - `scan`: Seeded synthetic tracking streams
//! - `error`: Error types

pub mod error;
pub mod scan;
pub mod session;
pub mod settings;
pub mod surface;

pub use error::{ConfigError, Rejection, RendererError, SessionError};
pub use session::{PlacementSession, SessionHandle};
pub use settings::{AlignmentFilter, ScanProfile, SessionConfig};

/// Acceptance and placement defaults
pub mod consts {
    use glam::Vec3;

    /// Origins closer than this may be the same surface (m)
    pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 0.5;
    /// |cos| between normals above which surfaces are parallel (~32°)
    pub const DEFAULT_ANGLE_THRESHOLD: f32 = 0.85;

    /// Minimum surface edge (m)
    pub const DEFAULT_MIN_EDGE: f32 = 0.15;
    /// Minimum surface area (m²)
    pub const DEFAULT_MIN_AREA: f32 = 0.05;

    /// Distance a card floats off its surface (m)
    pub const CARD_OFFSET: f32 = 0.01;

    /// World up axis (tracking providers are gravity aligned)
    pub const WORLD_UP: Vec3 = Vec3::Y;
    /// Reference axis for cards on floors and ceilings
    pub const WORLD_FORWARD: Vec3 = Vec3::NEG_Z;
}
