//! Surface snapshots as reported by a tracking provider
//!
//! A record is immutable. Tracking updates produce a new record with the same
//! id which supersedes the old one.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identity supplied by the tracking provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Surface orientation class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Floors, tables
    Horizontal,
    /// Walls
    Vertical,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Horizontal => "horizontal",
            Alignment::Vertical => "vertical",
        }
    }
}

/// A detected surface at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    pub id: SurfaceId,
    /// World-space origin of the surface
    pub position: Vec3,
    /// Unit normal (zero if the provider reported a degenerate one)
    pub normal: Vec3,
    /// Known extent in metres
    pub width: f32,
    pub height: f32,
    pub alignment: Alignment,
}

impl SurfaceRecord {
    pub fn new(
        id: SurfaceId,
        position: Vec3,
        normal: Vec3,
        width: f32,
        height: f32,
        alignment: Alignment,
    ) -> Self {
        Self {
            id,
            position,
            normal: normal.normalize_or_zero(),
            width,
            height,
            alignment,
        }
    }

    /// Convenience constructor for a wall facing along `normal`
    pub fn vertical(id: u64, position: Vec3, normal: Vec3, width: f32, height: f32) -> Self {
        Self::new(SurfaceId(id), position, normal, width, height, Alignment::Vertical)
    }

    /// Convenience constructor for a floor or table (normal = world up)
    pub fn horizontal(id: u64, position: Vec3, width: f32, height: f32) -> Self {
        Self::new(SurfaceId(id), position, Vec3::Y, width, height, Alignment::Horizontal)
    }

    /// Extent area in square metres
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Same surface with refined extents (what a tracking update looks like)
    pub fn with_extent(&self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }
}

/// A single event from the surface tracking provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackingEvent {
    Added(SurfaceRecord),
    Updated(SurfaceRecord),
    Removed(SurfaceId),
}

impl TrackingEvent {
    /// Id of the surface the event refers to
    pub fn surface_id(&self) -> SurfaceId {
        match self {
            TrackingEvent::Added(record) | TrackingEvent::Updated(record) => record.id,
            TrackingEvent::Removed(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TrackingEvent::Added(_) => "add",
            TrackingEvent::Updated(_) => "update",
            TrackingEvent::Removed(_) => "remove",
        }
    }
}
