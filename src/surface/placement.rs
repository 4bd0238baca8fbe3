//! Card placement geometry
//!
//! A card lies flat against its surface: its local Z axis is the surface
//! normal and its local Y axis is as close to world up as the surface allows.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::record::{SurfaceId, SurfaceRecord};
use crate::consts::{WORLD_FORWARD, WORLD_UP};

/// A card placed on an accepted surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Surface the card sits on (not owned)
    pub surface_id: SurfaceId,
    /// Surface origin pushed out along the normal
    pub position: Vec3,
    /// Rotation from the card basis to world space
    pub orientation: Quat,
}

impl PlacedObject {
    /// Place a card on `surface`, lifted `offset` metres off it
    pub fn on_surface(surface: &SurfaceRecord, offset: f32) -> Self {
        Self {
            surface_id: surface.id,
            position: surface.position + surface.normal * offset,
            orientation: card_orientation(surface.normal),
        }
    }

    /// Card face normal in world space
    pub fn facing(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

/// Rotation taking the card basis (X right, Y up, Z out) onto a surface normal
pub fn card_orientation(normal: Vec3) -> Quat {
    let normal = normal.normalize_or_zero();
    if normal == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    // Floors and ceilings: world up is parallel to the normal, pick forward
    let reference = if normal.dot(WORLD_UP).abs() > 0.999 {
        WORLD_FORWARD
    } else {
        WORLD_UP
    };

    let right = reference.cross(normal).normalize();
    let up = normal.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, normal)).normalize()
}
