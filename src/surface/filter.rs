//! Size-based validity filter
//!
//! Tracking providers report many sliver planes while a surface is still
//! being discovered. Anything below the minimum extents is not usable for
//! placing a card.

use super::record::SurfaceRecord;
use crate::consts::{DEFAULT_MIN_AREA, DEFAULT_MIN_EDGE};

/// Minimum extents a surface must report to be placeable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFilter {
    /// Minimum width (m)
    pub min_width: f32,
    /// Minimum height (m)
    pub min_height: f32,
    /// Minimum area (m²)
    pub min_area: f32,
}

impl Default for SurfaceFilter {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_EDGE,
            min_height: DEFAULT_MIN_EDGE,
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl SurfaceFilter {
    pub fn new(min_width: f32, min_height: f32, min_area: f32) -> Self {
        Self {
            min_width,
            min_height,
            min_area,
        }
    }

    /// Whether the surface is large enough to place on.
    ///
    /// Non-positive or non-finite extents never pass, whatever the minimums.
    pub fn is_valid(&self, record: &SurfaceRecord) -> bool {
        let (w, h) = (record.width, record.height);
        if !(w > 0.0 && h > 0.0) || !w.is_finite() || !h.is_finite() {
            return false;
        }
        w >= self.min_width && h >= self.min_height && w * h >= self.min_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn wall(width: f32, height: f32) -> SurfaceRecord {
        SurfaceRecord::vertical(1, Vec3::ZERO, Vec3::Z, width, height)
    }

    #[test]
    fn test_permissive_profile_accepts_small_planes() {
        let filter = SurfaceFilter::new(0.05, 0.05, 0.01);
        assert!(filter.is_valid(&wall(0.1, 0.1)));
        assert!(!filter.is_valid(&wall(0.04, 1.0)));
    }

    #[test]
    fn test_strict_profile_rejects_small_area() {
        let filter = SurfaceFilter::new(0.15, 0.15, 0.05);
        // Both edges pass but area 0.04 does not
        assert!(!filter.is_valid(&wall(0.2, 0.2)));
        assert!(filter.is_valid(&wall(0.25, 0.25)));
        assert!(!filter.is_valid(&wall(0.1, 0.1)));
    }

    #[test]
    fn test_each_edge_checked() {
        let filter = SurfaceFilter::new(0.15, 0.15, 0.0);
        assert!(!filter.is_valid(&wall(0.1, 2.0)));
        assert!(!filter.is_valid(&wall(2.0, 0.1)));
        assert!(filter.is_valid(&wall(0.15, 0.15)));
    }

    #[test]
    fn test_degenerate_extents_rejected() {
        let filter = SurfaceFilter::new(0.0, 0.0, 0.0);
        assert!(!filter.is_valid(&wall(0.0, 1.0)));
        assert!(!filter.is_valid(&wall(-1.0, -1.0)));
        assert!(!filter.is_valid(&wall(f32::NAN, 1.0)));
        assert!(!filter.is_valid(&wall(f32::INFINITY, 1.0)));
    }
}
