//! Duplicate-surface detection
//!
//! A wall or table scanned incrementally shows up as several nearby,
//! near-coplanar anchors. Two records are the same physical surface when
//! their origins are close and their normals are (anti-)parallel.

use super::record::SurfaceRecord;
use crate::consts::{DEFAULT_ANGLE_THRESHOLD, DEFAULT_DISTANCE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityComparator {
    /// Origins closer than this (m) may be the same surface
    pub distance_threshold: f32,
    /// Minimum |cos| between normals (0.85 is roughly 32°)
    pub angle_threshold: f32,
}

impl Default for SimilarityComparator {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
        }
    }
}

impl SimilarityComparator {
    pub fn new(distance_threshold: f32, angle_threshold: f32) -> Self {
        Self {
            distance_threshold,
            angle_threshold,
        }
    }

    /// Whether `a` and `b` describe the same physical surface
    pub fn is_similar(&self, a: &SurfaceRecord, b: &SurfaceRecord) -> bool {
        let distance = a.position.distance(b.position);
        if !(distance < self.distance_threshold) {
            return false;
        }
        a.normal.dot(b.normal).abs() > self.angle_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn wall(id: u64, pos: Vec3, normal: Vec3) -> SurfaceRecord {
        SurfaceRecord::vertical(id, pos, normal, 0.3, 0.3)
    }

    #[test]
    fn test_nearby_coplanar_is_similar() {
        let cmp = SimilarityComparator::default();
        let a = wall(1, Vec3::ZERO, Vec3::Z);
        let b = wall(2, Vec3::new(0.1, 0.0, 0.05), Vec3::Z);
        assert!(cmp.is_similar(&a, &b));
        assert!(cmp.is_similar(&b, &a));
    }

    #[test]
    fn test_anti_parallel_normals_count() {
        let cmp = SimilarityComparator::default();
        let a = wall(1, Vec3::ZERO, Vec3::Z);
        let b = wall(2, Vec3::new(0.2, 0.0, 0.0), -Vec3::Z);
        assert!(cmp.is_similar(&a, &b));
    }

    #[test]
    fn test_far_apart_is_distinct() {
        let cmp = SimilarityComparator::default();
        let a = wall(1, Vec3::ZERO, Vec3::Z);
        let b = wall(2, Vec3::new(0.6, 0.0, 0.0), Vec3::Z);
        assert!(!cmp.is_similar(&a, &b));
    }

    #[test]
    fn test_perpendicular_walls_in_corner_are_distinct() {
        let cmp = SimilarityComparator::default();
        let a = wall(1, Vec3::ZERO, Vec3::Z);
        let b = wall(2, Vec3::new(0.1, 0.0, 0.1), Vec3::X);
        assert!(!cmp.is_similar(&a, &b));
    }

    #[test]
    fn test_angle_boundary() {
        let cmp = SimilarityComparator::default();
        let a = wall(1, Vec3::ZERO, Vec3::Z);
        // 40° off: cos ≈ 0.766, below threshold
        let tilted = Vec3::new(40f32.to_radians().sin(), 0.0, 40f32.to_radians().cos());
        assert!(!cmp.is_similar(&a, &wall(2, Vec3::ZERO, tilted)));
        // 20° off: cos ≈ 0.94
        let tilted = Vec3::new(20f32.to_radians().sin(), 0.0, 20f32.to_radians().cos());
        assert!(cmp.is_similar(&a, &wall(3, Vec3::ZERO, tilted)));
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let tight = SimilarityComparator::new(0.05, 0.99);
        let a = wall(1, Vec3::ZERO, Vec3::Z);
        let b = wall(2, Vec3::new(0.1, 0.0, 0.0), Vec3::Z);
        assert!(!tight.is_similar(&a, &b));
    }
}
