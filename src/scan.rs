//! Synthetic tracking streams
//!
//! Produces the kind of event stream a plane tracker emits while a room is
//! scanned: several overlapping fragments per physical surface, extents that
//! grow through updates, sliver planes and the occasional merge (remove).
//! Streams are fully determined by the seed.

use std::collections::VecDeque;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::surface::{Alignment, SurfaceId, SurfaceRecord, TrackingEvent};

/// Wall center height above the floor (m)
const WALL_HEIGHT: f32 = 1.2;
/// Largest extent a fragment grows to (m)
const MAX_EXTENT: f32 = 3.0;

/// A generated event stream
#[derive(Debug, Clone)]
pub struct SyntheticScan {
    /// Events in delivery order
    pub events: Vec<TrackingEvent>,
    /// Distinct physical surfaces in the room
    pub physical_surfaces: usize,
}

/// Seeded room-scan generator
#[derive(Debug, Clone)]
pub struct ScanSimulator {
    seed: u64,
    walls: usize,
    floor: bool,
    /// Room radius range (m)
    min_radius: f32,
    max_radius: f32,
}

impl ScanSimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            walls: 6,
            floor: true,
            min_radius: 2.0,
            max_radius: 4.0,
        }
    }

    /// Number of wall surfaces in the room
    pub fn walls(mut self, walls: usize) -> Self {
        self.walls = walls;
        self
    }

    /// Whether the room has a detectable floor
    pub fn floor(mut self, floor: bool) -> Self {
        self.floor = floor;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate the event stream
    pub fn generate(&self) -> SyntheticScan {
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let mut next_id = 1u64;
        let mut queues: Vec<VecDeque<TrackingEvent>> = Vec::new();

        let spacing = std::f32::consts::TAU / self.walls.max(1) as f32;
        for wall in 0..self.walls {
            let theta = wall as f32 * spacing + rng.random_range(-0.1..0.1) * spacing;
            let radius = rng.random_range(self.min_radius..self.max_radius);
            let outward = Vec3::new(theta.cos(), 0.0, theta.sin());
            let center = outward * radius + Vec3::Y * WALL_HEIGHT;
            // Walls face the middle of the room
            let queue = fragment_events(
                &mut rng,
                &mut next_id,
                center,
                -outward,
                Alignment::Vertical,
            );
            queues.push(queue);
        }

        if self.floor {
            let center = Vec3::new(rng.random_range(-0.5..0.5), 0.0, rng.random_range(-0.5..0.5));
            let queue =
                fragment_events(&mut rng, &mut next_id, center, Vec3::Y, Alignment::Horizontal);
            queues.push(queue);
        }

        let physical_surfaces = queues.len();

        // Interleave surfaces, keeping each surface's own event order
        let mut events = Vec::new();
        loop {
            let live: Vec<usize> = (0..queues.len()).filter(|&i| !queues[i].is_empty()).collect();
            if live.is_empty() {
                break;
            }
            let pick = live[rng.random_range(0..live.len())];
            if let Some(event) = queues[pick].pop_front() {
                events.push(event);
            }
        }

        log::debug!(
            "Synthetic scan (seed {}): {} events for {} surfaces",
            self.seed,
            events.len(),
            physical_surfaces
        );
        SyntheticScan {
            events,
            physical_surfaces,
        }
    }
}

/// Events for one physical surface: overlapping fragments, growth updates,
/// slivers and merges
fn fragment_events(
    rng: &mut Pcg32,
    next_id: &mut u64,
    center: Vec3,
    normal: Vec3,
    alignment: Alignment,
) -> VecDeque<TrackingEvent> {
    let mut events = VecDeque::new();
    let tangent = normal.any_orthonormal_vector();
    let bitangent = normal.cross(tangent);

    let fragments = rng.random_range(1..=3u32);
    for fragment in 0..fragments {
        let id = SurfaceId(*next_id);
        *next_id += 1;

        let position = center
            + tangent * rng.random_range(-0.15..0.15)
            + bitangent * rng.random_range(-0.1..0.1);
        let jitter = Vec3::new(
            rng.random_range(-0.08..0.08),
            rng.random_range(-0.08..0.08),
            rng.random_range(-0.08..0.08),
        );
        let mut record = SurfaceRecord::new(
            id,
            position,
            normal + jitter,
            rng.random_range(0.05..0.35),
            rng.random_range(0.05..0.35),
            alignment,
        );
        events.push_back(TrackingEvent::Added(record.clone()));

        for _ in 0..rng.random_range(0..=3u32) {
            let width = (record.width * rng.random_range(1.2..1.6)).min(MAX_EXTENT);
            let height = (record.height * rng.random_range(1.2..1.6)).min(MAX_EXTENT);
            record = record.with_extent(width, height);
            events.push_back(TrackingEvent::Updated(record.clone()));
        }

        // Trackers merge later fragments into earlier ones
        if fragment > 0 && rng.random_bool(0.15) {
            events.push_back(TrackingEvent::Removed(id));
        }
    }

    if rng.random_bool(0.3) {
        let id = SurfaceId(*next_id);
        *next_id += 1;
        let sliver = SurfaceRecord::new(
            id,
            center + tangent * rng.random_range(-1.0..1.0),
            normal,
            rng.random_range(0.01..0.08),
            rng.random_range(0.01..0.08),
            alignment,
        );
        events.push_back(TrackingEvent::Added(sliver));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ScanProfile, SessionConfig};
    use crate::surface::{AcceptanceRegistry, Decision};

    fn replay(config: &SessionConfig, scan: &SyntheticScan) -> (Vec<Decision>, Vec<SurfaceRecord>) {
        let mut registry = AcceptanceRegistry::new(config);
        registry.set_active(true);
        let decisions: Vec<Decision> = scan.events.iter().cloned().map(|e| registry.apply(e)).collect();
        (decisions, registry.accepted().to_vec())
    }

    #[test]
    fn test_same_seed_same_stream() {
        let a = ScanSimulator::new(42).walls(8).generate();
        let b = ScanSimulator::new(42).walls(8).generate();
        assert_eq!(a.events, b.events);
        assert_eq!(a.physical_surfaces, 9);

        let c = ScanSimulator::new(43).walls(8).generate();
        assert_ne!(a.events, c.events);
    }

    #[test]
    fn test_per_surface_order() {
        let scan = ScanSimulator::new(7).walls(10).generate();
        let mut seen = std::collections::HashSet::new();
        let mut removed = std::collections::HashSet::new();
        for event in &scan.events {
            let id = event.surface_id();
            match event {
                TrackingEvent::Added(_) => assert!(seen.insert(id)),
                TrackingEvent::Updated(_) => {
                    assert!(seen.contains(&id));
                    assert!(!removed.contains(&id));
                }
                TrackingEvent::Removed(_) => assert!(removed.insert(id)),
            }
        }
    }

    #[test]
    fn test_replay_is_deterministic() {
        let config = SessionConfig::from_profile(ScanProfile::Thorough);
        let scan = ScanSimulator::new(2024).walls(12).generate();
        assert_eq!(replay(&config, &scan), replay(&config, &scan));
    }

    #[test]
    fn test_registry_collapses_fragments() {
        let config = SessionConfig {
            capacity: 50,
            ..SessionConfig::from_profile(ScanProfile::Quick)
        };
        let scan = ScanSimulator::new(99).walls(6).floor(false).generate();
        let (_, accepted) = replay(&config, &scan);
        // Never more surfaces than walls, however many fragments were reported
        assert!(accepted.len() <= scan.physical_surfaces);
        assert!(!accepted.is_empty());
    }
}
