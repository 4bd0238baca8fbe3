//! Acceptance registry
//!
//! Owns the ordered list of accepted surfaces and decides, event by event,
//! whether a tracked surface is kept. The registry is a plain state machine:
//! no interior locking, no I/O. Callers serialize access (see
//! `session::SessionHandle`).

use serde::{Deserialize, Serialize};

use super::filter::SurfaceFilter;
use super::record::{SurfaceId, SurfaceRecord, TrackingEvent};
use super::similarity::SimilarityComparator;
use crate::error::Rejection;
use crate::settings::{AlignmentFilter, SessionConfig};

/// Whether the registry still takes new surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryState {
    /// Accepting add events
    Open,
    /// Target count reached; only `reset` reopens
    Closed,
}

/// Outcome of applying one tracking event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Appended at `slot`; `capacity_reached` is set on the final acceptance
    Accepted { slot: usize, capacity_reached: bool },
    /// Accepted record at `slot` replaced by a newer snapshot
    Updated { slot: usize },
    /// Accepted record at `slot` dropped
    Removed { slot: usize },
    /// Add dropped
    Rejected(Rejection),
    /// Registry inactive, or the event refers to a surface that was never accepted
    Ignored,
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }

    pub fn capacity_reached(&self) -> bool {
        matches!(
            self,
            Decision::Accepted {
                capacity_reached: true,
                ..
            }
        )
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Decision::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Ordered, duplicate-free, capacity-bounded set of accepted surfaces
#[derive(Debug, Clone)]
pub struct AcceptanceRegistry {
    /// Acceptance order
    accepted: Vec<SurfaceRecord>,
    capacity: usize,
    active: bool,
    state: RegistryState,
    filter: SurfaceFilter,
    comparator: SimilarityComparator,
    alignments: AlignmentFilter,
}

impl AcceptanceRegistry {
    /// Create an inactive, open registry from a session config
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_rules(
            config.capacity,
            config.filter(),
            config.comparator(),
            config.alignments,
        )
    }

    /// Create an inactive, open registry from explicit rules.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_rules(
        capacity: usize,
        filter: SurfaceFilter,
        comparator: SimilarityComparator,
        alignments: AlignmentFilter,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            accepted: Vec::with_capacity(capacity),
            capacity,
            active: false,
            state: RegistryState::Open,
            filter,
            comparator,
            alignments,
        }
    }

    /// Route a tracking event to `add`, `update` or `remove`
    pub fn apply(&mut self, event: TrackingEvent) -> Decision {
        match event {
            TrackingEvent::Added(record) => self.add(record),
            TrackingEvent::Updated(record) => self.update(record),
            TrackingEvent::Removed(id) => self.remove(id),
        }
    }

    /// Offer a newly detected surface
    pub fn add(&mut self, record: SurfaceRecord) -> Decision {
        if !self.active {
            return Decision::Ignored;
        }
        if let Err(reason) = self.check(&record) {
            log::debug!(
                "Rejected surface {} ({:.2}x{:.2} m, {}): {}",
                record.id,
                record.width,
                record.height,
                record.alignment.as_str(),
                reason
            );
            return Decision::Rejected(reason);
        }

        let slot = self.accepted.len();
        log::info!(
            "Accepted surface {} ({:.2}x{:.2} m): {}/{}",
            record.id,
            record.width,
            record.height,
            slot + 1,
            self.capacity
        );
        self.accepted.push(record);

        let capacity_reached = self.accepted.len() == self.capacity;
        if capacity_reached {
            self.state = RegistryState::Closed;
            log::info!("Target of {} surfaces reached, registry closed", self.capacity);
        }
        Decision::Accepted {
            slot,
            capacity_reached,
        }
    }

    /// Acceptance rules in evaluation order
    fn check(&self, record: &SurfaceRecord) -> Result<(), Rejection> {
        if self.state == RegistryState::Closed {
            return Err(Rejection::CapacityClosed);
        }
        if !self.filter.is_valid(record) {
            return Err(Rejection::InvalidSurface);
        }
        if !self.alignments.allows(record.alignment) {
            return Err(Rejection::AlignmentFiltered);
        }
        let duplicate = self
            .accepted
            .iter()
            .any(|existing| existing.id == record.id || self.comparator.is_similar(existing, record));
        if duplicate {
            return Err(Rejection::DuplicateSurface);
        }
        Ok(())
    }

    /// Replace an accepted surface with a newer snapshot, keeping its slot.
    ///
    /// Extents are not re-validated: an accepted surface stays accepted even
    /// if the provider later reports it smaller.
    pub fn update(&mut self, record: SurfaceRecord) -> Decision {
        if !self.active {
            return Decision::Ignored;
        }
        match self.slot_of(record.id) {
            Some(slot) => {
                self.accepted[slot] = record;
                Decision::Updated { slot }
            }
            None => Decision::Ignored,
        }
    }

    /// Drop an accepted surface. A closed registry stays closed.
    pub fn remove(&mut self, id: SurfaceId) -> Decision {
        if !self.active {
            return Decision::Ignored;
        }
        match self.slot_of(id) {
            Some(slot) => {
                self.accepted.remove(slot);
                log::info!(
                    "Surface {} removed by tracking: {}/{}",
                    id,
                    self.accepted.len(),
                    self.capacity
                );
                Decision::Removed { slot }
            }
            None => Decision::Ignored,
        }
    }

    /// Forget every accepted surface and reopen
    pub fn reset(&mut self) {
        self.accepted.clear();
        self.state = RegistryState::Open;
    }

    fn slot_of(&self, id: SurfaceId) -> Option<usize> {
        self.accepted.iter().position(|r| r.id == id)
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == RegistryState::Closed
    }

    /// Accepted surfaces in acceptance order
    pub fn accepted(&self) -> &[SurfaceRecord] {
        &self.accepted
    }

    pub fn get(&self, id: SurfaceId) -> Option<&SurfaceRecord> {
        self.accepted.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Surfaces still needed to reach the target
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.accepted.len())
    }

    pub fn filter(&self) -> &SurfaceFilter {
        &self.filter
    }

    pub fn comparator(&self) -> &SimilarityComparator {
        &self.comparator
    }
}
