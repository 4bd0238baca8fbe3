//! Placement session controller
//!
//! Bridges the acceptance registry to the tracking provider, the scene
//! renderer and user commands. All methods take `&mut self`; share a session
//! across threads through `SessionHandle`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collaborators::{
    PlacementFailure, SceneRenderer, SessionEvent, SessionObserver, TrackingProvider,
};
use crate::error::{SessionError, SessionResult};
use crate::settings::SessionConfig;
use crate::surface::{AcceptanceRegistry, Decision, PlacedObject, SurfaceRecord, TrackingEvent};

/// User-facing scan progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    /// Never started, nothing accepted
    Idle,
    Scanning { found: usize, target: usize },
    /// Stopped by the user before the target was reached
    Paused { found: usize, target: usize },
    TargetReached { target: usize },
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Idle => write!(f, "Press start to scan for surfaces"),
            ScanStatus::Scanning { found: 0, .. } => write!(f, "Scanning for surfaces..."),
            ScanStatus::Scanning { found, target } => {
                write!(f, "Scanning for surfaces... {}/{} found", found, target)
            }
            ScanStatus::Paused { found, target } => {
                write!(f, "Scanning paused: {}/{} surfaces", found, target)
            }
            ScanStatus::TargetReached { target } => {
                write!(f, "All {} surfaces found!", target)
            }
        }
    }
}

/// Outcome of a scatter command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementReport {
    /// Cards the renderer accepted
    pub placed: Vec<PlacedObject>,
    /// Cards the renderer failed to place
    pub failed: Vec<PlacementFailure>,
}

impl PlacementReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.placed.len() + self.failed.len()
    }
}

/// One scanning/placement session
pub struct PlacementSession<R, P> {
    config: SessionConfig,
    registry: AcceptanceRegistry,
    renderer: R,
    provider: P,
    /// Cards currently in the scene
    placed: Vec<PlacedObject>,
    observers: Vec<Box<dyn SessionObserver + Send>>,
}

impl<R, P> fmt::Debug for PlacementSession<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementSession")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("placed", &self.placed.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<R: SceneRenderer, P: TrackingProvider> PlacementSession<R, P> {
    pub fn new(config: SessionConfig, renderer: R, provider: P) -> Self {
        let registry = AcceptanceRegistry::new(&config);
        Self {
            config,
            registry,
            renderer,
            provider,
            placed: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Register a listener for session notifications
    pub fn subscribe(&mut self, observer: impl SessionObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: SessionEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    /// Begin accepting tracking events and enable surface detection
    pub fn start_scanning(&mut self) {
        self.registry.set_active(true);
        self.provider.enable_tracking(self.config.alignments);
        log::info!(
            "Scanning started: {}/{} surfaces",
            self.registry.len(),
            self.registry.capacity()
        );
    }

    /// Ignore tracking events and disable surface detection. Accepted
    /// surfaces are kept.
    pub fn stop_scanning(&mut self) {
        self.registry.set_active(false);
        self.provider.disable_tracking();
        log::info!("Scanning stopped with {} surfaces", self.registry.len());
    }

    /// Apply one provider event and issue the resulting side effects
    pub fn on_tracking_event(&mut self, event: TrackingEvent) -> Decision {
        let surface_id = event.surface_id();
        let decision = self.registry.apply(event);

        match decision {
            Decision::Accepted {
                slot,
                capacity_reached,
            } => {
                let record = self.registry.accepted()[slot].clone();
                self.renderer.show_surface(&record);
                self.notify(SessionEvent::Accepted(record));

                if capacity_reached {
                    self.provider.halt_tracking();
                    let count = self.registry.len();
                    self.notify(SessionEvent::TargetReached { count });
                }
            }
            Decision::Updated { slot } => {
                let record = &self.registry.accepted()[slot];
                self.renderer.refresh_surface(record);
            }
            Decision::Removed { .. } => {
                self.renderer.hide_surface(surface_id);
                self.notify(SessionEvent::Removed(surface_id));
            }
            Decision::Rejected(reason) => {
                self.notify(SessionEvent::Rejected { surface_id, reason });
            }
            Decision::Ignored => {}
        }

        decision
    }

    /// Place one card on every accepted surface.
    ///
    /// Cards from a previous scatter are removed first. A renderer failure
    /// on one surface does not stop the others.
    pub fn scatter(&mut self) -> SessionResult<PlacementReport> {
        let required = self.config.scatter_minimum();
        let accepted = self.registry.len();
        if accepted < required {
            log::warn!(
                "Scatter refused: {} surfaces accepted, {} required",
                accepted,
                required
            );
            return Err(SessionError::NoSurfacesAvailable { accepted, required });
        }

        if !self.placed.is_empty() {
            self.clear();
        }

        let objects: Vec<PlacedObject> = self
            .registry
            .accepted()
            .iter()
            .map(|surface| PlacedObject::on_surface(surface, self.config.card_offset))
            .collect();

        let mut report = PlacementReport::default();
        for object in objects {
            match self.renderer.place_object(&object) {
                Ok(()) => {
                    self.placed.push(object.clone());
                    self.notify(SessionEvent::PlacementIssued(object.clone()));
                    report.placed.push(object);
                }
                Err(error) => {
                    log::warn!("{}", error);
                    let failure = PlacementFailure { object, error };
                    self.notify(SessionEvent::PlacementFailed(failure.clone()));
                    report.failed.push(failure);
                }
            }
        }

        log::info!(
            "Scattered {} cards ({} failed)",
            report.placed.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Remove every placed card. Accepted surfaces are kept.
    pub fn clear(&mut self) {
        self.renderer.remove_all_objects();
        self.placed.clear();
    }

    /// Forget accepted surfaces and placed cards, reopening the registry.
    ///
    /// A scanning session re-enables tracking, which was halted if the
    /// target had been reached.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.renderer.hide_all_surfaces();
        self.clear();
        if self.registry.is_active() {
            self.provider.enable_tracking(self.config.alignments);
        }
        log::info!("Session reset");
    }

    pub fn status(&self) -> ScanStatus {
        let found = self.registry.len();
        let target = self.registry.capacity();
        if self.registry.is_closed() {
            ScanStatus::TargetReached { target }
        } else if self.registry.is_active() {
            ScanStatus::Scanning { found, target }
        } else if found > 0 {
            ScanStatus::Paused { found, target }
        } else {
            ScanStatus::Idle
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.registry.is_active() && !self.registry.is_closed()
    }

    /// Accepted surfaces in acceptance order
    pub fn accepted(&self) -> &[SurfaceRecord] {
        self.registry.accepted()
    }

    pub fn registry(&self) -> &AcceptanceRegistry {
        &self.registry
    }

    /// Cards currently placed
    pub fn placed(&self) -> &[PlacedObject] {
        &self.placed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

}
