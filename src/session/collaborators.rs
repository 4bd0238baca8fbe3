//! Seams to the AR engine
//!
//! The session never talks to a rendering or tracking engine directly. Hosts
//! implement these traits over ARKit/RealityKit, ARCore, OpenXR or a test
//! double.

use crate::error::{Rejection, RendererError};
use crate::settings::AlignmentFilter;
use crate::surface::{PlacedObject, SurfaceId, SurfaceRecord};

/// Scene renderer commands issued by the session
pub trait SceneRenderer {
    /// Visualize a newly accepted surface
    fn show_surface(&mut self, surface: &SurfaceRecord);

    /// An accepted surface changed extents or pose
    fn refresh_surface(&mut self, _surface: &SurfaceRecord) {}

    /// An accepted surface is gone
    fn hide_surface(&mut self, _id: SurfaceId) {}

    /// Drop every surface visualization
    fn hide_all_surfaces(&mut self) {}

    /// Materialize one card. Failures are reported per object.
    fn place_object(&mut self, object: &PlacedObject) -> Result<(), RendererError>;

    /// Remove every placed card
    fn remove_all_objects(&mut self);
}

/// Surface tracking provider commands issued by the session
pub trait TrackingProvider {
    /// Start emitting surface events for the given alignments
    fn enable_tracking(&mut self, alignments: AlignmentFilter);

    /// Stop emitting surface events (user stop)
    fn disable_tracking(&mut self);

    /// Stop surface detection because the target count was reached
    fn halt_tracking(&mut self) {
        self.disable_tracking();
    }
}

/// Notifications for UI and other listeners
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Accepted(SurfaceRecord),
    Rejected { surface_id: SurfaceId, reason: Rejection },
    Removed(SurfaceId),
    /// Target surface count reached, detection halted
    TargetReached { count: usize },
    PlacementIssued(PlacedObject),
    PlacementFailed(PlacementFailure),
}

/// A card the renderer could not place
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementFailure {
    pub object: PlacedObject,
    pub error: RendererError,
}

/// Listener for session notifications
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent),
{
    fn on_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}

/// Renderer that only logs, for hosts without a scene
#[derive(Debug, Default)]
pub struct LogRenderer {
    placed: usize,
}

impl LogRenderer {
    pub fn placed(&self) -> usize {
        self.placed
    }
}

impl SceneRenderer for LogRenderer {
    fn show_surface(&mut self, surface: &SurfaceRecord) {
        log::info!(
            "Showing surface {} at ({:.2}, {:.2}, {:.2})",
            surface.id,
            surface.position.x,
            surface.position.y,
            surface.position.z
        );
    }

    fn hide_surface(&mut self, id: SurfaceId) {
        log::info!("Hiding surface {}", id);
    }

    fn place_object(&mut self, object: &PlacedObject) -> Result<(), RendererError> {
        self.placed += 1;
        log::info!(
            "Card on surface {} at ({:.2}, {:.2}, {:.2})",
            object.surface_id,
            object.position.x,
            object.position.y,
            object.position.z
        );
        Ok(())
    }

    fn remove_all_objects(&mut self) {
        if self.placed > 0 {
            log::info!("Removing {} cards", self.placed);
        }
        self.placed = 0;
    }
}

/// Tracking provider that only logs
#[derive(Debug, Default)]
pub struct LogProvider {
    enabled: bool,
}

impl LogProvider {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl TrackingProvider for LogProvider {
    fn enable_tracking(&mut self, alignments: AlignmentFilter) {
        self.enabled = true;
        log::info!("Surface tracking enabled ({:?})", alignments);
    }

    fn disable_tracking(&mut self) {
        self.enabled = false;
        log::info!("Surface tracking disabled");
    }

    fn halt_tracking(&mut self) {
        self.enabled = false;
        log::info!("Surface tracking halted, target reached");
    }
}

/// Recording doubles for session tests
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum RenderCall {
        Show(SurfaceId),
        Refresh(SurfaceId),
        Hide(SurfaceId),
        HideAll,
        Place(SurfaceId),
        RemoveAll,
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingRenderer {
        pub calls: Vec<RenderCall>,
        /// Surfaces whose placement fails
        pub failing: HashSet<SurfaceId>,
    }

    impl RecordingRenderer {
        pub(crate) fn placements(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, RenderCall::Place(_)))
                .count()
        }
    }

    impl SceneRenderer for RecordingRenderer {
        fn show_surface(&mut self, surface: &SurfaceRecord) {
            self.calls.push(RenderCall::Show(surface.id));
        }

        fn refresh_surface(&mut self, surface: &SurfaceRecord) {
            self.calls.push(RenderCall::Refresh(surface.id));
        }

        fn hide_surface(&mut self, id: SurfaceId) {
            self.calls.push(RenderCall::Hide(id));
        }

        fn hide_all_surfaces(&mut self) {
            self.calls.push(RenderCall::HideAll);
        }

        fn place_object(&mut self, object: &PlacedObject) -> Result<(), RendererError> {
            self.calls.push(RenderCall::Place(object.surface_id));
            if self.failing.contains(&object.surface_id) {
                return Err(RendererError::new(object.surface_id, "mesh upload failed"));
            }
            Ok(())
        }

        fn remove_all_objects(&mut self) {
            self.calls.push(RenderCall::RemoveAll);
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum TrackCall {
        Enable(AlignmentFilter),
        Disable,
        Halt,
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingProvider {
        pub calls: Vec<TrackCall>,
    }

    impl TrackingProvider for RecordingProvider {
        fn enable_tracking(&mut self, alignments: AlignmentFilter) {
            self.calls.push(TrackCall::Enable(alignments));
        }

        fn disable_tracking(&mut self) {
            self.calls.push(TrackCall::Disable);
        }

        fn halt_tracking(&mut self) {
            self.calls.push(TrackCall::Halt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_provider_tracks_enabled_state() {
        let mut provider = LogProvider::default();
        assert!(!provider.is_enabled());
        provider.enable_tracking(AlignmentFilter::Vertical);
        assert!(provider.is_enabled());
        provider.halt_tracking();
        assert!(!provider.is_enabled());
        provider.enable_tracking(AlignmentFilter::Any);
        provider.disable_tracking();
        assert!(!provider.is_enabled());
    }
}
