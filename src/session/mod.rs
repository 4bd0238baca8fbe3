//! Placement session
//!
//! Drives the acceptance core from tracking events and user commands and
//! issues commands to the AR engine through the collaborator traits.

pub mod collaborators;
pub mod controller;
pub mod handle;

pub use collaborators::{
    LogProvider, LogRenderer, PlacementFailure, SceneRenderer, SessionEvent, SessionObserver,
    TrackingProvider,
};
pub use controller::{PlacementReport, PlacementSession, ScanStatus};
pub use handle::{SessionHandle, Snapshot};
