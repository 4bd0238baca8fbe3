//! Surface acceptance core
//!
//! Everything that decides which tracked planes are kept lives here. This
//! module must stay pure and deterministic:
//! - No rendering or tracking engine dependencies
//! - Ordered storage only (acceptance order, never hashed iteration)
//! - Same events in, same decisions out

pub mod filter;
pub mod placement;
pub mod record;
pub mod registry;
pub mod similarity;

pub use filter::SurfaceFilter;
pub use placement::{PlacedObject, card_orientation};
pub use record::{Alignment, SurfaceId, SurfaceRecord, TrackingEvent};
pub use registry::{AcceptanceRegistry, Decision, RegistryState};
pub use similarity::SimilarityComparator;
