//! Cursor aura tracking
//!
//! Each registered element gets its own tracker that eases a published
//! position toward the pointer with first-order exponential smoothing.

pub mod registry;
pub mod smoothing;
pub mod surface;
pub mod tracker;

pub use registry::{AuraRuntime, TickReport};
pub use smoothing::Smoothing;
pub use surface::{AuraSurface, MemorySurface};
pub use tracker::{FrameOutcome, HoverState, Tracker, TrackerId, TrackerSettings};
