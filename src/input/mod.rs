//! Pointer and touch input
//!
//! Raw host events are described by [`InputEvent`] and reduced to a single
//! viewport coordinate by [`normalize`] before they reach a tracker.

pub mod normalize;
pub mod types;

pub use normalize::normalize;
pub use types::{InputEvent, InputKind, InputPhase, TouchPoint};
