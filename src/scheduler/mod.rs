//! Frame scheduling
//!
//! Trackers never loop on their own: they ask a [`FrameScheduler`] for the
//! next frame and are stepped when it arrives. [`FrameQueue`] is the
//! cooperative implementation shared by the browser pump, the native
//! driver and the replay tool.

#[cfg(not(target_arch = "wasm32"))]
pub mod driver;

#[cfg(not(target_arch = "wasm32"))]
pub use driver::FrameDriver;

use crate::aura::tracker::TrackerId;
use std::collections::BTreeMap;

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// Something that can run a tracker's step on the next animation frame
pub trait FrameScheduler {
    /// Request one step for `tracker` on the next frame
    fn schedule_next_frame(&mut self, tracker: TrackerId) -> FrameHandle;

    /// Drop a pending request. Unknown or already-run handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Pending frame requests in scheduling order
///
/// Requests made while a batch is running land in the next batch, matching
/// animation-frame semantics where a callback that reschedules itself runs
/// again on the following frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_handle: u64,
    pending: BTreeMap<FrameHandle, TrackerId>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every request due on this frame
    pub fn take_due(&mut self) -> Vec<(FrameHandle, TrackerId)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Number of pending requests for one tracker
    pub fn pending_for(&self, tracker: TrackerId) -> usize {
        self.pending.values().filter(|id| **id == tracker).count()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_next_frame(&mut self, tracker: TrackerId) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(handle, tracker);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}
