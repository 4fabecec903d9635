//! Tracker registration and frame dispatch
//!
//! [`AuraRuntime`] owns one [`Tracker`] per discovered element together with
//! the frame queue they share. Trackers never see each other: input for one
//! id and frames for one id only ever touch that tracker's state.

use crate::aura::surface::AuraSurface;
use crate::aura::tracker::{FrameOutcome, Tracker, TrackerId, TrackerSettings};
use crate::input::InputEvent;
use crate::scheduler::FrameQueue;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Summary of one runtime tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Frames that advanced a tracker
    pub stepped: usize,
    /// Trackers that reached tolerance this tick
    pub settled: usize,
}

pub struct AuraRuntime<S> {
    settings: Arc<TrackerSettings>,
    trackers: BTreeMap<TrackerId, Tracker<S>>,
    queue: FrameQueue,
    next_id: u64,
}

impl<S: AuraSurface> AuraRuntime<S> {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            trackers: BTreeMap::new(),
            queue: FrameQueue::new(),
            next_id: 0,
        }
    }

    /// Register one element, returning the existing id if it is already tracked
    pub fn register(&mut self, surface: S) -> TrackerId {
        if let Some(existing) = self
            .trackers
            .values()
            .find(|tracker| tracker.surface().same_element(&surface))
        {
            tracing::debug!("{} already registered", existing.id());
            return existing.id();
        }

        let id = TrackerId::new(self.next_id);
        self.next_id += 1;
        self.trackers
            .insert(id, Tracker::new(id, surface, self.settings.clone()));
        id
    }

    /// Register every discovered element; an empty set is valid
    pub fn register_all(&mut self, surfaces: impl IntoIterator<Item = S>) -> Vec<TrackerId> {
        let ids: Vec<TrackerId> = surfaces
            .into_iter()
            .map(|surface| self.register(surface))
            .collect();

        tracing::info!(
            "Aura registration complete ({} elements, {} trackers)",
            ids.len(),
            self.trackers.len()
        );
        ids
    }

    /// Deliver an input event to one tracker
    ///
    /// Returns whether the tracker's target moved. Unknown ids are ignored.
    pub fn dispatch(&mut self, id: TrackerId, event: &InputEvent) -> bool {
        match self.trackers.get_mut(&id) {
            Some(tracker) => tracker.handle(event, &mut self.queue),
            None => {
                tracing::debug!("Dropping {:?} for unknown tracker {}", event.kind, id);
                false
            }
        }
    }

    /// Run every frame that was due before this tick began
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        for (handle, id) in self.queue.take_due() {
            let Some(tracker) = self.trackers.get_mut(&id) else {
                continue;
            };
            match tracker.run_frame(handle, &mut self.queue) {
                FrameOutcome::Rescheduled => report.stepped += 1,
                FrameOutcome::Settled => {
                    report.stepped += 1;
                    report.settled += 1;
                }
                FrameOutcome::Stale => {}
            }
        }

        if report.stepped > 0 {
            tracing::trace!(
                "Aura tick: stepped={}, settled={}, pending={}",
                report.stepped,
                report.settled,
                self.queue.len()
            );
        }
        report
    }

    /// Dispose of a tracker, cancelling its pending frame
    ///
    /// Returns the element so the host can detach its listeners.
    pub fn unregister(&mut self, id: TrackerId) -> Option<S> {
        let Some(mut tracker) = self.trackers.remove(&id) else {
            tracing::debug!("Cannot unregister unknown tracker {}", id);
            return None;
        };
        tracker.dispose(&mut self.queue);

        tracing::info!("Unregistered {}", id);
        Some(tracker.into_surface())
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending_frames_for(&self, id: TrackerId) -> usize {
        self.queue.pending_for(id)
    }

    pub fn tracker(&self, id: TrackerId) -> Option<&Tracker<S>> {
        self.trackers.get(&id)
    }

    pub fn tracker_mut(&mut self, id: TrackerId) -> Option<&mut Tracker<S>> {
        self.trackers.get_mut(&id)
    }

    pub fn trackers(&self) -> impl Iterator<Item = &Tracker<S>> {
        self.trackers.values()
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
