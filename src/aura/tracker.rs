//! Per-element aura tracker
//!
//! A tracker owns the smoothed position state of exactly one element. Input
//! updates `target` immediately; only [`Tracker::run_frame`] moves `current`
//! and publishes it. At most one frame is ever pending per tracker.

use crate::aura::smoothing::Smoothing;
use crate::aura::surface::{px, AuraSurface};
use crate::config::AuraConfig;
use crate::error::AuraResult;
use crate::geometry::Point;
use crate::input::{normalize, InputEvent, InputPhase};
use crate::scheduler::{FrameHandle, FrameScheduler};
use std::fmt;
use std::sync::Arc;

/// Identifies a registered tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackerId(u64);

impl TrackerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aura-{}", self.0)
    }
}

/// Hover marker state, independent of whether the loop is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Active,
}

/// Result of running one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Still outside tolerance; another frame was requested
    Rescheduled,
    /// Within tolerance; the loop stopped
    Settled,
    /// The handle was not this tracker's pending frame
    Stale,
}

/// Settings shared by all trackers of one runtime
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub smoothing: Smoothing,
    pub hover_class: String,
    pub x_var: String,
    pub y_var: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        let config = AuraConfig::default();
        Self {
            smoothing: Smoothing::default(),
            hover_class: config.hover_class,
            x_var: config.x_var,
            y_var: config.y_var,
        }
    }
}

impl TrackerSettings {
    pub fn from_config(config: &AuraConfig) -> AuraResult<Self> {
        Ok(Self {
            smoothing: Smoothing::from_config(config)?,
            hover_class: config.hover_class.clone(),
            x_var: config.x_var.clone(),
            y_var: config.y_var.clone(),
        })
    }
}

pub struct Tracker<S> {
    id: TrackerId,
    surface: S,
    settings: Arc<TrackerSettings>,
    target: Point,
    current: Point,
    loop_handle: Option<FrameHandle>,
    hover: HoverState,
}

impl<S: AuraSurface> Tracker<S> {
    pub fn new(id: TrackerId, surface: S, settings: Arc<TrackerSettings>) -> Self {
        Self {
            id,
            surface,
            settings,
            target: Point::ORIGIN,
            current: Point::ORIGIN,
            loop_handle: None,
            hover: HoverState::Idle,
        }
    }

    /// React to a raw input event according to its phase
    ///
    /// Returns whether the target position was updated.
    pub fn handle(&mut self, event: &InputEvent, scheduler: &mut impl FrameScheduler) -> bool {
        match event.kind.phase() {
            InputPhase::Enter => self.on_enter(event, scheduler),
            InputPhase::Move => self.on_move(event, scheduler),
            InputPhase::Leave => {
                self.on_leave();
                false
            }
        }
    }

    /// Pointer enter or touch start: mark hovered, then track like a move
    pub fn on_enter(&mut self, event: &InputEvent, scheduler: &mut impl FrameScheduler) -> bool {
        self.hover = HoverState::Active;
        self.surface.set_class(&self.settings.hover_class, true);
        self.on_move(event, scheduler)
    }

    /// Pointer or touch move: retarget and make sure a frame is pending
    pub fn on_move(&mut self, event: &InputEvent, scheduler: &mut impl FrameScheduler) -> bool {
        let Some(point) = normalize(event) else {
            tracing::debug!("{}: ignoring {:?} without coordinates", self.id, event.kind);
            return false;
        };

        // Layout can shift between events, so geometry is never cached.
        let Some(rect) = self.surface.bounding_rect() else {
            tracing::debug!("{}: no geometry, keeping previous target", self.id);
            return false;
        };

        let local = rect.to_local(point);
        if !local.is_finite() {
            tracing::debug!("{}: non-finite geometry {:?}", self.id, rect);
            return false;
        }

        self.target = local;
        if self.loop_handle.is_none() {
            self.loop_handle = Some(scheduler.schedule_next_frame(self.id));
        }
        true
    }

    /// Pointer leave or touch end
    ///
    /// Only the hover marker changes; a pending loop keeps easing toward the
    /// last target and stops on its own.
    pub fn on_leave(&mut self) {
        self.hover = HoverState::Idle;
        self.surface.set_class(&self.settings.hover_class, false);
    }

    /// Advance one frame and publish the smoothed position
    pub fn run_frame(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut impl FrameScheduler,
    ) -> FrameOutcome {
        if self.loop_handle != Some(handle) {
            return FrameOutcome::Stale;
        }
        self.loop_handle = None;

        let smoothing = self.settings.smoothing;
        self.current = smoothing.step(self.current, self.target);
        self.publish();

        if smoothing.is_settled(self.current, self.target) {
            tracing::trace!("{}: settled at {:?}", self.id, self.current);
            FrameOutcome::Settled
        } else {
            self.loop_handle = Some(scheduler.schedule_next_frame(self.id));
            FrameOutcome::Rescheduled
        }
    }

    /// Cancel any pending frame and clear the hover marker
    pub fn dispose(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(handle) = self.loop_handle.take() {
            scheduler.cancel_frame(handle);
        }
        self.on_leave();
    }

    fn publish(&mut self) {
        let (x, y) = (px(self.current.x), px(self.current.y));
        self.surface.set_style_var(&self.settings.x_var, &x);
        self.surface.set_style_var(&self.settings.y_var, &y);
    }

    pub fn id(&self) -> TrackerId {
        self.id
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn is_pending(&self) -> bool {
        self.loop_handle.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
