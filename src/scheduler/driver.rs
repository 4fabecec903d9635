//! Fixed-interval frame driver for native hosts
//!
//! Outside a browser there is no animation-frame callback, so a tokio
//! interval stands in for it. The driver owns its runtime and sleeps while no
//! tracker has a frame pending; every access through
//! [`FrameDriver::with_runtime`] wakes it again if a frame is left pending.

use crate::aura::{AuraRuntime, AuraSurface, TrackerId};
use crate::error::{AuraError, AuraResult};
use crate::input::InputEvent;
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

type SharedRuntime<S> = Arc<ParkingMutex<AuraRuntime<S>>>;

pub struct FrameDriver<S> {
    runtime: SharedRuntime<S>,
    wake: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl<S> FrameDriver<S>
where
    S: AuraSurface + Send + 'static,
{
    /// Take ownership of `runtime` and tick it every `interval` on the
    /// current tokio runtime
    pub fn spawn(runtime: AuraRuntime<S>, interval: Duration) -> AuraResult<Self> {
        if interval.is_zero() {
            return Err(AuraError::DriverInterval);
        }

        let runtime = Arc::new(ParkingMutex::new(runtime));
        let wake = Arc::new(Notify::new());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(drive(runtime.clone(), interval, wake.clone(), shutdown_rx));

        tracing::info!("Frame driver started (interval={:?})", interval);
        Ok(Self {
            runtime,
            wake,
            shutdown,
            task,
        })
    }

    /// Run `f` against the runtime, waking the driver if frames are pending
    /// afterwards
    pub fn with_runtime<R>(&self, f: impl FnOnce(&mut AuraRuntime<S>) -> R) -> R {
        let (result, pending) = {
            let mut runtime = self.runtime.lock();
            let result = f(&mut runtime);
            (result, runtime.has_pending_frames())
        };
        if pending {
            self.wake.notify_one();
        }
        result
    }

    /// Deliver input to a tracker
    pub fn dispatch(&self, id: TrackerId, event: &InputEvent) -> bool {
        self.with_runtime(|runtime| runtime.dispatch(id, event))
    }

    /// Stop the driver and return the number of ticks that stepped a tracker
    pub async fn stop(self) -> u64 {
        let _ = self.shutdown.send(true);
        let frames = self.task.await.unwrap_or_else(|e| {
            tracing::warn!("Frame driver task ended abnormally: {}", e);
            0
        });

        tracing::info!("Frame driver stopped (frames={})", frames);
        frames
    }
}

async fn drive<S: AuraSurface>(
    runtime: SharedRuntime<S>,
    interval: Duration,
    wake: Arc<Notify>,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = 0u64;

    loop {
        let idle = !runtime.lock().has_pending_frames();
        if idle {
            tokio::select! {
                _ = wake.notified() => ticker.reset(),
                _ = shutdown.changed() => break,
            }
        }

        tokio::select! {
            _ = ticker.tick() => {
                let report = runtime.lock().tick();
                if report.stepped > 0 {
                    frames += 1;
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aura::{MemorySurface, TrackerSettings};
    use crate::geometry::{Point, Rect};
    use crate::input::InputKind;

    fn runtime_with_card() -> (AuraRuntime<MemorySurface>, TrackerId) {
        let mut runtime = AuraRuntime::new(TrackerSettings::default());
        let id = runtime.register(MemorySurface::new("card", Rect::new(10.0, 10.0, 200.0, 200.0)));
        (runtime, id)
    }

    fn assert_settled_at(driver: &FrameDriver<MemorySurface>, id: TrackerId, target: Point) {
        driver.with_runtime(|runtime| {
            let tracker = runtime.tracker(id).unwrap();
            assert!(!tracker.is_pending());
            assert!(tracker.current().manhattan_distance(target) <= 0.3);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_settles_tracker() {
        let (runtime, id) = runtime_with_card();
        let driver = FrameDriver::spawn(runtime, Duration::from_millis(16)).unwrap();

        assert!(driver.dispatch(id, &InputEvent::pointer(InputKind::PointerEnter, 110.0, 10.0)));
        tokio::time::sleep(Duration::from_millis(16 * 60)).await;

        assert_settled_at(&driver, id, Point::new(100.0, 0.0));
        assert_eq!(driver.stop().await, 34);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_runtime_access_wakes_idle_driver() {
        let (runtime, id) = runtime_with_card();
        let driver = FrameDriver::spawn(runtime, Duration::from_millis(16)).unwrap();

        // Let the driver go idle before any input arrives.
        tokio::time::sleep(Duration::from_millis(100)).await;
        driver.with_runtime(|runtime| {
            runtime.dispatch(id, &InputEvent::pointer(InputKind::PointerEnter, 110.0, 10.0))
        });
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_settled_at(&driver, id, Point::new(100.0, 0.0));
        assert_eq!(driver.stop().await, 34);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_driver_does_not_tick() {
        let (runtime, _) = runtime_with_card();
        let driver = FrameDriver::spawn(runtime, Duration::from_millis(16)).unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(driver.stop().await, 0);
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let (runtime, _) = runtime_with_card();
        assert!(matches!(
            FrameDriver::spawn(runtime, Duration::ZERO),
            Err(AuraError::DriverInterval)
        ));
    }
}
