//! Offline replay of scripted aura sessions
//!
//! A script lists the page's aura targets and timestamped input. Replaying it
//! at a fixed frame rate produces the published position of every tracker on
//! every frame, which makes tuning the smoothing factor possible without a
//! browser.

use crate::aura::{AuraRuntime, HoverState, MemorySurface, TrackerId, TrackerSettings};
use crate::config::SiteConfig;
use crate::error::{AuraError, AuraResult};
use crate::geometry::Rect;
use crate::input::InputEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[cfg(not(target_arch = "wasm32"))]
use crate::scheduler::FrameDriver;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

/// Hard stop for scripts that never settle
pub const DEFAULT_MAX_FRAMES: usize = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    pub elements: Vec<ReplayElement>,
    #[serde(default)]
    pub events: Vec<TimedAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayElement {
    pub key: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedAction {
    /// Time in milliseconds from replay start
    pub time_ms: f64,
    #[serde(flatten)]
    pub action: ReplayAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ReplayAction {
    /// Deliver a pointer or touch event to an element
    Input { target: String, event: InputEvent },
    /// Move or resize an element without notifying its tracker
    Relayout { target: String, rect: Rect },
    /// Remove an element from the page and dispose of its tracker
    Remove { target: String },
}

/// Published state of one tracker on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSample {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub hovered: bool,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuraFrame {
    pub frame: usize,
    pub time_ms: f64,
    pub trackers: Vec<TrackerSample>,
}

/// Replay a script at `fps`, one output entry per frame
///
/// Events due by a frame's time are applied before that frame's tick. The
/// replay ends once every event has been applied and no tracker has a frame
/// pending, or after `max_frames`.
pub fn replay(
    script: &ReplayScript,
    settings: TrackerSettings,
    fps: f64,
    max_frames: usize,
) -> AuraResult<Vec<AuraFrame>> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(AuraError::InvalidFrameRate(fps));
    }
    let frame_duration_ms = 1000.0 / fps;

    let mut runtime = AuraRuntime::new(settings);
    let mut ids = register_elements(&mut runtime, script);
    let events = sorted_events(script);

    let mut frames = Vec::new();
    let mut next_event = 0;

    for frame in 0..max_frames {
        let time_ms = frame as f64 * frame_duration_ms;

        while next_event < events.len() && events[next_event].time_ms <= time_ms {
            apply(&mut runtime, &mut ids, &events[next_event].action);
            next_event += 1;
        }

        runtime.tick();
        frames.push(AuraFrame {
            frame,
            time_ms,
            trackers: sample(&runtime),
        });

        if next_event >= events.len() && !runtime.has_pending_frames() {
            break;
        }
    }

    if next_event < events.len() || runtime.has_pending_frames() {
        tracing::warn!("Replay stopped at frame limit {} before settling", max_frames);
    }

    Ok(frames)
}

/// Play a script in real time on the native frame driver
///
/// Events are delivered at their timestamps; once the last one is applied
/// the driver runs until every tracker settles. Returns the final state of
/// each tracker.
#[cfg(not(target_arch = "wasm32"))]
pub async fn play_live(
    script: &ReplayScript,
    settings: TrackerSettings,
    interval: Duration,
) -> AuraResult<Vec<TrackerSample>> {
    let mut runtime = AuraRuntime::new(settings);
    let mut ids = register_elements(&mut runtime, script);
    let driver = FrameDriver::spawn(runtime, interval)?;

    let start = tokio::time::Instant::now();
    for timed in sorted_events(script) {
        let offset = Duration::from_secs_f64(timed.time_ms.max(0.0) / 1000.0);
        tokio::time::sleep_until(start + offset).await;
        driver.with_runtime(|runtime| apply(runtime, &mut ids, &timed.action));
    }

    for _ in 0..DEFAULT_MAX_FRAMES {
        if !driver.with_runtime(|runtime| runtime.has_pending_frames()) {
            break;
        }
        tokio::time::sleep(interval).await;
    }

    let samples = driver.with_runtime(|runtime| sample(runtime));
    let frames = driver.stop().await;
    tracing::info!(
        "Live session finished after {:?} ({} frames)",
        start.elapsed(),
        frames
    );
    Ok(samples)
}

fn register_elements(
    runtime: &mut AuraRuntime<MemorySurface>,
    script: &ReplayScript,
) -> HashMap<String, TrackerId> {
    script
        .elements
        .iter()
        .map(|element| {
            let id = runtime.register(MemorySurface::new(element.key.clone(), element.rect));
            (element.key.clone(), id)
        })
        .collect()
}

fn sorted_events(script: &ReplayScript) -> Vec<&TimedAction> {
    let mut events: Vec<&TimedAction> = script.events.iter().collect();
    events.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    events
}

fn apply(
    runtime: &mut AuraRuntime<MemorySurface>,
    ids: &mut HashMap<String, TrackerId>,
    action: &ReplayAction,
) {
    match action {
        ReplayAction::Input { target, event } => {
            if let Some(id) = lookup(ids, target) {
                runtime.dispatch(id, event);
            }
        }
        ReplayAction::Relayout { target, rect } => {
            if let Some(tracker) = lookup(ids, target).and_then(|id| runtime.tracker_mut(id)) {
                tracker.surface_mut().set_rect(Some(*rect));
            }
        }
        ReplayAction::Remove { target } => {
            if let Some(id) = ids.remove(target) {
                runtime.unregister(id);
            } else {
                tracing::warn!("Replay references unknown element '{}'", target);
            }
        }
    }
}

fn lookup(ids: &HashMap<String, TrackerId>, target: &str) -> Option<TrackerId> {
    let id = ids.get(target).copied();
    if id.is_none() {
        tracing::warn!("Replay references unknown element '{}'", target);
    }
    id
}

fn sample(runtime: &AuraRuntime<MemorySurface>) -> Vec<TrackerSample> {
    runtime
        .trackers()
        .map(|tracker| TrackerSample {
            key: tracker.surface().key().to_string(),
            x: tracker.current().x,
            y: tracker.current().y,
            hovered: tracker.hover() == HoverState::Active,
            pending: tracker.is_pending(),
        })
        .collect()
}

/// Read a JSON replay script
pub fn load_script(path: &Path) -> AuraResult<ReplayScript> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Replay a JSON script file and write the frames as JSON
///
/// Returns the number of frames written.
pub fn replay_file(
    input_file: &Path,
    output_file: &Path,
    config: &SiteConfig,
    fps: f64,
) -> AuraResult<usize> {
    let script = load_script(input_file)?;

    tracing::info!(
        "Replaying {} events over {} elements at {}fps (factor={}, tolerance={})",
        script.events.len(),
        script.elements.len(),
        fps,
        config.aura.smoothing_factor,
        config.aura.tolerance
    );

    let settings = TrackerSettings::from_config(&config.aura)?;
    let frames = replay(&script, settings, fps, DEFAULT_MAX_FRAMES)?;
    let output = serde_json::to_vec_pretty(&frames)?;
    std::fs::write(output_file, output)?;

    tracing::info!("Wrote {} frames to {}", frames.len(), output_file.display());
    Ok(frames.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputKind;

    fn element(key: &str, left: f64, top: f64) -> ReplayElement {
        ReplayElement {
            key: key.to_string(),
            rect: Rect::new(left, top, 200.0, 120.0),
        }
    }

    fn input(time_ms: f64, target: &str, event: InputEvent) -> TimedAction {
        TimedAction {
            time_ms,
            action: ReplayAction::Input {
                target: target.to_string(),
                event,
            },
        }
    }

    #[test]
    fn test_empty_script_is_one_frame() {
        let script = ReplayScript {
            elements: vec![],
            events: vec![],
        };
        let frames = replay(&script, TrackerSettings::default(), 60.0, 100).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].trackers.is_empty());
    }

    #[test]
    fn test_invalid_fps() {
        let script = ReplayScript {
            elements: vec![],
            events: vec![],
        };
        assert!(matches!(
            replay(&script, TrackerSettings::default(), 0.0, 100),
            Err(AuraError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_hover_session_settles_after_leave() {
        let script = ReplayScript {
            elements: vec![element("card", 10.0, 10.0)],
            events: vec![
                input(0.0, "card", InputEvent::pointer(InputKind::PointerEnter, 110.0, 10.0)),
                input(50.0, "card", InputEvent::bare(InputKind::PointerLeave)),
            ],
        };
        let frames = replay(&script, TrackerSettings::default(), 60.0, 1000).unwrap();

        // 100px along one axis settles in 34 frames, the first at t=0.
        assert_eq!(frames.len(), 34);
        let last = &frames.last().unwrap().trackers[0];
        assert!(!last.pending);
        assert!(!last.hovered);
        assert!((last.x - 100.0).abs() <= 0.3);
        assert!(frames[1].trackers[0].hovered);
    }

    #[test]
    fn test_relayout_applies_to_next_event() {
        let script = ReplayScript {
            elements: vec![element("card", 0.0, 0.0)],
            events: vec![
                TimedAction {
                    time_ms: 0.0,
                    action: ReplayAction::Relayout {
                        target: "card".to_string(),
                        rect: Rect::new(50.0, 50.0, 200.0, 120.0),
                    },
                },
                input(0.0, "card", InputEvent::pointer(InputKind::PointerMove, 60.0, 60.0)),
            ],
        };
        let frames = replay(&script, TrackerSettings::default(), 60.0, 1000).unwrap();
        let last = &frames.last().unwrap().trackers[0];
        assert!((last.x - 10.0).abs() + (last.y - 10.0).abs() <= 0.3);
    }

    #[test]
    fn test_remove_disposes_tracker() {
        let script = ReplayScript {
            elements: vec![element("a", 0.0, 0.0), element("b", 300.0, 0.0)],
            events: vec![
                input(0.0, "a", InputEvent::pointer(InputKind::PointerEnter, 90.0, 90.0)),
                TimedAction {
                    time_ms: 20.0,
                    action: ReplayAction::Remove {
                        target: "a".to_string(),
                    },
                },
            ],
        };
        let frames = replay(&script, TrackerSettings::default(), 60.0, 1000).unwrap();

        assert_eq!(frames[0].trackers.len(), 2);
        let last = frames.last().unwrap();
        assert_eq!(last.trackers.len(), 1);
        assert_eq!(last.trackers[0].key, "b");
        // Removal cancelled the only running loop.
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_frame_limit() {
        let script = ReplayScript {
            elements: vec![element("card", 0.0, 0.0)],
            events: vec![input(0.0, "card", InputEvent::pointer(InputKind::PointerMove, 500.0, 0.0))],
        };
        let frames = replay(&script, TrackerSettings::default(), 60.0, 5).unwrap();
        assert_eq!(frames.len(), 5);
        assert!(frames[4].trackers[0].pending);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test(start_paused = true)]
    async fn test_live_session_settles_every_tracker() {
        let script = ReplayScript {
            elements: vec![element("card", 10.0, 10.0), element("link", 300.0, 0.0)],
            events: vec![
                input(0.0, "card", InputEvent::pointer(InputKind::PointerEnter, 110.0, 10.0)),
                input(40.0, "card", InputEvent::bare(InputKind::PointerLeave)),
                input(80.0, "link", InputEvent::pointer(InputKind::PointerMove, 320.0, 20.0)),
            ],
        };

        let samples = play_live(
            &script,
            TrackerSettings::default(),
            std::time::Duration::from_millis(16),
        )
        .await
        .unwrap();

        assert_eq!(samples.len(), 2);
        let card = samples.iter().find(|s| s.key == "card").unwrap();
        assert!(!card.pending && !card.hovered);
        assert!((card.x - 100.0).abs() + card.y.abs() <= 0.3);
        let link = samples.iter().find(|s| s.key == "link").unwrap();
        assert!(!link.pending);
        assert!((link.x - 20.0).abs() + (link.y - 20.0).abs() <= 0.3);
    }

    #[test]
    fn test_replay_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("session.json");
        let output_path = dir.path().join("frames.json");
        std::fs::write(
            &input_path,
            r#"{
                "elements": [{"key": "nav", "rect": {"left": 0, "top": 0, "width": 80, "height": 30}}],
                "events": [
                    {"timeMs": 0, "action": "input", "target": "nav",
                     "event": {"kind": "touchStart", "touches": [{"clientX": 20, "clientY": 10}]}},
                    {"timeMs": 40, "action": "input", "target": "nav",
                     "event": {"kind": "touchEnd"}}
                ]
            }"#,
        )
        .unwrap();

        let written =
            replay_file(&input_path, &output_path, &SiteConfig::default(), 60.0).unwrap();

        let frames: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
        let frames = frames.as_array().unwrap();
        assert_eq!(frames.len(), written);
        assert_eq!(frames[0]["trackers"][0]["key"], "nav");
        assert_eq!(frames[0]["timeMs"], 0.0);
        assert_eq!(frames[written - 1]["trackers"][0]["pending"], false);
    }
}
