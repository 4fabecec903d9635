//! Browser wiring for the aura runtime
//!
//! Listeners feed a single shared runtime; a requestAnimationFrame pump runs
//! only while some tracker has a frame pending.

use crate::aura::{AuraRuntime, TrackerId, TrackerSettings};
use crate::input::InputKind;
use crate::web::dom::{input_from_event, query_html_elements, DomSurface};
use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{request_animation_frame, AnimationFrame};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use web_sys::{Document, Event};

const EVENTS: [(&str, InputKind); 6] = [
    ("mouseenter", InputKind::PointerEnter),
    ("mousemove", InputKind::PointerMove),
    ("mouseleave", InputKind::PointerLeave),
    ("touchstart", InputKind::TouchStart),
    ("touchmove", InputKind::TouchMove),
    ("touchend", InputKind::TouchEnd),
];

pub struct AuraPage {
    runtime: RefCell<AuraRuntime<DomSurface>>,
    listeners: RefCell<HashMap<TrackerId, Vec<EventListener>>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl AuraPage {
    /// Discover targets and attach one tracker per element
    pub fn install(document: &Document, selector: &str, settings: TrackerSettings) -> Rc<Self> {
        let page = Rc::new(Self {
            runtime: RefCell::new(AuraRuntime::new(settings)),
            listeners: RefCell::new(HashMap::new()),
            frame: RefCell::new(None),
        });

        let surfaces = query_html_elements(document, selector)
            .into_iter()
            .map(DomSurface::new);
        let ids = page.runtime.borrow_mut().register_all(surfaces);

        for id in ids {
            if page.listeners.borrow().contains_key(&id) {
                continue;
            }
            let listeners = page.attach(id);
            page.listeners.borrow_mut().insert(id, listeners);
        }
        page
    }

    fn attach(self: &Rc<Self>, id: TrackerId) -> Vec<EventListener> {
        let Some(element) = self
            .runtime
            .borrow()
            .tracker(id)
            .map(|tracker| tracker.surface().element().clone())
        else {
            return Vec::new();
        };

        EVENTS
            .iter()
            .map(|&(name, kind)| {
                let page: Weak<Self> = Rc::downgrade(self);
                let options = EventListenerOptions {
                    passive: kind.is_touch(),
                    ..EventListenerOptions::default()
                };
                EventListener::new_with_options(&element, name, options, move |event: &Event| {
                    if let Some(page) = page.upgrade() {
                        page.dispatch(id, kind, event);
                    }
                })
            })
            .collect()
    }

    fn dispatch(self: &Rc<Self>, id: TrackerId, kind: InputKind, event: &Event) {
        let input = input_from_event(kind, event);
        self.runtime.borrow_mut().dispatch(id, &input);
        self.ensure_frame();
    }

    fn ensure_frame(self: &Rc<Self>) {
        if self.frame.borrow().is_some() || !self.runtime.borrow().has_pending_frames() {
            return;
        }
        let page = Rc::clone(self);
        let handle = request_animation_frame(move |_| page.run_frame());
        *self.frame.borrow_mut() = Some(handle);
    }

    /// Body of one animation frame: tick, then re-arm only if work remains
    fn run_frame(self: &Rc<Self>) {
        self.frame.borrow_mut().take();
        self.runtime.borrow_mut().tick();
        self.ensure_frame();
    }

    fn frame_requested(&self) -> bool {
        self.frame.borrow().is_some()
    }

    /// Detach listeners and dispose of every tracker
    pub fn dispose(&self) {
        let ids: Vec<TrackerId> = self.listeners.borrow_mut().drain().map(|(id, _)| id).collect();
        let mut runtime = self.runtime.borrow_mut();
        for id in ids {
            runtime.unregister(id);
        }
        self.frame.borrow_mut().take();
    }

    pub fn tracker_count(&self) -> usize {
        self.runtime.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{HtmlElement, MouseEvent, MouseEventInit};

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_target(class: &str) -> HtmlElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let element = document
            .create_element("div")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        element.set_class_name(class);
        element
            .set_attribute(
                "style",
                "position: fixed; left: 0; top: 0; width: 200px; height: 200px;",
            )
            .unwrap();
        document.body().unwrap().append_child(&element).unwrap();
        element
    }

    fn mouse(name: &str, x: i32, y: i32) -> MouseEvent {
        let init = MouseEventInit::new();
        init.set_client_x(x);
        init.set_client_y(y);
        MouseEvent::new_with_mouse_event_init_dict(name, &init).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_frame_pump_stops_once_settled() {
        let element = mount_target("aura-pump");
        let document = web_sys::window().unwrap().document().unwrap();
        let page = AuraPage::install(&document, ".aura-pump", TrackerSettings::default());
        assert_eq!(page.tracker_count(), 1);
        assert!(!page.frame_requested());

        element.dispatch_event(&mouse("mouseenter", 100, 0)).unwrap();
        assert!(element.class_list().contains("is-hovered"));
        assert!(page.frame_requested());

        let mut frames = 0;
        while page.frame_requested() && frames < 100 {
            page.run_frame();
            frames += 1;
        }

        assert_eq!(frames, 34);
        assert!(!page.frame_requested());
        assert!(!page.runtime.borrow().has_pending_frames());
        let runtime = page.runtime.borrow();
        let tracker = runtime.trackers().next().unwrap();
        assert!(tracker.current().manhattan_distance(Point::new(100.0, 0.0)) <= 0.3);
        drop(runtime);

        page.dispose();
        assert_eq!(page.tracker_count(), 0);
        assert!(!element.class_list().contains("is-hovered"));
        element.remove();
    }

    #[wasm_bindgen_test]
    fn test_dispose_cancels_pending_frame() {
        let element = mount_target("aura-dispose");
        let document = web_sys::window().unwrap().document().unwrap();
        let page = AuraPage::install(&document, ".aura-dispose", TrackerSettings::default());

        element.dispatch_event(&mouse("mousemove", 150, 20)).unwrap();
        assert!(page.frame_requested());

        page.dispose();
        assert!(!page.frame_requested());
        // Listeners are gone, so new input schedules nothing.
        element.dispatch_event(&mouse("mousemove", 10, 10)).unwrap();
        assert!(!page.frame_requested());
        element.remove();
    }
}
