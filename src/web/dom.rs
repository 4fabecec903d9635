//! DOM element surface and event conversion

use crate::aura::AuraSurface;
use crate::geometry::Rect;
use crate::input::{InputEvent, InputKind, TouchPoint};
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, MouseEvent, TouchEvent};

/// An aura target backed by a DOM element
#[derive(Debug, Clone)]
pub struct DomSurface {
    element: HtmlElement,
}

impl DomSurface {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl AuraSurface for DomSurface {
    fn bounding_rect(&self) -> Option<Rect> {
        // A detached element reports a zero rect, which is still usable.
        let rect = self.element.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn set_style_var(&mut self, name: &str, value: &str) {
        if let Err(e) = self.element.style().set_property(name, value) {
            tracing::debug!("Failed to set {}: {:?}", name, e);
        }
    }

    fn set_class(&mut self, class: &str, enabled: bool) {
        let _ = self.element.class_list().toggle_with_force(class, enabled);
    }

    fn same_element(&self, other: &Self) -> bool {
        self.element.is_same_node(Some(other.element.as_ref()))
    }
}

/// Convert a DOM mouse or touch event into an [`InputEvent`]
pub fn input_from_event(kind: InputKind, event: &Event) -> InputEvent {
    if let Some(event) = event.dyn_ref::<TouchEvent>() {
        let list = event.touches();
        let touches = (0..list.length())
            .filter_map(|index| list.item(index))
            .map(|touch| TouchPoint {
                client_x: touch.client_x() as f64,
                client_y: touch.client_y() as f64,
            })
            .collect();
        return InputEvent::touch(kind, touches);
    }

    if let Some(event) = event.dyn_ref::<MouseEvent>() {
        return InputEvent::pointer(kind, event.client_x() as f64, event.client_y() as f64);
    }

    InputEvent::bare(kind)
}

/// Collect the `HtmlElement`s matching a selector, skipping anything else
pub fn query_html_elements(document: &web_sys::Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        tracing::warn!("Invalid selector '{}'", selector);
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::MouseEventInit;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_mouse_event_carries_client_position() {
        let init = MouseEventInit::new();
        init.set_client_x(120);
        init.set_client_y(45);
        let event = MouseEvent::new_with_mouse_event_init_dict("mousemove", &init).unwrap();

        let input = input_from_event(InputKind::PointerMove, &event);
        assert_eq!(input.kind, InputKind::PointerMove);
        assert_eq!(input.client_x, Some(120.0));
        assert_eq!(input.client_y, Some(45.0));
        assert!(input.touches.is_empty());
    }

    #[wasm_bindgen_test]
    fn test_touch_event_without_touches() {
        // Desktop browsers without touch support have no TouchEvent constructor.
        let Ok(event) = TouchEvent::new("touchend") else {
            return;
        };

        let input = input_from_event(InputKind::TouchEnd, &event);
        assert_eq!(input.kind, InputKind::TouchEnd);
        assert!(input.touches.is_empty());
        assert_eq!(input.client_x, None);
        assert!(crate::input::normalize(&input).is_none());
    }

    #[wasm_bindgen_test]
    fn test_plain_event_has_no_position() {
        let event = Event::new("mouseleave").unwrap();
        let input = input_from_event(InputKind::PointerLeave, &event);
        assert_eq!(input, InputEvent::bare(InputKind::PointerLeave));
    }

    #[wasm_bindgen_test]
    fn test_surface_publishes_style_and_class() {
        let document = web_sys::window().unwrap().document().unwrap();
        let element = document
            .create_element("div")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        let mut surface = DomSurface::new(element.clone());

        surface.set_style_var("--x", "12px");
        surface.set_class("is-hovered", true);
        assert_eq!(element.style().get_property_value("--x").unwrap(), "12px");
        assert!(element.class_list().contains("is-hovered"));

        surface.set_class("is-hovered", false);
        assert!(!element.class_list().contains("is-hovered"));
        assert!(surface.same_element(&DomSurface::new(element)));
    }
}
