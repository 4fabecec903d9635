//! Language and mobile navigation toggles
//!
//! Either control may be missing from the page; that only disables its own
//! behavior.

use crate::config::{LanguageConfig, NavConfig};
use crate::locale::{render_language, BilingualLabel, LanguagePage, LanguageState, Locale};
use crate::nav::{is_nav_link, NavState};
use crate::web::dom::query_html_elements;
use gloo::events::EventListener;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

fn blur(element: &HtmlElement) {
    let _ = element.blur();
}

/// Keep pointer and touch interactions from leaving the control focused
fn blur_on_release(element: &HtmlElement) -> Vec<EventListener> {
    ["pointerup", "touchend"]
        .into_iter()
        .map(|name| {
            let target = element.clone();
            EventListener::new(element, name, move |_| blur(&target))
        })
        .collect()
}

pub struct LanguageToggle {
    state: Cell<LanguageState>,
    blocks: Vec<HtmlElement>,
    links: Vec<HtmlElement>,
    page: LanguagePage,
    toggle: Option<HtmlElement>,
    listeners: RefCell<Vec<EventListener>>,
}

impl LanguageToggle {
    pub fn install(document: &Document, config: &LanguageConfig, host_locale: &str) -> Rc<Self> {
        let blocks = query_html_elements(document, &config.block_selector);
        let links = query_html_elements(document, &config.nav_link_selector);
        let toggle = document
            .get_element_by_id(&config.toggle_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let page = LanguagePage {
            blocks: blocks
                .iter()
                .map(|block| Locale::of_block(&block.class_name()))
                .collect(),
            nav_labels: links
                .iter()
                .map(|link| BilingualLabel::from_attributes(|name| link.get_attribute(name)))
                .collect(),
            has_toggle: toggle.is_some(),
        };

        let control = Rc::new(Self {
            state: Cell::new(LanguageState::from_host(host_locale)),
            blocks,
            links,
            page,
            toggle,
            listeners: RefCell::new(Vec::new()),
        });
        control.apply();

        if let Some(toggle) = &control.toggle {
            let this = Rc::downgrade(&control);
            let target = toggle.clone();
            let mut listeners = vec![EventListener::new(toggle, "click", move |_| {
                if let Some(this) = this.upgrade() {
                    let mut state = this.state.get();
                    state.toggle();
                    this.state.set(state);
                    this.apply();
                }
                blur(&target);
            })];
            listeners.extend(blur_on_release(toggle));
            *control.listeners.borrow_mut() = listeners;
        } else {
            tracing::debug!("No #{} control, language toggle disabled", config.toggle_id);
        }
        control
    }

    fn apply(&self) {
        let view = render_language(self.state.get(), &self.page);

        for (block, visible) in self.blocks.iter().zip(&view.block_visible) {
            let style = block.style();
            let _ = if *visible {
                style.remove_property("display").map(|_| ())
            } else {
                style.set_property("display", "none")
            };
        }

        for (link, label) in self.links.iter().zip(&view.nav_labels) {
            if let Some(label) = label {
                link.set_text_content(Some(label.as_str()));
            }
        }

        if let (Some(toggle), Some(toggle_view)) = (&self.toggle, &view.toggle) {
            toggle.set_text_content(Some(toggle_view.label));
            let _ = toggle.set_attribute("aria-label", toggle_view.aria_label);
            let _ = toggle.set_attribute("aria-pressed", toggle_view.aria_pressed);
        }
    }
}

pub struct NavToggle {
    state: Cell<NavState>,
    toggle: HtmlElement,
    header: Element,
    body: Option<HtmlElement>,
    open_class: String,
    listeners: RefCell<Vec<EventListener>>,
}

impl NavToggle {
    /// Returns `None` when the toggle button or header is missing
    pub fn install(document: &Document, config: &NavConfig) -> Option<Rc<Self>> {
        let toggle = document
            .get_element_by_id(&config.toggle_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        let header = document.query_selector(&config.header_selector).ok().flatten();
        let (Some(toggle), Some(header)) = (toggle, header) else {
            tracing::debug!("Nav toggle or header missing, mobile nav disabled");
            return None;
        };

        let control = Rc::new(Self {
            state: Cell::new(NavState::default()),
            toggle,
            header,
            body: document.body(),
            open_class: config.open_class.clone(),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        let this = Rc::downgrade(&control);
        listeners.push(EventListener::new(&control.toggle, "click", move |_| {
            if let Some(this) = this.upgrade() {
                let mut state = this.state.get();
                state.toggle();
                this.state.set(state);
                this.apply();
            }
        }));

        if let Ok(Some(nav)) = document.query_selector(&config.nav_selector) {
            let this = Rc::downgrade(&control);
            listeners.push(EventListener::new(&nav, "click", move |event: &Event| {
                let is_link = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .is_some_and(|element| is_nav_link(&element.tag_name()));
                if !is_link {
                    return;
                }
                if let Some(this) = this.upgrade() {
                    let mut state = this.state.get();
                    state.close();
                    this.state.set(state);
                    this.apply();
                    blur(&this.toggle);
                }
            }));
        }

        listeners.extend(blur_on_release(&control.toggle));
        *control.listeners.borrow_mut() = listeners;
        Some(control)
    }

    fn apply(&self) {
        let view = self.state.get().view();
        let _ = self
            .header
            .class_list()
            .toggle_with_force(&self.open_class, view.open_class);
        if let Some(body) = &self.body {
            let _ = body
                .class_list()
                .toggle_with_force(&self.open_class, view.open_class);
        }
        let _ = self.toggle.set_attribute("aria-expanded", view.aria_expanded);
    }
}
