//! Host element abstraction
//!
//! A tracker only needs four things from the element it decorates. The
//! browser binding implements them on a DOM element; [`MemorySurface`]
//! implements them in memory for the replay tool, the native driver and
//! tests.

use crate::geometry::Rect;
use std::collections::{BTreeMap, BTreeSet};

/// One aura target element
pub trait AuraSurface {
    /// Current bounding rectangle in viewport coordinates
    ///
    /// Best effort: a detached element may report a zero rect, and `None`
    /// means geometry could not be read at all.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Write a custom style property such as `--x: 12px`
    fn set_style_var(&mut self, name: &str, value: &str);

    /// Add or remove a class marker
    fn set_class(&mut self, class: &str, enabled: bool);

    /// Whether `other` refers to the same underlying element
    fn same_element(&self, other: &Self) -> bool;
}

/// In-memory element with a key, a rect, style variables and classes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySurface {
    key: String,
    rect: Option<Rect>,
    style: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

impl MemorySurface {
    pub fn new(key: impl Into<String>, rect: Rect) -> Self {
        Self {
            key: key.into(),
            rect: Some(rect),
            ..Self::default()
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Move or resize the element; `None` simulates detached geometry
    pub fn set_rect(&mut self, rect: Option<Rect>) {
        self.rect = rect;
    }

    pub fn style_var(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl AuraSurface for MemorySurface {
    fn bounding_rect(&self) -> Option<Rect> {
        self.rect
    }

    fn set_style_var(&mut self, name: &str, value: &str) {
        self.style.insert(name.to_string(), value.to_string());
    }

    fn set_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    fn same_element(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// Format a pixel offset for a style variable
pub fn px(value: f64) -> String {
    format!("{}px", value)
}
