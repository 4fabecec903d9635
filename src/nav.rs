//! Mobile navigation panel toggle

/// Open/closed state of the mobile navigation panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    pub open: bool,
}

/// How the page reflects a [`NavState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavView {
    /// Whether the open class is applied to the header and the page body
    pub open_class: bool,
    pub aria_expanded: &'static str,
}

impl NavState {
    /// Flip the panel, returning the new open state
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close the panel after a navigation link is followed
    ///
    /// Returns whether anything changed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn view(&self) -> NavView {
        NavView {
            open_class: self.open,
            aria_expanded: if self.open { "true" } else { "false" },
        }
    }
}

/// Whether a click on an element with this tag name follows a nav link
///
/// Clicks elsewhere inside the nav leave the panel as it is.
pub fn is_nav_link(tag_name: &str) -> bool {
    tag_name.eq_ignore_ascii_case("a")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut nav = NavState::default();
        assert!(nav.toggle());
        assert_eq!(nav.view().aria_expanded, "true");
        assert!(!nav.toggle());
        assert_eq!(
            nav.view(),
            NavView {
                open_class: false,
                aria_expanded: "false"
            }
        );
    }

    #[test]
    fn test_link_click_closes() {
        let mut nav = NavState::default();
        nav.toggle();
        assert!(nav.close());
        assert!(!nav.open);
        assert!(!nav.close());
    }

    #[test]
    fn test_only_anchors_close_the_panel() {
        assert!(is_nav_link("A"));
        assert!(is_nav_link("a"));
        assert!(!is_nav_link("SPAN"));
        assert!(!is_nav_link("BUTTON"));
        assert!(!is_nav_link("ABBR"));
        assert!(!is_nav_link(""));
    }
}
