//! Two-locale content toggle
//!
//! The displayed language is an explicit [`LanguageState`]; what the page
//! should look like for that state is computed by [`render_language`] so
//! hosts only have to apply the resulting [`LanguageView`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Pick the initial locale from a host language tag such as `fr-CA`
    pub fn from_host(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("fr") {
            Locale::Fr
        } else {
            Locale::En
        }
    }

    /// Locale of a tagged content block from its class attribute
    ///
    /// A block is French when it carries the `fr` class, English otherwise.
    pub fn of_block(class_name: &str) -> Self {
        if class_name.split_ascii_whitespace().any(|class| class == "fr") {
            Locale::Fr
        } else {
            Locale::En
        }
    }

    /// Data attribute holding a nav link's label in this locale
    pub fn label_attribute(self) -> &'static str {
        match self {
            Locale::En => "data-en",
            Locale::Fr => "data-fr",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Locale::En => Locale::Fr,
            Locale::Fr => Locale::En,
        }
    }

    /// Short label shown on the toggle control
    pub fn label(self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Fr => "FR",
        }
    }

    /// Accessible name for a control that switches to this locale
    pub fn switch_prompt(self) -> &'static str {
        match self {
            Locale::En => "Switch to English",
            Locale::Fr => "Passer en français",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageState {
    pub locale: Locale,
}

impl LanguageState {
    pub fn from_host(tag: &str) -> Self {
        Self {
            locale: Locale::from_host(tag),
        }
    }

    pub fn toggle(&mut self) -> Locale {
        self.locale = self.locale.other();
        self.locale
    }

    pub fn is_french(&self) -> bool {
        self.locale == Locale::Fr
    }
}

/// A navigation link with its label in both locales
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BilingualLabel {
    pub en: Option<String>,
    pub fr: Option<String>,
}

impl BilingualLabel {
    pub fn new(en: impl Into<String>, fr: impl Into<String>) -> Self {
        Self {
            en: Some(en.into()),
            fr: Some(fr.into()),
        }
    }

    /// Read both labels through an attribute lookup on the link
    pub fn from_attributes(mut attribute: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            en: attribute(Locale::En.label_attribute()),
            fr: attribute(Locale::Fr.label_attribute()),
        }
    }

    /// Label for `locale`, if the link carries one
    pub fn get(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => self.en.as_deref(),
            Locale::Fr => self.fr.as_deref(),
        }
    }
}

/// What the language toggle needs to know about the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguagePage {
    /// Locale of each tagged block, in document order
    pub blocks: Vec<Locale>,
    pub nav_labels: Vec<BilingualLabel>,
    pub has_toggle: bool,
}

/// Toggle control presentation, advertising the other locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub label: &'static str,
    pub aria_label: &'static str,
    pub aria_pressed: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageView {
    /// Visibility of each tagged block, parallel to `LanguagePage::blocks`
    pub block_visible: Vec<bool>,
    /// Label per nav link; `None` when the link lacks this locale's label
    pub nav_labels: Vec<Option<String>>,
    pub toggle: Option<ToggleView>,
}

/// Compute the page presentation for a language state
pub fn render_language(state: LanguageState, page: &LanguagePage) -> LanguageView {
    let locale = state.locale;
    let other = locale.other();

    LanguageView {
        block_visible: page.blocks.iter().map(|block| *block == locale).collect(),
        nav_labels: page
            .nav_labels
            .iter()
            .map(|label| label.get(locale).map(str::to_string))
            .collect(),
        toggle: page.has_toggle.then(|| ToggleView {
            label: other.label(),
            aria_label: other.switch_prompt(),
            aria_pressed: if state.is_french() { "true" } else { "false" },
        }),
    }
}
