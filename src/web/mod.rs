//! Browser binding
//!
//! The page script calls `installSite` once after the DOM is ready. Calling
//! it again is a no-op; `disposeSite` detaches everything.

pub mod aura;
pub mod controls;
pub mod dom;

use crate::aura::TrackerSettings;
use crate::config::SiteConfig;
use crate::web::aura::AuraPage;
use crate::web::controls::{LanguageToggle, NavToggle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

struct Installed {
    aura: Rc<AuraPage>,
    _language: Rc<LanguageToggle>,
    _nav: Option<Rc<NavToggle>>,
}

thread_local! {
    static INSTALLED: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

/// Install the aura trackers and both toggles
///
/// `config_json` is an optional JSON [`SiteConfig`]; defaults apply otherwise.
#[wasm_bindgen(js_name = installSite)]
pub fn init(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // The page may already have installed a subscriber of its own.
    let _ = tracing_wasm::try_set_as_global_default();

    if INSTALLED.with(|installed| installed.borrow().is_some()) {
        return Ok(());
    }

    let config = match config_json {
        Some(json) => {
            let config: SiteConfig =
                serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
            config
        }
        None => SiteConfig::default(),
    };
    let settings =
        TrackerSettings::from_config(&config.aura).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let host_locale = window.navigator().language().unwrap_or_default();

    let language = LanguageToggle::install(&document, &config.language, &host_locale);
    let aura = AuraPage::install(&document, &config.aura.target_selector, settings);
    let nav = NavToggle::install(&document, &config.nav);

    tracing::info!("Site behaviors installed ({} aura targets)", aura.tracker_count());
    INSTALLED.with(|installed| {
        *installed.borrow_mut() = Some(Installed {
            aura,
            _language: language,
            _nav: nav,
        });
    });
    Ok(())
}

/// Detach every listener and dispose of all trackers
#[wasm_bindgen(js_name = disposeSite)]
pub fn dispose() {
    if let Some(installed) = INSTALLED.with(|installed| installed.borrow_mut().take()) {
        installed.aura.dispose();
    }
}
