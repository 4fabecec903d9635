//! Site behavior configuration
//!
//! Every field has a default matching the stock site markup, so an empty
//! JSON object (or no file at all) yields a working configuration.

use crate::aura::smoothing::{Smoothing, DEFAULT_SMOOTHING_FACTOR, DEFAULT_TOLERANCE};
use crate::error::{AuraError, AuraResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Aura tracker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuraConfig {
    /// Fraction of remaining distance closed per frame
    pub smoothing_factor: f64,
    /// Settle threshold in summed absolute-axis pixels
    pub tolerance: f64,
    /// Tick period of the native frame driver
    pub frame_interval_ms: u64,
    /// Selector for aura-eligible elements
    pub target_selector: String,
    /// Class present while an element is hovered or touched
    pub hover_class: String,
    /// Style variable receiving the horizontal offset
    pub x_var: String,
    /// Style variable receiving the vertical offset
    pub y_var: String,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            tolerance: DEFAULT_TOLERANCE,
            frame_interval_ms: 16,
            target_selector: ".project-card, header nav a, .button-toggle".to_string(),
            hover_class: "is-hovered".to_string(),
            x_var: "--x".to_string(),
            y_var: "--y".to_string(),
        }
    }
}

impl AuraConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Language toggle markup hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageConfig {
    pub toggle_id: String,
    pub block_selector: String,
    pub nav_link_selector: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            toggle_id: "lang-toggle".to_string(),
            block_selector: ".lang".to_string(),
            nav_link_selector: "nav a".to_string(),
        }
    }
}

/// Mobile navigation markup hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavConfig {
    pub toggle_id: String,
    pub header_selector: String,
    pub nav_selector: String,
    pub open_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle_id: "nav-toggle".to_string(),
            header_selector: "header".to_string(),
            nav_selector: "header nav".to_string(),
            open_class: "nav-open".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub aura: AuraConfig,
    pub language: LanguageConfig,
    pub nav: NavConfig,
}

impl SiteConfig {
    /// Load and validate a JSON configuration file
    pub fn load(path: &Path) -> AuraResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SiteConfig = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!("Loaded site configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> AuraResult<()> {
        Smoothing::from_config(&self.aura)?;

        if self.aura.frame_interval_ms == 0 {
            return Err(AuraError::InvalidConfig(
                "frameIntervalMs must be at least 1".to_string(),
            ));
        }
        if self.aura.target_selector.trim().is_empty() {
            return Err(AuraError::InvalidConfig(
                "target selector must not be empty".to_string(),
            ));
        }
        for (name, value) in [("xVar", &self.aura.x_var), ("yVar", &self.aura.y_var)] {
            if !value.starts_with("--") {
                return Err(AuraError::InvalidConfig(format!(
                    "{} must be a custom property starting with '--', got '{}'",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"aura":{{"smoothingFactor":0.25,"hoverClass":"lit"}}}}"#).unwrap();

        let config = SiteConfig::load(file.path()).unwrap();
        assert_eq!(config.aura.smoothing_factor, 0.25);
        assert_eq!(config.aura.hover_class, "lit");
        assert_eq!(config.aura.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.nav, NavConfig::default());
    }

    #[test]
    fn test_load_rejects_bad_factor() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"aura":{{"smoothingFactor":2.0}}}}"#).unwrap();

        assert!(matches!(
            SiteConfig::load(file.path()),
            Err(AuraError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_rejects_zero_frame_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"aura":{{"frameIntervalMs":0}}}}"#).unwrap();

        assert!(matches!(
            SiteConfig::load(file.path()),
            Err(AuraError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_plain_style_names() {
        let mut config = SiteConfig::default();
        config.aura.x_var = "x".to_string();
        assert!(config.validate().is_err());
    }
}
