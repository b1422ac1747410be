use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use maskview_core::LayerPalette;

use crate::error::PlotError;

pub const DEFAULT_PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Settings shared by the geometry view and the device inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub palette: LayerPalette,
    /// Script URL the generated pages load plotly.js from.
    pub plotly_js_url: String,
    /// Where HTML pages are written. `None` means the system temp directory.
    pub output_dir: Option<PathBuf>,
    /// Open written pages in the system browser.
    pub auto_open: bool,
    /// Lock the x/y aspect ratio of the geometry view.
    pub equal_aspect: bool,
    /// Extra space around the device extents, as a fraction of each extent.
    pub axis_margin: f64,
    pub port_marker_size: f64,
    /// Slider steps per default parameter value.
    pub slider_divisions: u32,
    /// Slider range as a multiple of the default parameter value.
    pub slider_span: u32,
    /// Pre-render every slider step into the inspector page.
    pub precompute_steps: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            palette: LayerPalette::default(),
            plotly_js_url: DEFAULT_PLOTLY_JS_URL.to_string(),
            output_dir: None,
            auto_open: true,
            equal_aspect: false,
            axis_margin: 0.0,
            port_marker_size: 12.0,
            slider_divisions: 10,
            slider_span: 10,
            precompute_steps: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, PlotError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PlotError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        if self.slider_divisions == 0 {
            return Err(PlotError::Config("slider_divisions must be at least 1".into()));
        }
        if self.slider_span == 0 {
            return Err(PlotError::Config("slider_span must be at least 1".into()));
        }
        if !self.axis_margin.is_finite() || self.axis_margin < 0.0 {
            return Err(PlotError::Config(format!(
                "axis_margin must be a non-negative number, got {}",
                self.axis_margin
            )));
        }
        if self.port_marker_size.is_nan() || self.port_marker_size <= 0.0 {
            return Err(PlotError::Config(format!(
                "port_marker_size must be positive, got {}",
                self.port_marker_size
            )));
        }
        if self.palette.colors.is_empty() {
            return Err(PlotError::Config(
                "palette.colors must list at least one colour".into(),
            ));
        }
        Ok(())
    }

    /// Directory generated pages are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert!(config.auto_open);
        assert_eq!(config.slider_divisions, 10);
        assert_eq!(config.slider_span, 10);
        assert!((config.port_marker_size - 12.0).abs() < 1e-10);
        assert!(config.validate().is_ok());
        assert_eq!(config.output_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{"auto_open": false, "axis_margin": 0.05}"#).unwrap();
        assert!(!config.auto_open);
        assert!((config.axis_margin - 0.05).abs() < 1e-10);
        assert_eq!(config.plotly_js_url, DEFAULT_PLOTLY_JS_URL);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            ViewerConfig::from_json(r#"{"autoopen": false}"#),
            Err(PlotError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ViewerConfig::from_json(r#"{"slider_divisions": 0}"#),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{"axis_margin": -1.0}"#),
            Err(PlotError::Config(_))
        ));
    }

    #[test]
    fn test_empty_palette_rejected() {
        let err = ViewerConfig::from_json(r#"{"palette": {"colors": []}}"#).unwrap_err();
        assert!(matches!(err, PlotError::Config(ref msg) if msg.contains("palette.colors")));

        let mut config = ViewerConfig::default();
        config.palette.colors.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_palette_override_from_json() {
        let config =
            ViewerConfig::from_json(r#"{"palette": {"overrides": {"3": "black"}}}"#).unwrap();
        assert_eq!(config.palette.color_for(3), Some("black"));
        assert_eq!(config.palette.color_for(1), Some("orange"));
    }
}
