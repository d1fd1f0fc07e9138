// Viewer tuning knobs, overridable from JS through `configure_viewer`
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Gap between the SVG edge and the plotted extent, in pixels.
    pub padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub label_font_size: f64,
    pub tick_count: usize,
    pub min_grid_size: f64,
    pub grid_divisions: u32,
    /// Camera sits this far from the scene center along +X and +Z.
    pub camera_offset: f64,
    pub camera_height: f64,
    pub camera_fov: f64,
    pub borehole: BoreholeStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BoreholeStyle {
    pub color: String,
    pub shaft_radius: f64,
    pub collar_radius: f64,
    pub collar_height: f64,
    pub radial_segments: u32,
    pub label_offset: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            padding: 40.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            label_font_size: 12.0,
            tick_count: 10,
            min_grid_size: 200.0,
            grid_divisions: 20,
            camera_offset: 300.0,
            camera_height: 150.0,
            camera_fov: 45.0,
            borehole: BoreholeStyle::default(),
        }
    }
}

impl Default for BoreholeStyle {
    fn default() -> Self {
        BoreholeStyle {
            color: "#FF0000".to_string(),
            shaft_radius: 2.0,
            collar_radius: 4.0,
            collar_height: 5.0,
            radial_segments: 8,
            label_offset: 5.0,
        }
    }
}

impl ViewerConfig {
    pub fn zoom_extent(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Rejects settings the views cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(format!(
                "invalid zoom extent [{}, {}]: expected 0 < minZoom <= maxZoom",
                self.min_zoom, self.max_zoom
            ));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(format!("invalid padding {}", self.padding));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg: ViewerConfig =
            serde_json::from_str(r#"{"padding": 20, "borehole": {"shaftRadius": 1.5}}"#).expect("config");
        assert_eq!(cfg.padding, 20.0);
        assert_eq!(cfg.max_zoom, 10.0);
        assert_eq!(cfg.borehole.shaft_radius, 1.5);
        assert_eq!(cfg.borehole.collar_radius, 4.0);
        assert_eq!(cfg.grid_divisions, 20);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_zoom_extent_is_rejected() {
        let cfg: ViewerConfig = serde_json::from_str(r#"{"minZoom": 20}"#).expect("config");
        let err = cfg.validate().expect_err("min above max");
        assert!(err.contains("zoom extent"));

        let cfg = ViewerConfig { min_zoom: 0.0, ..ViewerConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = ViewerConfig { max_zoom: f64::NAN, ..ViewerConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
