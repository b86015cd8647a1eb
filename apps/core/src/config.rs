use crate::error::ConfigError;
use crate::geo::{Bounds, LatLng};
use std::time::Duration;

/// Shared timing curve for every camera transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub ease_linearity: f64,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1500),
            ease_linearity: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds: Option<Bounds>,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_zoom: 5.0,
            max_zoom: 18.0,
            max_bounds: Some(INDONESIA),
        }
    }
}

pub const INDONESIA: Bounds = Bounds::new(
    LatLng::new(-11.208_566_9, 94.771_712_4),
    LatLng::new(6.274_449_6, 141.019_444_4),
);

pub const BATAM: LatLng = LatLng::new(0.964_059_128_558_844_2, 104.210_017_799_721_7);

/// Every tunable constant of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub cluster_radius_px: f64,
    /// Cluster clicks at or above this zoom open a list instead of zooming.
    pub list_popup_min_zoom: f64,
    pub fly_to_zoom: f64,
    pub fit_max_zoom: f64,
    pub cluster_fit_max_zoom: f64,
    pub fit_padding_px: f64,
    /// Result counts up to this value trigger a bounds fit.
    pub auto_fit_max_results: usize,
    pub animation: AnimationSpec,
    pub search_debounce: Duration,
    pub hover_close_grace: Duration,
    pub coordinate_match_tolerance_m: f64,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub limits: CameraLimits,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            cluster_radius_px: 25.0,
            list_popup_min_zoom: 14.0,
            fly_to_zoom: 15.0,
            fit_max_zoom: 14.0,
            cluster_fit_max_zoom: 16.0,
            fit_padding_px: 50.0,
            auto_fit_max_results: 5,
            animation: AnimationSpec::default(),
            search_debounce: Duration::from_millis(300),
            hover_close_grace: Duration::from_millis(200),
            coordinate_match_tolerance_m: 5.0,
            initial_center: BATAM,
            initial_zoom: 11.0,
            limits: CameraLimits::default(),
        }
    }
}

impl MapConfig {
    /// Applies a textual override such as one read from the environment.
    pub fn set(&mut self, key: &'static str, value: &str) -> Result<(), ConfigError> {
        match key {
            "cluster_radius_px" => {
                self.cluster_radius_px = parse_positive(key, value)?;
            }
            "list_popup_min_zoom" => {
                self.list_popup_min_zoom = parse_zoom(key, value)?;
            }
            "search_debounce_ms" => {
                self.search_debounce = Duration::from_millis(parse_millis(key, value)?);
            }
            "hover_close_grace_ms" => {
                self.hover_close_grace = Duration::from_millis(parse_millis(key, value)?);
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: value.to_string(),
                    expected: "a known setting",
                })
            }
        }
        Ok(())
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a positive number",
        })
}

fn parse_zoom(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=22.0).contains(v))
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a zoom level between 0 and 22",
        })
}

fn parse_millis(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a duration in milliseconds",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_map_behaviour() {
        let config = MapConfig::default();
        assert!((config.cluster_radius_px - 25.0).abs() < f64::EPSILON);
        assert!((config.list_popup_min_zoom - 14.0).abs() < f64::EPSILON);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.hover_close_grace, Duration::from_millis(200));
        assert_eq!(config.animation.duration, Duration::from_millis(1500));
        assert!(config.limits.max_bounds.is_some_and(|b| b.contains(BATAM)));
    }

    #[test]
    fn set_parses_numeric_overrides() -> Result<(), ConfigError> {
        let mut config = MapConfig::default();
        config.set("cluster_radius_px", "40")?;
        config.set("search_debounce_ms", " 120 ")?;
        assert!((config.cluster_radius_px - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.search_debounce, Duration::from_millis(120));
        Ok(())
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut config = MapConfig::default();
        assert!(config.set("cluster_radius_px", "-3").is_err());
        assert!(config.set("list_popup_min_zoom", "forty").is_err());
        assert!(config.set("hover_close_grace_ms", "1.5").is_err());
        assert!(config.set("unknown", "1").is_err());
        assert_eq!(config, MapConfig::default());
    }
}
