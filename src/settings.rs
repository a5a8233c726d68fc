//! Animation settings
//!
//! Read-only at runtime: in the browser they come from the hero canvas's
//! `data-settings` JSON attribute, otherwise defaults apply.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{FieldShape, SpawnerConfig};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Static field point count multiplier
    pub fn star_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }

    /// Whether trails are shortened for this preset
    pub fn short_trails(&self) -> bool {
        matches!(self, QualityPreset::Low)
    }
}

/// Animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Hero scene ===
    pub hero_star_count: usize,
    pub shooting_stars: usize,
    /// Trail points per shooting star
    pub trail_length: usize,
    /// Shooting stars reset once |x| or |y| exceeds this
    pub bound_half_extent: f32,

    // === Section backdrops ===
    pub subtle_star_count: usize,
    pub subtle_shape: FieldShape,

    // === CSS shooting stars (seconds) ===
    pub css_spawn_period: f64,
    pub css_lifetime_min: f64,
    pub css_lifetime_max: f64,

    // === Page ===
    /// Replace the system cursor with the animated dot
    pub custom_cursor: bool,

    // === Accessibility ===
    /// No shooting stars and no CSS spawner; static fields still render
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            hero_star_count: HERO_STAR_COUNT,
            shooting_stars: SHOOTING_STAR_COUNT,
            trail_length: TRAIL_LENGTH,
            bound_half_extent: BOUND_HALF_EXTENT,

            subtle_star_count: SUBTLE_STAR_COUNT,
            subtle_shape: FieldShape::default(),

            css_spawn_period: CSS_SPAWN_PERIOD,
            css_lifetime_min: CSS_LIFETIME_MIN,
            css_lifetime_max: CSS_LIFETIME_MAX,

            custom_cursor: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    fn scaled(&self, count: usize) -> usize {
        (count as f32 * self.quality.star_density()).round() as usize
    }

    pub fn effective_hero_star_count(&self) -> usize {
        self.scaled(self.hero_star_count)
    }

    pub fn effective_subtle_star_count(&self) -> usize {
        self.scaled(self.subtle_star_count)
    }

    /// Shooting star count (respects reduced_motion)
    pub fn effective_shooting_stars(&self) -> usize {
        if self.reduced_motion {
            0
        } else {
            self.shooting_stars
        }
    }

    /// Trail length (halved on Low, never below 2)
    pub fn effective_trail_length(&self) -> usize {
        if self.quality.short_trails() {
            (self.trail_length / 2).max(2)
        } else {
            self.trail_length.max(1)
        }
    }

    /// Whether the CSS spawner runs (respects reduced_motion)
    pub fn css_stars_enabled(&self) -> bool {
        !self.reduced_motion && self.css_spawn_period > 0.0
    }

    pub fn spawner_config(&self) -> SpawnerConfig {
        SpawnerConfig {
            period: self.css_spawn_period,
            lifetime_min: self.css_lifetime_min,
            lifetime_max: self.css_lifetime_max.max(self.css_lifetime_min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page() {
        let s = Settings::default();
        assert_eq!(s.effective_hero_star_count(), 2000);
        assert_eq!(s.effective_subtle_star_count(), 500);
        assert_eq!(s.effective_shooting_stars(), 8);
        assert_eq!(s.effective_trail_length(), 10);
        assert!(s.css_stars_enabled());
        assert_eq!(s.spawner_config(), SpawnerConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let s = Settings::from_json(r#"{"quality":"low","shooting_stars":3}"#).unwrap();
        assert_eq!(s.quality, QualityPreset::Low);
        assert_eq!(s.shooting_stars, 3);
        assert_eq!(s.effective_hero_star_count(), 500);
        assert_eq!(s.effective_trail_length(), 5);
        assert_eq!(s.bound_half_extent, BOUND_HALF_EXTENT);
    }

    #[test]
    fn test_box_shape_json() {
        let s = Settings::from_json(
            r#"{"subtle_shape":{"kind":"box","half_extents":[5.0,5.0,2.5]}}"#,
        )
        .unwrap();
        assert_eq!(s.subtle_shape, FieldShape::subtle_box());
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("{nope"), Settings::default());
    }

    #[test]
    fn test_reduced_motion() {
        let s = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(s.effective_shooting_stars(), 0);
        assert!(!s.css_stars_enabled());
        assert_eq!(s.effective_hero_star_count(), 2000);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(Settings::from_preset(QualityPreset::High).effective_hero_star_count(), 3000);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
