//! Session configuration and scan profiles
//!
//! Thresholds and target counts are calibration values, not physical
//! constants. Profiles bundle the combinations used by the different card
//! screens; anything can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};
use crate::surface::{Alignment, SimilarityComparator, SurfaceFilter};

/// Which surface alignments a session tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentFilter {
    #[default]
    Any,
    Horizontal,
    Vertical,
}

impl AlignmentFilter {
    pub fn allows(&self, alignment: Alignment) -> bool {
        match self {
            AlignmentFilter::Any => true,
            AlignmentFilter::Horizontal => alignment == Alignment::Horizontal,
            AlignmentFilter::Vertical => alignment == Alignment::Vertical,
        }
    }
}

/// Scan profile presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScanProfile {
    /// One surface, permissive size limits (portal screens)
    Quick,
    #[default]
    Standard,
    /// Fifteen walls, strict size limits (full card deck)
    Thorough,
}

impl ScanProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanProfile::Quick => "Quick",
            ScanProfile::Standard => "Standard",
            ScanProfile::Thorough => "Thorough",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quick" | "single" => Some(ScanProfile::Quick),
            "standard" | "std" => Some(ScanProfile::Standard),
            "thorough" | "full" => Some(ScanProfile::Thorough),
            _ => None,
        }
    }

    /// Target surface count
    pub fn capacity(&self) -> usize {
        match self {
            ScanProfile::Quick => 1,
            ScanProfile::Standard => 5,
            ScanProfile::Thorough => 15,
        }
    }

    /// Minimum edge length (m)
    pub fn min_edge(&self) -> f32 {
        match self {
            ScanProfile::Quick => 0.05,
            ScanProfile::Standard => 0.15,
            ScanProfile::Thorough => 0.15,
        }
    }

    /// Minimum area (m²)
    pub fn min_area(&self) -> f32 {
        match self {
            ScanProfile::Quick => 0.01,
            ScanProfile::Standard => 0.05,
            ScanProfile::Thorough => 0.05,
        }
    }

    pub fn alignments(&self) -> AlignmentFilter {
        match self {
            ScanProfile::Quick => AlignmentFilter::Vertical,
            ScanProfile::Standard => AlignmentFilter::Any,
            ScanProfile::Thorough => AlignmentFilter::Vertical,
        }
    }
}

/// Acceptance and placement settings for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Surfaces to accept before detection halts
    pub capacity: usize,

    // === Validity ===
    /// Minimum surface width (m)
    pub min_width: f32,
    /// Minimum surface height (m)
    pub min_height: f32,
    /// Minimum surface area (m²)
    pub min_area: f32,

    // === Similarity ===
    /// Origins closer than this may be the same surface (m)
    pub distance_threshold: f32,
    /// Minimum |cos| between normals of the same surface
    pub angle_threshold: f32,

    // === Placement ===
    /// Accepted surfaces required before scatter is allowed
    pub min_scatter: usize,
    /// Tracked alignments
    pub alignments: AlignmentFilter,
    /// Distance a card floats off its surface (m)
    pub card_offset: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_profile(ScanProfile::default())
    }
}

impl SessionConfig {
    /// Create a config from a scan profile (applies profile defaults)
    pub fn from_profile(profile: ScanProfile) -> Self {
        Self {
            capacity: profile.capacity(),
            min_width: profile.min_edge(),
            min_height: profile.min_edge(),
            min_area: profile.min_area(),
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            min_scatter: 1,
            alignments: profile.alignments(),
            card_offset: CARD_OFFSET,
        }
    }

    /// Apply a profile's target count, size limits and alignments.
    /// Similarity thresholds and placement settings are kept.
    pub fn apply_profile(&mut self, profile: ScanProfile) {
        self.capacity = profile.capacity();
        self.min_width = profile.min_edge();
        self.min_height = profile.min_edge();
        self.min_area = profile.min_area();
        self.alignments = profile.alignments();
        self.min_scatter = self.min_scatter.min(self.capacity);
    }

    pub fn filter(&self) -> SurfaceFilter {
        SurfaceFilter::new(self.min_width, self.min_height, self.min_area)
    }

    pub fn comparator(&self) -> SimilarityComparator {
        SimilarityComparator::new(self.distance_threshold, self.angle_threshold)
    }

    /// Effective scatter minimum (never below one)
    pub fn scatter_minimum(&self) -> usize {
        self.min_scatter.max(1)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }

        let non_negative = [
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("min_area", self.min_area),
            ("distance_threshold", self.distance_threshold),
            ("card_offset", self.card_offset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.angle_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "angle_threshold",
                value: self.angle_threshold,
            });
        }

        if self.min_scatter > self.capacity {
            return Err(ConfigError::InvalidScatterMinimum {
                min_scatter: self.min_scatter,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Session config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let quick = SessionConfig::from_profile(ScanProfile::Quick);
        assert_eq!(quick.capacity, 1);
        assert_eq!(quick.min_area, 0.01);
        assert_eq!(quick.alignments, AlignmentFilter::Vertical);

        let thorough = SessionConfig::from_profile(ScanProfile::Thorough);
        assert_eq!(thorough.capacity, 15);
        assert_eq!(thorough.min_width, 0.15);
        assert_eq!(thorough.distance_threshold, 0.5);
        assert_eq!(thorough.angle_threshold, 0.85);
        assert!(thorough.validate().is_ok());
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(ScanProfile::from_str("FULL"), Some(ScanProfile::Thorough));
        assert_eq!(ScanProfile::from_str("quick"), Some(ScanProfile::Quick));
        assert_eq!(ScanProfile::from_str("nope"), None);
        assert_eq!(ScanProfile::Standard.as_str(), "Standard");
    }

    #[test]
    fn test_apply_profile_keeps_thresholds() {
        let mut config = SessionConfig {
            distance_threshold: 0.3,
            min_scatter: 4,
            ..SessionConfig::default()
        };
        config.apply_profile(ScanProfile::Quick);
        assert_eq!(config.capacity, 1);
        assert_eq!(config.distance_threshold, 0.3);
        assert_eq!(config.min_scatter, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = SessionConfig {
            capacity: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidCapacity)));

        let angle = SessionConfig {
            angle_threshold: 1.5,
            ..SessionConfig::default()
        };
        assert!(matches!(
            angle.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "angle_threshold",
                ..
            })
        ));

        let nan = SessionConfig {
            min_area: f32::NAN,
            ..SessionConfig::default()
        };
        assert!(nan.validate().is_err());

        let scatter = SessionConfig {
            capacity: 2,
            min_scatter: 3,
            ..SessionConfig::default()
        };
        assert!(matches!(
            scatter.validate(),
            Err(ConfigError::InvalidScatterMinimum { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SessionConfig::from_json_str(r#"{ "capacity": 15, "alignments": "vertical" }"#)
                .expect("valid config");
        assert_eq!(config.capacity, 15);
        assert_eq!(config.alignments, AlignmentFilter::Vertical);
        assert_eq!(config.distance_threshold, DEFAULT_DISTANCE_THRESHOLD);
        assert_eq!(config.min_scatter, 1);
    }

    #[test]
    fn test_json_validation_and_parse_errors() {
        assert!(matches!(
            SessionConfig::from_json_str(r#"{ "capacity": 0 }"#),
            Err(ConfigError::InvalidCapacity)
        ));
        assert!(matches!(
            SessionConfig::from_json_str("{ capacity"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");

        let config = SessionConfig {
            capacity: 7,
            angle_threshold: 0.9,
            ..SessionConfig::from_profile(ScanProfile::Thorough)
        };
        config.save(&path).expect("save");
        let loaded = SessionConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = SessionConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
