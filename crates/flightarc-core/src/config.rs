//! Animation settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::StrokeStyle;

/// Points of path revealed per millisecond.
pub const POINTS_PER_MS: f64 = 0.02;

/// Configuration for arc generation and the reveal animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Reveal rate; also sets the chained start offset inside a batch
    pub points_per_ms: f64,
    /// Insertion delay between consecutive flights (flight index * stagger)
    pub batch_stagger_ms: i64,
    /// Number of points interpolated along each great circle
    pub arc_segments: usize,
    /// Distance from the antimeridian (degrees) within which arcs are split
    pub dateline_offset_deg: f64,
    /// Stroke used both while revealing and once finished
    pub stroke: StrokeStyle,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            points_per_ms: POINTS_PER_MS,
            batch_stagger_ms: 50,
            arc_segments: 100,
            dateline_offset_deg: 10.0,
            stroke: StrokeStyle::default(),
        }
    }
}

impl AnimationConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.points_per_ms.is_finite() || self.points_per_ms <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "points_per_ms must be positive, got {}",
                self.points_per_ms
            )));
        }
        if self.batch_stagger_ms < 0 {
            return Err(ConfigError::Invalid(format!(
                "batch_stagger_ms must not be negative, got {}",
                self.batch_stagger_ms
            )));
        }
        if !(0.0..180.0).contains(&self.dateline_offset_deg) {
            return Err(ConfigError::Invalid(format!(
                "dateline_offset_deg must be in [0, 180), got {}",
                self.dateline_offset_deg
            )));
        }
        if !self.stroke.width.is_finite() || self.stroke.width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stroke width must be positive, got {}",
                self.stroke.width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AnimationConfig::from_json(r#"{"points_per_ms": 0.05}"#).unwrap();
        assert_eq!(config.points_per_ms, 0.05);
        assert_eq!(config.batch_stagger_ms, 50);
        assert_eq!(config.arc_segments, 100);
        assert_eq!(config.stroke.color, "#FF0000");
    }

    #[test]
    fn rejects_non_positive_rate() {
        let err = AnimationConfig::from_json(r#"{"points_per_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
