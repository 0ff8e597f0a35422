//! Configuration types for the association and tracking pass
//!
//! The pipeline takes every parameter from the caller; there are no hidden
//! defaults for the association radius, gap tolerance, gate or dipole length.

use serde::{Deserialize, Serialize};

use crate::error::{DipoleError, Result};

/// Parameters of a full join + geometry + tracking pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Association radius R (nm); pairs with distance <= R are joined
    pub radius_threshold: f64,
    /// Number of frames a track may go unmatched before it is retired
    pub max_frame_gap: usize,
    /// Gating distance G (nm); matches with midpoint displacement >= G are rejected
    pub gating_distance: f64,
    /// Nominal dipole length D0 (nm) used for the theta angle
    pub nominal_length: f64,
}

impl PipelineConfig {
    /// Create a new pipeline configuration
    pub fn new(
        radius_threshold: f64,
        max_frame_gap: usize,
        gating_distance: f64,
        nominal_length: f64,
    ) -> Self {
        Self {
            radius_threshold,
            max_frame_gap,
            gating_distance,
            nominal_length,
        }
    }

    /// Parse from JSON and validate
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject non-finite or non-positive lengths
    pub fn validate(&self) -> Result<()> {
        require_positive("radius_threshold", self.radius_threshold)?;
        require_positive("gating_distance", self.gating_distance)?;
        require_positive("nominal_length", self.nominal_length)?;
        Ok(())
    }

    /// Tracker-only subset of the configuration
    #[inline]
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            max_frame_gap: self.max_frame_gap,
            gating_distance: self.gating_distance,
        }
    }
}

/// Parameters of the cross-frame tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Number of frames a track may go unmatched before it is retired
    pub max_frame_gap: usize,
    /// Matches with cost >= this value are rejected
    pub gating_distance: f64,
}

impl TrackerConfig {
    /// Create a new tracker configuration
    pub fn new(max_frame_gap: usize, gating_distance: f64) -> Self {
        Self {
            max_frame_gap,
            gating_distance,
        }
    }

    /// Reject a non-finite or non-positive gate
    pub fn validate(&self) -> Result<()> {
        require_positive("gating_distance", self.gating_distance)
    }
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DipoleError::Configuration {
            description: format!("{} must be finite and positive, got {}", name, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_typical_values() {
        let config = PipelineConfig::new(232.0, 3, 400.0, 120.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.tracker(), TrackerConfig::new(3, 400.0));
    }

    #[test]
    fn test_validate_rejects_bad_lengths() {
        assert!(PipelineConfig::new(0.0, 3, 400.0, 120.0).validate().is_err());
        assert!(PipelineConfig::new(232.0, 3, f64::NAN, 120.0).validate().is_err());
        assert!(PipelineConfig::new(232.0, 3, 400.0, -1.0).validate().is_err());
        assert!(TrackerConfig::new(1, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::new(232.0, 3, 400.0, 120.0);
        let json = config.to_json_string().unwrap();
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_missing_field_rejected() {
        let json = r#"{"radius_threshold": 232.0, "max_frame_gap": 3, "gating_distance": 400.0}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, DipoleError::Json(_)));
    }

    #[test]
    fn test_json_invalid_value_rejected() {
        let json = r#"{"radius_threshold": -5.0, "max_frame_gap": 3, "gating_distance": 400.0, "nominal_length": 120.0}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, DipoleError::Configuration { .. }));
    }
}
