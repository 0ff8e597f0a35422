//! Threshold filtering of localizations before association
//!
//! Every bound is inclusive and optional; an unset bound does not constrain.

use serde::{Deserialize, Serialize};

use crate::error::{DipoleError, Result};
use crate::types::Point;

/// Inclusive `[min, max]` range where either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    /// Closed range `[min, max]`
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Whether `value` lies inside the range
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |lo| value >= lo) && self.max.map_or(true, |hi| value <= hi)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo > hi {
                return Err(DipoleError::Configuration {
                    description: format!("{} bounds inverted: min {} > max {}", name, lo, hi),
                });
            }
        }
        Ok(())
    }
}

/// Per-channel localization filter on uncertainty, intensity and region of interest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointFilter {
    #[serde(default)]
    pub uncertainty: Bounds,
    #[serde(default)]
    pub intensity: Bounds,
    #[serde(default)]
    pub x: Bounds,
    #[serde(default)]
    pub y: Bounds,
}

impl PointFilter {
    /// Filter that keeps every point
    pub fn pass_all() -> Self {
        Self::default()
    }

    pub fn with_uncertainty(mut self, bounds: Bounds) -> Self {
        self.uncertainty = bounds;
        self
    }

    pub fn with_intensity(mut self, bounds: Bounds) -> Self {
        self.intensity = bounds;
        self
    }

    /// Rectangular region of interest
    pub fn with_roi(mut self, x: Bounds, y: Bounds) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Parse from JSON and validate
    pub fn from_json_str(json: &str) -> Result<Self> {
        let filter: Self = serde_json::from_str(json)?;
        filter.validate()?;
        Ok(filter)
    }

    /// Reject inverted bounds
    pub fn validate(&self) -> Result<()> {
        self.uncertainty.validate("uncertainty")?;
        self.intensity.validate("intensity")?;
        self.x.validate("x")?;
        self.y.validate("y")
    }

    /// Whether `point` passes every bound
    pub fn accepts(&self, point: &Point) -> bool {
        self.uncertainty.contains(point.uncertainty)
            && self.intensity.contains(point.intensity)
            && self.x.contains(point.x)
            && self.y.contains(point.y)
    }

    /// Keep the points that pass, preserving order
    pub fn apply(&self, points: &[Point]) -> Vec<Point> {
        let kept: Vec<Point> = points.iter().filter(|p| self.accepts(p)).cloned().collect();
        log::debug!("Point filter kept {} of {} points", kept.len(), points.len());
        kept
    }
}
