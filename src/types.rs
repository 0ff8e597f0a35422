//! Point, pair and track identity types
//!
//! This module defines the core value types that flow through the join,
//! geometry and tracking stages.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{DipoleError, Result};

/// Imaging channel a localization was detected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// Channel 1, the source end of every dipole pair
    #[serde(rename = "1")]
    First,
    /// Channel 2, the target end of every dipole pair
    #[serde(rename = "2")]
    Second,
}

impl Channel {
    /// Numeric channel tag (1 or 2)
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            Channel::First => 1,
            Channel::Second => 2,
        }
    }

    /// Parse a numeric channel tag
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Channel::First),
            2 => Some(Channel::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.number())
    }
}

/// A validated single-molecule localization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Localization identifier from the source table
    pub id: u64,
    /// Channel the point was detected on
    pub channel: Channel,
    /// Frame index
    pub frame: usize,
    /// X position (nm)
    pub x: f64,
    /// Y position (nm)
    pub y: f64,
    /// Lateral localization uncertainty (nm)
    pub uncertainty: f64,
    /// Integrated intensity (photons)
    pub intensity: f64,
}

impl Point {
    /// Create a new point
    pub fn new(
        id: u64,
        channel: Channel,
        frame: usize,
        x: f64,
        y: f64,
        uncertainty: f64,
        intensity: f64,
    ) -> Self {
        Self {
            id,
            channel,
            frame,
            x,
            y,
            uncertainty,
            intensity,
        }
    }

    /// Position as a nalgebra point
    #[inline]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Check that every numeric field is finite
    pub fn validate(&self, index: usize) -> Result<()> {
        let fields = [
            ("x", self.x),
            ("y", self.y),
            ("uncertainty", self.uncertainty),
            ("intensity", self.intensity),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(DipoleError::InvalidPoint {
                    index,
                    channel: self.channel,
                    reason: format!("field `{}` is not finite ({})", name, value),
                });
            }
        }
        Ok(())
    }
}

/// Loosely-typed localization record as delivered by a point source.
///
/// Every field is optional so that a record with a missing column can be
/// deserialized and then rejected with a precise error by [`PointRecord::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: Option<u64>,
    pub frame: Option<usize>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub uncertainty: Option<f64>,
    pub intensity: Option<f64>,
}

impl PointRecord {
    /// Convert into a [`Point`] on `channel`, failing on missing or non-finite fields.
    pub fn validate(&self, index: usize, channel: Channel) -> Result<Point> {
        let missing = |name: &str| DipoleError::InvalidPoint {
            index,
            channel,
            reason: format!("missing field `{}`", name),
        };

        let id = self.id.ok_or_else(|| missing("id"))?;
        let frame = self.frame.ok_or_else(|| missing("frame"))?;
        let x = self.x.ok_or_else(|| missing("x"))?;
        let y = self.y.ok_or_else(|| missing("y"))?;
        let uncertainty = self.uncertainty.ok_or_else(|| missing("uncertainty"))?;
        let intensity = self.intensity.ok_or_else(|| missing("intensity"))?;

        let point = Point::new(
            id,
            channel,
            frame,
            x,
            y,
            uncertainty,
            intensity,
        );
        point.validate(index)?;
        Ok(point)
    }

    /// Parse a JSON array of records and validate each one
    pub fn parse_json(json: &str, channel: Channel) -> Result<Vec<Point>> {
        let records: Vec<PointRecord> = serde_json::from_str(json)?;
        records
            .iter()
            .enumerate()
            .map(|(i, r)| r.validate(i, channel))
            .collect()
    }
}

/// Track identity, a positive integer that is never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// The first identity handed out by a fresh tracker
    pub const FIRST: TrackId = TrackId(1);

    /// Create from a raw value; zero is not a valid identity
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Raw integer value
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// The identity following this one
    #[inline]
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geometric descriptors of a channel-1 → channel-2 vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairGeometry {
    /// Euclidean separation (nm)
    pub distance: f64,
    /// Orientation of the vector in degrees, `[0, 360)`
    pub phi: f64,
    /// Cone angle in degrees, `[0, 90]`
    pub theta: f64,
}

/// Dipole candidate: a channel-1 point joined to a channel-2 point
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    /// Channel-1 point
    pub source: Point,
    /// Channel-2 point
    pub target: Point,
    /// Distance and angles
    pub geometry: PairGeometry,
    /// Midpoint of the two localizations
    pub midpoint: Point2<f64>,
    /// Track identity, filled in by the tracker
    pub track: Option<TrackId>,
}

impl Pair {
    /// Frame the pair belongs to (the channel-1 frame)
    #[inline]
    pub fn frame(&self) -> usize {
        self.source.frame
    }
}
