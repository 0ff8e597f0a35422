//! Output types for tracked dipole pairs.
//!
//! After tracking, every [`Pair`] carries a track identity. This module
//! defines the forms handed to downstream consumers:
//!
//! - [`PairRecord`] - Flat, serializable row for one pair
//! - [`Trajectory`] - One track's pairs ordered by frame
//! - [`TrackwiseTable`] - Frame × track table of a single measure

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Pair, TrackId};

/// Flat row describing one tracked pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub c1_id: u64,
    pub c1_frame: usize,
    pub c1_x: f64,
    pub c1_y: f64,
    pub c1_uncertainty: f64,
    pub c2_id: u64,
    pub c2_frame: usize,
    pub c2_x: f64,
    pub c2_y: f64,
    pub c2_uncertainty: f64,
    pub distance: f64,
    pub phi: f64,
    pub theta: f64,
    pub mid_x: f64,
    pub mid_y: f64,
    /// `None` only for pairs that were never passed through the tracker
    pub track_id: Option<TrackId>,
}

impl From<&Pair> for PairRecord {
    fn from(pair: &Pair) -> Self {
        Self {
            c1_id: pair.source.id,
            c1_frame: pair.source.frame,
            c1_x: pair.source.x,
            c1_y: pair.source.y,
            c1_uncertainty: pair.source.uncertainty,
            c2_id: pair.target.id,
            c2_frame: pair.target.frame,
            c2_x: pair.target.x,
            c2_y: pair.target.y,
            c2_uncertainty: pair.target.uncertainty,
            distance: pair.geometry.distance,
            phi: pair.geometry.phi,
            theta: pair.geometry.theta,
            mid_x: pair.midpoint.x,
            mid_y: pair.midpoint.y,
            track_id: pair.track,
        }
    }
}

/// Convert all pairs to records
pub fn to_records(pairs: &[Pair]) -> Vec<PairRecord> {
    pairs.iter().map(PairRecord::from).collect()
}

/// Serialize pairs as a JSON array of [`PairRecord`]s
pub fn to_json(pairs: &[Pair]) -> crate::error::Result<String> {
    Ok(serde_json::to_string_pretty(&to_records(pairs))?)
}

/// Per-pair scalar a table or statistic can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    Distance,
    Phi,
    Theta,
}

impl Measure {
    /// Extract this measure from a pair
    #[inline]
    pub fn of(self, pair: &Pair) -> f64 {
        match self {
            Measure::Distance => pair.geometry.distance,
            Measure::Phi => pair.geometry.phi,
            Measure::Theta => pair.geometry.theta,
        }
    }
}

/// Complete history of a single track.
///
/// Frames are non-decreasing; a frame appears at most once because the
/// tracker assigns each identity to at most one pair per frame.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Track identity
    pub track: TrackId,
    /// Pairs of this track ordered by frame
    pub pairs: Vec<Pair>,
}

impl Trajectory {
    /// Create an empty trajectory
    pub fn new(track: TrackId) -> Self {
        Self {
            track,
            pairs: Vec::new(),
        }
    }

    /// Length of the trajectory
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if trajectory is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First frame the track was seen in
    pub fn first_frame(&self) -> Option<usize> {
        self.pairs.first().map(Pair::frame)
    }

    /// Last frame the track was seen in
    pub fn last_frame(&self) -> Option<usize> {
        self.pairs.last().map(Pair::frame)
    }

    /// Frames the track was seen in
    pub fn frames(&self) -> Vec<usize> {
        self.pairs.iter().map(Pair::frame).collect()
    }

    /// Values of `measure` in frame order
    pub fn values(&self, measure: Measure) -> Vec<f64> {
        self.pairs.iter().map(|p| measure.of(p)).collect()
    }

    /// Value of `measure` at `frame`, if the track was seen then
    pub fn value_at(&self, frame: usize, measure: Measure) -> Option<f64> {
        self.pairs
            .iter()
            .find(|p| p.frame() == frame)
            .map(|p| measure.of(p))
    }
}

/// Group tracked pairs by identity, ordered by identity then frame.
///
/// Pairs without a track identity are skipped.
pub fn group_by_track(pairs: &[Pair]) -> Vec<Trajectory> {
    let mut tracks: BTreeMap<TrackId, Trajectory> = BTreeMap::new();
    for pair in pairs {
        if let Some(id) = pair.track {
            tracks
                .entry(id)
                .or_insert_with(|| Trajectory::new(id))
                .pairs
                .push(pair.clone());
        }
    }

    let mut trajectories: Vec<Trajectory> = tracks.into_values().collect();
    for t in &mut trajectories {
        t.pairs.sort_by_key(Pair::frame);
    }
    trajectories
}

/// Frame × track table of one measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackwiseTable {
    /// Measure the cells hold
    pub measure: Measure,
    /// Row labels
    pub frames: Vec<usize>,
    /// Column labels
    pub tracks: Vec<TrackId>,
    /// `values[row][col]`, `None` where the track was not seen in that frame
    pub values: Vec<Vec<Option<f64>>>,
}

impl TrackwiseTable {
    /// Column of a single track
    pub fn column(&self, track: TrackId) -> Option<Vec<Option<f64>>> {
        let col = self.tracks.iter().position(|&t| t == track)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }
}

/// Build a frame × track table of `measure` over the given frame range.
pub fn trackwise_series(
    trajectories: &[Trajectory],
    measure: Measure,
    frames: impl IntoIterator<Item = usize>,
) -> TrackwiseTable {
    let frames: Vec<usize> = frames.into_iter().collect();
    let values = frames
        .iter()
        .map(|&frame| {
            trajectories
                .iter()
                .map(|t| t.value_at(frame, measure))
                .collect()
        })
        .collect();

    TrackwiseTable {
        measure,
        frames,
        tracks: trajectories.iter().map(|t| t.track).collect(),
        values,
    }
}
