//! Gap-tolerant cross-frame tracker
//!
//! Each frame, the midpoints of the frame's pairs are matched against the
//! last known midpoint of every live track by minimum-total-cost assignment.
//! Matches whose displacement reaches the gating distance are discarded, and
//! every detection left unmatched starts a new track. A track that goes more
//! than `max_frame_gap` frames without a match is retired and its identity is
//! never handed out again.
//!
//! The tracker itself is stateless: all carried state lives in a
//! [`TrackState`] value that the caller threads through [`Tracker::step`].

use std::collections::BTreeMap;

use nalgebra::Point2;

use crate::association::{build_cost_matrix, gated_assignment, GatedAssignment};
use crate::config::TrackerConfig;
use crate::error::{DipoleError, Result};
use crate::reporter::{NoOpReporter, TrackReporter};
use crate::types::{Pair, TrackId};

/// Last known position of a live track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEntry {
    /// Midpoint of the most recent matched pair
    pub position: Point2<f64>,
    /// Frame of the most recent match
    pub last_frame: usize,
}

/// State carried between tracking steps
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Live tracks keyed by identity; ordered so cost matrix rows are deterministic
    tracks: BTreeMap<TrackId, TrackEntry>,
    /// Next identity to hand out
    next_id: TrackId,
    /// Last frame processed
    last_frame: Option<usize>,
}

impl Default for TrackState {
    fn default() -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: TrackId::FIRST,
            last_frame: None,
        }
    }
}

impl TrackState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not yet retired) tracks
    #[inline]
    pub fn num_live(&self) -> usize {
        self.tracks.len()
    }

    /// Entry for a live track
    pub fn get(&self, id: TrackId) -> Option<&TrackEntry> {
        self.tracks.get(&id)
    }

    /// Iterate live tracks in identity order
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &TrackEntry)> {
        self.tracks.iter().map(|(&id, e)| (id, e))
    }

    /// Last frame processed, if any
    #[inline]
    pub fn last_frame(&self) -> Option<usize> {
        self.last_frame
    }

    /// Number of identities handed out so far
    #[inline]
    pub fn num_allocated(&self) -> u64 {
        self.next_id.get() - 1
    }

    fn allocate(&mut self) -> TrackId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

/// Cross-frame tracker
#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackerConfig,
}

impl Tracker {
    /// Create a tracker, validating the configuration
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Tracker configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Process one frame. See [`Tracker::step_with_reporter`].
    pub fn step(
        &self,
        state: &mut TrackState,
        frame: usize,
        detections: &[Point2<f64>],
    ) -> Result<Vec<TrackId>> {
        self.step_with_reporter(state, frame, detections, &mut NoOpReporter)
    }

    /// Process one frame and return the identity of each detection, in order.
    ///
    /// `frame` must be strictly greater than the last frame processed with
    /// `state`, and every detection must be finite. On error the state is
    /// left untouched.
    pub fn step_with_reporter<R: TrackReporter>(
        &self,
        state: &mut TrackState,
        frame: usize,
        detections: &[Point2<f64>],
        reporter: &mut R,
    ) -> Result<Vec<TrackId>> {
        if let Some(previous) = state.last_frame {
            if frame <= previous {
                return Err(DipoleError::FrameOrder {
                    previous,
                    current: frame,
                });
            }
        }
        if let Some(index) = detections
            .iter()
            .position(|p| !p.coords.iter().all(|v| v.is_finite()))
        {
            return Err(DipoleError::InvalidDetection { frame, index });
        }

        let (active, retired): (Vec<_>, Vec<_>) = state
            .iter()
            .map(|(id, e)| (id, *e))
            .partition(|(_, e)| frame - e.last_frame <= self.config.max_frame_gap);
        let active_ids: Vec<TrackId> = active.iter().map(|&(id, _)| id).collect();

        reporter.on_frame_start(frame, active_ids.len(), detections.len());

        let gated = if active.is_empty() || detections.is_empty() {
            GatedAssignment::default()
        } else {
            let rows: Vec<Point2<f64>> = active.iter().map(|(_, e)| e.position).collect();
            let cost = build_cost_matrix(&rows, detections);
            reporter.on_cost_matrix(frame, &active_ids, &cost);
            gated_assignment(&cost, self.config.gating_distance)?
        };

        // Nothing below can fail; commit to the state from here on
        for (id, entry) in retired {
            state.tracks.remove(&id);
            reporter.on_track_retired(frame, id, entry.last_frame);
        }

        for cell in &gated.rejected {
            reporter.on_gate_rejected(frame, active_ids[cell.row], cell.col, cell.cost);
        }

        let mut assigned: Vec<Option<TrackId>> = vec![None; detections.len()];
        for cell in &gated.accepted {
            let id = active_ids[cell.row];
            assigned[cell.col] = Some(id);
            reporter.on_match(frame, id, cell.col, cell.cost);
        }

        let ids: Vec<TrackId> = assigned
            .into_iter()
            .enumerate()
            .map(|(detection, id)| {
                id.unwrap_or_else(|| {
                    let id = state.allocate();
                    reporter.on_track_started(frame, id, detection);
                    id
                })
            })
            .collect();

        for (&id, &position) in ids.iter().zip(detections) {
            state.tracks.insert(
                id,
                TrackEntry {
                    position,
                    last_frame: frame,
                },
            );
        }
        state.last_frame = Some(frame);

        reporter.on_frame_complete(frame, state.num_live());
        Ok(ids)
    }

    /// Assign track identities to every pair in one batch pass.
    ///
    /// Pairs are visited in ascending frame order (stable with respect to
    /// their order inside a frame); the slice itself is not reordered.
    pub fn assign<R: TrackReporter>(&self, pairs: &mut [Pair], reporter: &mut R) -> Result<TrackState> {
        let mut by_frame: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, pair) in pairs.iter().enumerate() {
            by_frame.entry(pair.frame()).or_default().push(i);
        }

        let mut state = TrackState::new();
        for (frame, indices) in by_frame {
            let midpoints: Vec<Point2<f64>> = indices.iter().map(|&i| pairs[i].midpoint).collect();
            let ids = self.step_with_reporter(&mut state, frame, &midpoints, reporter)?;
            for (i, id) in indices.into_iter().zip(ids) {
                pairs[i].track = Some(id);
            }
        }

        Ok(state)
    }
}
