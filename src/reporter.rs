//! Observability for tracker execution.
//!
//! This module provides the [`TrackReporter`] trait for debugging and research
//! instrumentation. Reporters receive callbacks at key points of each
//! tracking step without polluting the core algorithm logic.
//!
//! # Zero-Cost Abstraction
//!
//! The default [`NoOpReporter`] compiles to zero overhead - all callback
//! methods are empty and will be optimized away by the compiler.
//!
//! # Example
//!
//! ```
//! use dipole_track::reporter::{DebugReporter, TrackReporter};
//! use dipole_track::{Tracker, TrackerConfig, TrackState};
//! use nalgebra::Point2;
//!
//! let tracker = Tracker::new(TrackerConfig::new(3, 400.0)).unwrap();
//! let mut state = TrackState::new();
//! let mut reporter = DebugReporter::new();
//!
//! tracker
//!     .step_with_reporter(&mut state, 1, &[Point2::new(0.0, 0.0)], &mut reporter)
//!     .unwrap();
//!
//! assert_eq!(reporter.started_events().len(), 1);
//! ```

use ndarray::Array2;

use crate::types::TrackId;

// ============================================================================
// TrackReporter Trait
// ============================================================================

/// Observability trait for tracker step execution.
///
/// All methods have default empty implementations, so you only need
/// to override the events you care about. Detection indices refer to the
/// position of the midpoint in the slice passed to the step.
pub trait TrackReporter {
    /// Called once per frame before any matching.
    fn on_frame_start(&mut self, _frame: usize, _active_tracks: usize, _detections: usize) {}

    /// Called after the track × detection cost matrix is built.
    ///
    /// Not called when either side is empty.
    fn on_cost_matrix(&mut self, _frame: usize, _rows: &[TrackId], _cost: &Array2<f64>) {}

    /// Called when an existing track is continued by a detection.
    fn on_match(&mut self, _frame: usize, _track: TrackId, _detection: usize, _cost: f64) {}

    /// Called when an optimal match is discarded because its cost reached the gate.
    fn on_gate_rejected(&mut self, _frame: usize, _track: TrackId, _detection: usize, _cost: f64) {}

    /// Called when a detection starts a new track.
    fn on_track_started(&mut self, _frame: usize, _track: TrackId, _detection: usize) {}

    /// Called when a track exceeds the gap tolerance and is retired for good.
    fn on_track_retired(&mut self, _frame: usize, _track: TrackId, _last_frame: usize) {}

    /// Called after the track state has been updated for the frame.
    fn on_frame_complete(&mut self, _frame: usize, _live_tracks: usize) {}
}

// ============================================================================
// NoOpReporter
// ============================================================================

/// Zero-cost reporter that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl NoOpReporter {
    /// Create a new no-op reporter.
    pub fn new() -> Self {
        Self
    }
}

impl TrackReporter for NoOpReporter {}

// ============================================================================
// DebugReporter
// ============================================================================

/// A frame-scoped match or rejection record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchEvent {
    /// Frame the match was made in
    pub frame: usize,
    /// Track on the row side of the match
    pub track: TrackId,
    /// Detection index on the column side
    pub detection: usize,
    /// Midpoint displacement of the match
    pub cost: f64,
}

/// A track birth record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartEvent {
    /// Frame the track was started in
    pub frame: usize,
    /// Newly allocated identity
    pub track: TrackId,
    /// Detection index that started the track
    pub detection: usize,
}

/// A track retirement record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetireEvent {
    /// Frame at which the retirement was detected
    pub frame: usize,
    /// Retired identity
    pub track: TrackId,
    /// Last frame the track was matched in
    pub last_frame: usize,
}

/// Reporter that captures all events for debugging.
///
/// Cost matrices are cloned on capture; for long runs with many live tracks
/// this can consume significant memory.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    /// (frame, active tracks, detections)
    frames: Vec<(usize, usize, usize)>,

    /// (frame, row track ids, cost matrix)
    cost_matrices: Vec<(usize, Vec<TrackId>, Array2<f64>)>,

    /// Accepted matches
    matches: Vec<MatchEvent>,

    /// Optimal matches discarded by the gate
    rejections: Vec<MatchEvent>,

    starts: Vec<StartEvent>,

    retirements: Vec<RetireEvent>,

    /// (frame, live tracks after update)
    completes: Vec<(usize, usize)>,
}

impl DebugReporter {
    /// Create a new debug reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all captured events.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cost_matrices.clear();
        self.matches.clear();
        self.rejections.clear();
        self.starts.clear();
        self.retirements.clear();
        self.completes.clear();
    }

    /// Frame starts as (frame, active tracks, detections).
    pub fn frame_events(&self) -> &[(usize, usize, usize)] {
        &self.frames
    }

    /// Cost matrices with the track id of each row.
    pub fn cost_matrix_events(&self) -> &[(usize, Vec<TrackId>, Array2<f64>)] {
        &self.cost_matrices
    }

    /// Accepted matches.
    pub fn match_events(&self) -> &[MatchEvent] {
        &self.matches
    }

    /// Matches rejected by the gate.
    pub fn rejection_events(&self) -> &[MatchEvent] {
        &self.rejections
    }

    /// Track starts.
    pub fn started_events(&self) -> &[StartEvent] {
        &self.starts
    }

    /// Track retirements.
    pub fn retired_events(&self) -> &[RetireEvent] {
        &self.retirements
    }

    /// Frame completions as (frame, live tracks).
    pub fn complete_events(&self) -> &[(usize, usize)] {
        &self.completes
    }

    /// Total number of captured events across all types.
    pub fn total_events(&self) -> usize {
        self.frames.len()
            + self.cost_matrices.len()
            + self.matches.len()
            + self.rejections.len()
            + self.starts.len()
            + self.retirements.len()
            + self.completes.len()
    }
}

impl TrackReporter for DebugReporter {
    fn on_frame_start(&mut self, frame: usize, active_tracks: usize, detections: usize) {
        self.frames.push((frame, active_tracks, detections));
    }

    fn on_cost_matrix(&mut self, frame: usize, rows: &[TrackId], cost: &Array2<f64>) {
        self.cost_matrices.push((frame, rows.to_vec(), cost.clone()));
    }

    fn on_match(&mut self, frame: usize, track: TrackId, detection: usize, cost: f64) {
        self.matches.push(MatchEvent {
            frame,
            track,
            detection,
            cost,
        });
    }

    fn on_gate_rejected(&mut self, frame: usize, track: TrackId, detection: usize, cost: f64) {
        self.rejections.push(MatchEvent {
            frame,
            track,
            detection,
            cost,
        });
    }

    fn on_track_started(&mut self, frame: usize, track: TrackId, detection: usize) {
        self.starts.push(StartEvent {
            frame,
            track,
            detection,
        });
    }

    fn on_track_retired(&mut self, frame: usize, track: TrackId, last_frame: usize) {
        self.retirements.push(RetireEvent {
            frame,
            track,
            last_frame,
        });
    }

    fn on_frame_complete(&mut self, frame: usize, live_tracks: usize) {
        self.completes.push((frame, live_tracks));
    }
}

// ============================================================================
// LoggingReporter
// ============================================================================

/// Reporter that emits events through the `log` crate.
///
/// # Log Levels
///
/// - `on_frame_complete`: DEBUG
/// - `on_track_started`, `on_track_retired`, `on_gate_rejected`: DEBUG
/// - `on_frame_start`, `on_match`, `on_cost_matrix`: TRACE
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter {
    /// Whether to dump full cost matrices at TRACE level
    verbose: bool,
}

impl LoggingReporter {
    /// Create a new logging reporter.
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Create a verbose logging reporter that also dumps cost matrices.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl TrackReporter for LoggingReporter {
    fn on_frame_start(&mut self, frame: usize, active_tracks: usize, detections: usize) {
        log::trace!(
            "Frame {}: {} active tracks, {} detections",
            frame,
            active_tracks,
            detections
        );
    }

    fn on_cost_matrix(&mut self, frame: usize, rows: &[TrackId], cost: &Array2<f64>) {
        log::trace!(
            "Frame {}: cost matrix {} tracks × {} detections",
            frame,
            rows.len(),
            cost.ncols()
        );
        if self.verbose {
            log::trace!("{:.3}", cost);
        }
    }

    fn on_match(&mut self, frame: usize, track: TrackId, detection: usize, cost: f64) {
        log::trace!(
            "Frame {}: track {} <- detection {} (cost {:.3})",
            frame,
            track,
            detection,
            cost
        );
    }

    fn on_gate_rejected(&mut self, frame: usize, track: TrackId, detection: usize, cost: f64) {
        log::debug!(
            "Frame {}: gate rejected track {} -> detection {} (cost {:.3})",
            frame,
            track,
            detection,
            cost
        );
    }

    fn on_track_started(&mut self, frame: usize, track: TrackId, detection: usize) {
        log::debug!("Frame {}: track {} started at detection {}", frame, track, detection);
    }

    fn on_track_retired(&mut self, frame: usize, track: TrackId, last_frame: usize) {
        log::debug!(
            "Frame {}: track {} retired (last seen in frame {})",
            frame,
            track,
            last_frame
        );
    }

    fn on_frame_complete(&mut self, frame: usize, live_tracks: usize) {
        log::debug!("Frame {} complete: {} live tracks", frame, live_tracks);
    }
}

// ============================================================================
// CompositeReporter
// ============================================================================

/// Reporter that forwards events to two child reporters.
#[derive(Debug, Clone)]
pub struct CompositeReporter<A: TrackReporter, B: TrackReporter> {
    first: A,
    second: B,
}

impl<A: TrackReporter, B: TrackReporter> CompositeReporter<A, B> {
    /// Create a new composite reporter.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Get the first reporter.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Get the first reporter mutably.
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// Get the second reporter.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Get the second reporter mutably.
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }

    /// Consume and return both reporters.
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: TrackReporter, B: TrackReporter> TrackReporter for CompositeReporter<A, B> {
    fn on_frame_start(&mut self, frame: usize, active_tracks: usize, detections: usize) {
        self.first.on_frame_start(frame, active_tracks, detections);
        self.second.on_frame_start(frame, active_tracks, detections);
    }

    fn on_cost_matrix(&mut self, frame: usize, rows: &[TrackId], cost: &Array2<f64>) {
        self.first.on_cost_matrix(frame, rows, cost);
        self.second.on_cost_matrix(frame, rows, cost);
    }

    fn on_match(&mut self, frame: usize, track: TrackId, detection: usize, cost: f64) {
        self.first.on_match(frame, track, detection, cost);
        self.second.on_match(frame, track, detection, cost);
    }

    fn on_gate_rejected(&mut self, frame: usize, track: TrackId, detection: usize, cost: f64) {
        self.first.on_gate_rejected(frame, track, detection, cost);
        self.second.on_gate_rejected(frame, track, detection, cost);
    }

    fn on_track_started(&mut self, frame: usize, track: TrackId, detection: usize) {
        self.first.on_track_started(frame, track, detection);
        self.second.on_track_started(frame, track, detection);
    }

    fn on_track_retired(&mut self, frame: usize, track: TrackId, last_frame: usize) {
        self.first.on_track_retired(frame, track, last_frame);
        self.second.on_track_retired(frame, track, last_frame);
    }

    fn on_frame_complete(&mut self, frame: usize, live_tracks: usize) {
        self.first.on_frame_complete(frame, live_tracks);
        self.second.on_frame_complete(frame, live_tracks);
    }
}

// ============================================================================
// Tests
// ============================================================================
