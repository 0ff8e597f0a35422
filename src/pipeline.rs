//! Batch driver: validation, per-frame join and geometry, then tracking.
//!
//! The join and geometry stages are independent across frames and run in
//! parallel when the `rayon` feature is enabled. Tracking is always a single
//! sequential pass in ascending frame order.

use std::collections::BTreeMap;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::error::{DipoleError, Result};
use crate::geometry::annotate;
use crate::join::join_frame;
use crate::reporter::{NoOpReporter, TrackReporter};
use crate::tracker::Tracker;
use crate::types::{Channel, Pair, Point, PointRecord};

/// Full association + tracking pass over a closed dataset
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    tracker: Tracker,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let tracker = Tracker::new(config.tracker())?;
        Ok(Self { config, tracker })
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pass. See [`Pipeline::run_with_reporter`].
    pub fn run(&self, channel1: &[Point], channel2: &[Point]) -> Result<Vec<Pair>> {
        self.run_with_reporter(channel1, channel2, &mut NoOpReporter)
    }

    /// Validate and convert loosely-typed records, then run the full pass
    pub fn run_records(&self, channel1: &[PointRecord], channel2: &[PointRecord]) -> Result<Vec<Pair>> {
        let c1 = validate_records(channel1, Channel::First)?;
        let c2 = validate_records(channel2, Channel::Second)?;
        self.run(&c1, &c2)
    }

    /// Join, annotate and track.
    ///
    /// Returns every pair with its track identity filled in, ordered by frame
    /// and, within a frame, by channel-1 then channel-2 input order.
    pub fn run_with_reporter<R: TrackReporter>(
        &self,
        channel1: &[Point],
        channel2: &[Point],
        reporter: &mut R,
    ) -> Result<Vec<Pair>> {
        let mut pairs = self.annotate(channel1, channel2)?;
        let state = self.tracker.assign(&mut pairs, reporter)?;

        log::info!(
            "Tracking complete: {} pairs, {} tracks ({} live at last frame)",
            pairs.len(),
            state.num_allocated(),
            state.num_live()
        );
        Ok(pairs)
    }

    /// Join and annotate every frame without assigning tracks
    pub fn annotate(&self, channel1: &[Point], channel2: &[Point]) -> Result<Vec<Pair>> {
        validate_points(channel1, Channel::First)?;
        validate_points(channel2, Channel::Second)?;

        let by_frame1 = group_by_frame(channel1);
        let mut by_frame2 = group_by_frame(channel2);

        // Frames observed in only one channel cannot produce pairs
        let frames: Vec<(usize, Vec<Point>, Vec<Point>)> = by_frame1
            .into_iter()
            .filter_map(|(frame, c1)| by_frame2.remove(&frame).map(|c2| (frame, c1, c2)))
            .collect();

        log::debug!(
            "Joining {} frames (radius {} nm)",
            frames.len(),
            self.config.radius_threshold
        );

        let per_frame = self.annotate_frames(frames);
        let pairs: Vec<Pair> = per_frame.into_iter().flatten().collect();

        log::info!("Joined {} candidate dipole pairs", pairs.len());
        Ok(pairs)
    }

    #[cfg(feature = "rayon")]
    fn annotate_frames(&self, frames: Vec<(usize, Vec<Point>, Vec<Point>)>) -> Vec<Vec<Pair>> {
        frames
            .into_par_iter()
            .map(|(_, c1, c2)| self.annotate_frame(&c1, &c2))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn annotate_frames(&self, frames: Vec<(usize, Vec<Point>, Vec<Point>)>) -> Vec<Vec<Pair>> {
        frames
            .into_iter()
            .map(|(_, c1, c2)| self.annotate_frame(&c1, &c2))
            .collect()
    }

    fn annotate_frame(&self, c1: &[Point], c2: &[Point]) -> Vec<Pair> {
        join_frame(c1, c2, self.config.radius_threshold)
            .into_iter()
            .map(|m| {
                annotate(
                    c1[m.source].clone(),
                    c2[m.target].clone(),
                    self.config.nominal_length,
                )
            })
            .collect()
    }
}

fn validate_points(points: &[Point], channel: Channel) -> Result<()> {
    for (index, point) in points.iter().enumerate() {
        if point.channel != channel {
            return Err(DipoleError::InvalidPoint {
                index,
                channel,
                reason: format!("point is tagged {}", point.channel),
            });
        }
        point.validate(index)?;
    }
    Ok(())
}

fn validate_records(records: &[PointRecord], channel: Channel) -> Result<Vec<Point>> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| r.validate(i, channel))
        .collect()
}

/// Group points by frame, preserving input order within each frame
pub fn group_by_frame(points: &[Point]) -> BTreeMap<usize, Vec<Point>> {
    let mut frames: BTreeMap<usize, Vec<Point>> = BTreeMap::new();
    for point in points {
        frames.entry(point.frame).or_default().push(point.clone());
    }
    frames
}
