//! Summary statistics over tracked pairs
//!
//! Correlation between measures, per-track variance and the selection of
//! representative tracks around the median variance.

use serde::Serialize;

use crate::output::{Measure, Trajectory};
use crate::types::{Pair, TrackId};

/// Pearson correlation coefficient of two equal-length samples.
///
/// Returns `None` for mismatched lengths, fewer than two samples, or a
/// zero-variance sample.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n != ys.len() || n < 2 {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Correlation between two measures across all pairs
pub fn measure_correlation(pairs: &[Pair], a: Measure, b: Measure) -> Option<f64> {
    let xs: Vec<f64> = pairs.iter().map(|p| a.of(p)).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| b.of(p)).collect();
    pearson(&xs, &ys)
}

/// Circular mean of angles in degrees, normalized into `[0, 360)`.
///
/// `None` for an empty sample or when the unit vectors cancel out, which
/// leaves the mean direction undefined.
pub fn circular_mean_degrees(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let (sin, cos) = angles.iter().fold((0.0_f64, 0.0_f64), |(s, c), a| {
        let r = a.to_radians();
        (s + r.sin(), c + r.cos())
    });
    if sin.hypot(cos) <= 1e-12 * angles.len() as f64 {
        return None;
    }
    let mean = sin.atan2(cos).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    Some(if mean >= 360.0 { 0.0 } else { mean })
}

/// Unbiased sample variance; `None` below two samples
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(ss / (n - 1) as f64)
}

/// Sample variance of `measure` for each track with at least two samples,
/// sorted by ascending variance (ties by identity).
pub fn track_variances(trajectories: &[Trajectory], measure: Measure) -> Vec<(TrackId, f64)> {
    let mut variances: Vec<(TrackId, f64)> = trajectories
        .iter()
        .filter_map(|t| sample_variance(&t.values(measure)).map(|v| (t.track, v)))
        .collect();
    variances.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    variances
}

/// Pick `count` tracks centred on the median of `variances`.
///
/// `variances` must be sorted ascending, as returned by [`track_variances`].
/// The window is shifted inward at either end so that it always holds
/// `min(count, len)` tracks.
pub fn representative_tracks(variances: &[(TrackId, f64)], count: usize) -> Vec<TrackId> {
    let count = count.min(variances.len());
    let mid = variances.len() / 2;
    let start = mid
        .saturating_sub(count / 2)
        .min(variances.len() - count);
    variances[start..start + count]
        .iter()
        .map(|&(id, _)| id)
        .collect()
}

/// Batch-level summary of tracked pairs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub num_pairs: usize,
    pub num_tracks: usize,
    pub num_frames: usize,
    pub mean_distance: Option<f64>,
    /// Circular mean of phi in degrees; `None` when the directions cancel out
    pub mean_phi: Option<f64>,
    pub mean_theta: Option<f64>,
    /// Pearson correlation of phi against distance
    pub phi_distance_correlation: Option<f64>,
}

/// Summarize a set of tracked pairs
pub fn summarize(pairs: &[Pair]) -> Summary {
    let mean = |m: Measure| {
        (!pairs.is_empty()).then(|| pairs.iter().map(|p| m.of(p)).sum::<f64>() / pairs.len() as f64)
    };

    let mut tracks: Vec<TrackId> = pairs.iter().filter_map(|p| p.track).collect();
    tracks.sort_unstable();
    tracks.dedup();

    let mut frames: Vec<usize> = pairs.iter().map(Pair::frame).collect();
    frames.sort_unstable();
    frames.dedup();

    let phis: Vec<f64> = pairs.iter().map(|p| Measure::Phi.of(p)).collect();

    Summary {
        num_pairs: pairs.len(),
        num_tracks: tracks.len(),
        num_frames: frames.len(),
        mean_distance: mean(Measure::Distance),
        mean_phi: circular_mean_degrees(&phis),
        mean_theta: mean(Measure::Theta),
        phi_distance_correlation: measure_correlation(pairs, Measure::Phi, Measure::Distance),
    }
}
