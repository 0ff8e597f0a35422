//! Shared fixtures for integration tests

#![allow(dead_code)]

use dipole_track::{Channel, Pair, PipelineConfig, Point};

/// Configuration used throughout the batch analyses: R = 232 nm, 3-frame
/// gap tolerance, 400 nm gate and D0 = 120 nm.
pub fn reference_config() -> PipelineConfig {
    PipelineConfig::new(232.0, 3, 400.0, 120.0)
}

pub fn c1(id: u64, frame: usize, x: f64, y: f64) -> Point {
    Point::new(id, Channel::First, frame, x, y, 5.0, 2000.0)
}

pub fn c2(id: u64, frame: usize, x: f64, y: f64) -> Point {
    Point::new(id, Channel::Second, frame, x, y, 5.0, 2000.0)
}

/// Horizontal dipole of length `length` centred on (`x`, `y`), returned as
/// its channel-1 and channel-2 ends
pub fn dipole(id: u64, frame: usize, x: f64, y: f64, length: f64) -> (Point, Point) {
    let half = length / 2.0;
    (c1(id, frame, x - half, y), c2(id, frame, x + half, y))
}

/// Split dipoles into per-channel point lists
pub fn channels(dipoles: &[(Point, Point)]) -> (Vec<Point>, Vec<Point>) {
    dipoles.iter().cloned().unzip()
}

/// Raw track id of every pair, in output order
pub fn track_ids(pairs: &[Pair]) -> Vec<u64> {
    pairs
        .iter()
        .map(|p| p.track.map(|t| t.get()).unwrap_or(0))
        .collect()
}

pub fn assert_scalar_close(actual: f64, expected: f64, tolerance: f64, msg: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{}: expected {}, got {} (tolerance {})",
        msg,
        expected,
        actual,
        tolerance
    );
}
