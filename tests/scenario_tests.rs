//! Tracking accuracy on synthetic diffusing dipoles, plus the downstream
//! trackwise tables and statistics

mod common;

use common::reference_config;
use dipole_track::analysis::{representative_tracks, summarize, track_variances};
use dipole_track::output::{group_by_track, to_json, trackwise_series};
use dipole_track::synthetic::{generate_scenario, track_purity, ScenarioParams};
use dipole_track::{Bounds, Measure, Pipeline, PointFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_sparse_scenario_tracks_are_pure() {
    let params = ScenarioParams::sparse(16, 30);
    let scenario = generate_scenario(&mut StdRng::seed_from_u64(42), &params).unwrap();
    let pipeline = Pipeline::new(reference_config()).unwrap();

    let pairs = pipeline.run(&scenario.channel1, &scenario.channel2).unwrap();

    assert!(!pairs.is_empty());
    // Dipoles are 2 um apart, so every joined pair comes from one dipole
    assert!(pairs.iter().all(|p| scenario.dipole_of(p).is_some()));
    assert_eq!(track_purity(&pairs, &scenario), Some(1.0));

    let trajectories = group_by_track(&pairs);
    assert!(trajectories.len() >= 16);
    assert!(trajectories.len() <= 24, "too many broken tracks: {}", trajectories.len());
}

#[test]
fn test_geometry_ranges_on_scenario() {
    let mut params = ScenarioParams::sparse(9, 20);
    params.dipole_length = 150.0;
    let scenario = generate_scenario(&mut StdRng::seed_from_u64(3), &params).unwrap();
    let pipeline = Pipeline::new(reference_config()).unwrap();

    let pairs = pipeline.run(&scenario.channel1, &scenario.channel2).unwrap();

    for pair in &pairs {
        assert!((0.0..360.0).contains(&pair.geometry.phi));
        assert!((0.0..=90.0).contains(&pair.geometry.theta));
        let expected = nalgebra::distance(&pair.source.position(), &pair.target.position());
        assert_eq!(pair.geometry.distance, expected);
        assert!(pair.geometry.distance <= 232.0);
    }
}

#[test]
fn test_filter_then_track() {
    let mut params = ScenarioParams::sparse(4, 10);
    params.detection_probability = 1.0;
    let scenario = generate_scenario(&mut StdRng::seed_from_u64(11), &params).unwrap();

    // Keep only the dipole that starts at the origin
    let roi = PointFilter::pass_all().with_roi(Bounds::new(-500.0, 500.0), Bounds::new(-500.0, 500.0));
    let ch1 = roi.apply(&scenario.channel1);
    let ch2 = roi.apply(&scenario.channel2);

    let pipeline = Pipeline::new(reference_config()).unwrap();
    let pairs = pipeline.run(&ch1, &ch2).unwrap();

    assert_eq!(pairs.len(), 10);
    assert_eq!(group_by_track(&pairs).len(), 1);
}

#[test]
fn test_trackwise_analysis() {
    let params = ScenarioParams::sparse(25, 50);
    let scenario = generate_scenario(&mut StdRng::seed_from_u64(5), &params).unwrap();
    let pipeline = Pipeline::new(reference_config()).unwrap();
    let pairs = pipeline.run(&scenario.channel1, &scenario.channel2).unwrap();

    let trajectories = group_by_track(&pairs);
    let table = trackwise_series(&trajectories, Measure::Theta, 1..=50);
    assert_eq!(table.frames.len(), 50);
    assert_eq!(table.tracks.len(), trajectories.len());
    let filled: usize = table.values.iter().flatten().filter(|v| v.is_some()).count();
    assert_eq!(filled, pairs.len());

    let variances = track_variances(&trajectories, Measure::Theta);
    assert!(variances.windows(2).all(|w| w[0].1 <= w[1].1));
    let picked = representative_tracks(&variances, 10);
    assert_eq!(picked.len(), 10.min(variances.len()));

    let summary = summarize(&pairs);
    assert_eq!(summary.num_pairs, pairs.len());
    assert_eq!(summary.num_tracks, trajectories.len());
    let mean = summary.mean_distance.unwrap();
    assert!((mean - params.dipole_length).abs() < 10.0, "mean distance {}", mean);

    let json = to_json(&pairs).unwrap();
    assert!(json.contains("\"track_id\""));
}
