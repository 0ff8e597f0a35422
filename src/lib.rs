/*!
# dipole-track - Two-channel dipole pairing and tracking

Rust implementation of dipole association for two-channel single-molecule
localization data: the ends of each dipole are localized separately in two
channels, joined within a frame by proximity, annotated with their in-plane
and out-of-plane orientation, and linked across frames into tracks.

## Features

- Per-frame radius join of channel-1 and channel-2 localizations (kd-tree)
- Pair geometry: separation, in-plane angle phi, out-of-plane angle theta
- Gap-tolerant tracking with a gated Hungarian assignment on pair midpoints
- Trackwise output tables and summary statistics

## Modules

- [`pipeline`] - Batch driver: validation, join, geometry, tracking
- [`join`] - Spatial join within a frame
- [`geometry`] - Pair geometry
- [`tracker`] - Frame-to-frame identity assignment
- [`association`] - Cost matrices and the Hungarian solver
- [`output`] / [`analysis`] - Track tables and statistics

## Example

```rust
use dipole_track::{Channel, Pipeline, PipelineConfig, Point};

let config = PipelineConfig::new(232.0, 3, 400.0, 120.0);
let pipeline = Pipeline::new(config).unwrap();

let channel1 = vec![
    Point::new(1, Channel::First, 1, 0.0, 0.0, 5.0, 2000.0),
    Point::new(2, Channel::First, 2, 4.0, 0.0, 5.0, 2000.0),
];
let channel2 = vec![
    Point::new(1, Channel::Second, 1, 60.0, 0.0, 5.0, 2000.0),
    Point::new(2, Channel::Second, 2, 64.0, 0.0, 5.0, 2000.0),
];

let pairs = pipeline.run(&channel1, &channel2).unwrap();
assert_eq!(pairs.len(), 2);
assert_eq!(pairs[0].track, pairs[1].track);
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Error types
pub mod error;

/// Points, pairs and track identities
pub mod types;

/// Pipeline and tracker configuration
pub mod config;

/// Pair geometry (distance, phi, theta, midpoint)
pub mod geometry;

/// Per-frame spatial join
pub mod join;

/// Cost matrices and assignment
pub mod association;

/// Frame-to-frame tracking
pub mod tracker;

/// Observability hooks for the tracker
pub mod reporter;

/// Batch driver
pub mod pipeline;

// ============================================================================
// Pre- and post-processing
// ============================================================================

/// Threshold filtering of localizations
pub mod filter;

/// Flattened records and trackwise tables
pub mod output;

/// Correlation, variance and summary statistics
pub mod analysis;

/// Synthetic scenarios for tests and benchmarks
pub mod synthetic;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Core types
pub use types::{Channel, Pair, PairGeometry, Point, PointRecord, TrackId};

// Configuration
pub use config::{PipelineConfig, TrackerConfig};
pub use filter::{Bounds, PointFilter};

// Errors
pub use error::{AssignmentError, DipoleError, Result};

// Tracking
pub use pipeline::Pipeline;
pub use tracker::{TrackEntry, TrackState, Tracker};

// Reporters
pub use reporter::{CompositeReporter, DebugReporter, LoggingReporter, NoOpReporter, TrackReporter};

// Output
pub use output::{Measure, PairRecord, Trajectory, TrackwiseTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
