//! Radius-bounded spatial join between the two channels of one frame
//!
//! Channel-2 points are indexed in a [`KdTree`] (built from the `kd_tree`
//! crate) once per frame; each channel-1 point then queries every indexed
//! point within the association radius. The relation is many-to-many.

use kd_tree::{KdPoint, KdTree};

use crate::types::Point;

/// Channel-2 point position plus its index in the frame's input slice
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    index: usize,
    xy: [f64; 2],
}

impl KdPoint for IndexedPoint {
    type Scalar = f64;
    type Dim = typenum::U2;
    fn at(&self, k: usize) -> f64 {
        self.xy[k]
    }
}

/// A joined (channel-1, channel-2) index pair and its separation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinMatch {
    /// Index into the channel-1 slice
    pub source: usize,
    /// Index into the channel-2 slice
    pub target: usize,
    /// Euclidean separation
    pub distance: f64,
}

/// Spatial index over the channel-2 points of one frame
pub struct FrameIndex {
    tree: KdTree<IndexedPoint>,
}

impl FrameIndex {
    /// Build the index over `targets`
    pub fn build(targets: &[Point]) -> Self {
        let items = targets
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedPoint {
                index,
                xy: [p.x, p.y],
            })
            .collect();
        Self {
            tree: KdTree::build_by_ordered_float(items),
        }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Indices and distances of every indexed point with distance <= `radius`
    /// from `(x, y)`, sorted by index.
    pub fn within(&self, x: f64, y: f64, radius: f64) -> Vec<(usize, f64)> {
        // The tree is only a prefilter; the inclusive bound is applied below.
        let search = radius + radius.abs() * 1e-9 + f64::EPSILON;
        let mut hits: Vec<(usize, f64)> = self
            .tree
            .within_radius(&[x, y], search)
            .into_iter()
            .filter_map(|item| {
                let dx = item.xy[0] - x;
                let dy = item.xy[1] - y;
                let distance = (dx * dx + dy * dy).sqrt();
                (distance <= radius).then_some((item.index, distance))
            })
            .collect();
        hits.sort_unstable_by_key(|&(index, _)| index);
        hits
    }
}

/// Join every channel-1 point to all channel-2 points within `radius`.
///
/// Both slices are expected to belong to the same frame. Output is ordered by
/// channel-1 index, then channel-2 index.
pub fn join_frame(sources: &[Point], targets: &[Point], radius: f64) -> Vec<JoinMatch> {
    if sources.is_empty() || targets.is_empty() {
        return Vec::new();
    }

    let index = FrameIndex::build(targets);
    let mut matches = Vec::new();
    for (s, p) in sources.iter().enumerate() {
        for (t, distance) in index.within(p.x, p.y, radius) {
            matches.push(JoinMatch {
                source: s,
                target: t,
                distance,
            });
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channel;

    fn c1(x: f64, y: f64) -> Point {
        Point::new(0, Channel::First, 1, x, y, 1.0, 100.0)
    }

    fn c2(x: f64, y: f64) -> Point {
        Point::new(0, Channel::Second, 1, x, y, 1.0, 100.0)
    }

    #[test]
    fn test_empty_targets_yield_nothing() {
        assert!(join_frame(&[c1(0.0, 0.0)], &[], 10.0).is_empty());
        assert!(join_frame(&[], &[c2(0.0, 0.0)], 10.0).is_empty());
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let matches = join_frame(&[c1(0.0, 0.0)], &[c2(3.0, 4.0)], 5.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].distance, 5.0);
    }

    #[test]
    fn test_outside_radius_excluded() {
        let matches = join_frame(&[c1(0.0, 0.0)], &[c2(3.0, 4.0001)], 5.0);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_many_to_many() {
        let sources = [c1(0.0, 0.0), c1(10.0, 0.0)];
        let targets = [c2(5.0, 0.0), c2(100.0, 0.0), c2(-4.0, 0.0)];
        let matches = join_frame(&sources, &targets, 6.0);

        let pairs: Vec<(usize, usize)> = matches.iter().map(|m| (m.source, m.target)).collect();
        assert_eq!(pairs, vec![(0, 0), (0, 2), (1, 0)]);
    }

    #[test]
    fn test_matches_brute_force() {
        let sources: Vec<Point> = (0..20)
            .map(|i| c1((i * 37 % 101) as f64, (i * 53 % 89) as f64))
            .collect();
        let targets: Vec<Point> = (0..30)
            .map(|i| c2((i * 41 % 97) as f64, (i * 29 % 83) as f64))
            .collect();
        let radius = 15.0;

        let mut expected = Vec::new();
        for (s, a) in sources.iter().enumerate() {
            for (t, b) in targets.iter().enumerate() {
                let d = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
                if d <= radius {
                    expected.push((s, t));
                }
            }
        }

        let actual: Vec<(usize, usize)> = join_frame(&sources, &targets, radius)
            .iter()
            .map(|m| (m.source, m.target))
            .collect();
        assert_eq!(actual, expected);
    }
}
