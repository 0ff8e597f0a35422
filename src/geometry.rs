//! Pair geometry: separation distance, orientation and cone angle
//!
//! All functions here are pure. Degenerate inputs (zero separation, distance
//! beyond the nominal length) are handled by clipping and never fail.

use nalgebra::Point2;

use crate::types::{Pair, PairGeometry, Point};

/// Orientation of the vector `from -> to` in degrees, normalized into `[0, 360)`.
#[inline]
pub fn phi_degrees(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    let d = to - from;
    (d.y.atan2(d.x).to_degrees() + 360.0) % 360.0
}

/// Cone angle in degrees from the clipped ratio `distance / nominal_length`.
///
/// `distance >= nominal_length` gives 0, `distance == 0` gives 90.
#[inline]
pub fn theta_degrees(distance: f64, nominal_length: f64) -> f64 {
    (distance / nominal_length).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Distance and both angles for the vector `from -> to`
pub fn pair_geometry(from: &Point2<f64>, to: &Point2<f64>, nominal_length: f64) -> PairGeometry {
    let distance = (to - from).norm();
    PairGeometry {
        distance,
        phi: phi_degrees(from, to),
        theta: theta_degrees(distance, nominal_length),
    }
}

/// Build an untracked [`Pair`] from a channel-1 and a channel-2 point
pub fn annotate(source: Point, target: Point, nominal_length: f64) -> Pair {
    let a = source.position();
    let b = target.position();
    Pair {
        geometry: pair_geometry(&a, &b, nominal_length),
        midpoint: nalgebra::center(&a, &b),
        source,
        target,
        track: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Channel;

    const EPS: f64 = 1e-10;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_phi_quadrants() {
        let o = p(0.0, 0.0);
        assert!((phi_degrees(&o, &p(1.0, 0.0)) - 0.0).abs() < EPS);
        assert!((phi_degrees(&o, &p(0.0, 1.0)) - 90.0).abs() < EPS);
        assert!((phi_degrees(&o, &p(-1.0, 0.0)) - 180.0).abs() < EPS);
        assert!((phi_degrees(&o, &p(0.0, -1.0)) - 270.0).abs() < EPS);
        assert!((phi_degrees(&o, &p(1.0, -1.0)) - 315.0).abs() < EPS);
    }

    #[test]
    fn test_phi_range_for_tiny_negative_angle() {
        let phi = phi_degrees(&p(0.0, 0.0), &p(1.0, -1e-17));
        assert!((0.0..360.0).contains(&phi));
    }

    #[test]
    fn test_theta_clipping() {
        assert_eq!(theta_degrees(0.0, 120.0), 90.0);
        assert_eq!(theta_degrees(120.0, 120.0), 0.0);
        assert_eq!(theta_degrees(240.0, 120.0), 0.0);
        assert!((theta_degrees(60.0, 120.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_euclidean() {
        let g = pair_geometry(&p(1.0, 2.0), &p(4.0, 6.0), 120.0);
        assert_eq!(g.distance, 5.0);
    }

    #[test]
    fn test_coincident_points() {
        let g = pair_geometry(&p(3.0, 3.0), &p(3.0, 3.0), 120.0);
        assert_eq!(g.distance, 0.0);
        assert_eq!(g.phi, 0.0);
        assert_eq!(g.theta, 90.0);
    }

    #[test]
    fn test_annotate_midpoint() {
        let a = Point::new(1, Channel::First, 5, 0.0, 0.0, 1.0, 100.0);
        let b = Point::new(2, Channel::Second, 5, 10.0, 20.0, 1.0, 100.0);
        let pair = annotate(a, b, 120.0);
        assert_eq!(pair.midpoint, p(5.0, 10.0));
        assert_eq!(pair.frame(), 5);
        assert!(pair.track.is_none());
    }
}
