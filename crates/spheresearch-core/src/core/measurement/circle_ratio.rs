use super::distance::closest_pair;
use crate::core::utils::geometry::{
    Circle, chord_radius_to_arc_radius, chord_to_arc_distance, circumcircle,
};
use itertools::Itertools;
use nalgebra::Point3;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleRatio {
    /// `2 * min_arc_radius / min_arc_distance`; infinite when no empty circle exists.
    pub score: f64,
    /// The smallest empty circumcircle found, if any.
    pub smallest_empty_circle: Option<Circle>,
    pub min_arc_radius: f64,
    pub min_arc_distance: f64,
}

/// Scores a placement by the ratio of its smallest empty circumcircle to its
/// closest pair, both measured along the sphere surface.
///
/// Every triple of points defines a candidate circle; a circle counts only if
/// no other placement point lies strictly inside it. Degenerate triples
/// (collinear or coincident points) contribute no candidate.
pub fn circle_ratio(points: &[Point3<f64>], sphere_radius: f64) -> CircleRatio {
    let smallest_empty_circle = smallest_empty_circumcircle(points);

    let min_arc_distance = closest_pair(points)
        .map(|pair| chord_to_arc_distance(pair.distance, sphere_radius))
        .unwrap_or(f64::NAN);

    let min_arc_radius = smallest_empty_circle
        .map(|circle| chord_radius_to_arc_radius(circle.radius, sphere_radius))
        .unwrap_or(f64::INFINITY);

    let score = if smallest_empty_circle.is_some() && min_arc_distance > 0.0 {
        2.0 * min_arc_radius / min_arc_distance
    } else {
        f64::INFINITY
    };

    CircleRatio {
        score,
        smallest_empty_circle,
        min_arc_radius,
        min_arc_distance,
    }
}

fn smallest_empty_circumcircle(points: &[Point3<f64>]) -> Option<Circle> {
    let mut smallest: Option<Circle> = None;

    for (i, j, l) in (0..points.len()).tuple_combinations() {
        let Some(circle) = circumcircle(&points[i], &points[j], &points[l]) else {
            trace!(i, j, l, "Skipping degenerate triple.");
            continue;
        };

        if smallest.is_some_and(|s| circle.radius >= s.radius) {
            continue;
        }

        let is_empty = points
            .iter()
            .enumerate()
            .filter(|&(m, _)| m != i && m != j && m != l)
            .all(|(_, p)| !circle.strictly_contains(p));

        if is_empty {
            smallest = Some(circle);
        }
    }

    smallest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn single_triangle_score_matches_hand_computation() {
        let points = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let result = circle_ratio(&points, 1.0);

        let circle = result.smallest_empty_circle.unwrap();
        assert!((circle.radius - 0.816496580927726).abs() < TOLERANCE);

        let expected_arc_radius = (2.0f64 / 3.0).sqrt().asin();
        assert!((result.min_arc_radius - expected_arc_radius).abs() < TOLERANCE);
        assert!((result.min_arc_distance - FRAC_PI_2).abs() < TOLERANCE);
        assert!((result.score - 2.0 * expected_arc_radius / FRAC_PI_2).abs() < TOLERANCE);
        assert!((result.score - 1.216347).abs() < TOLERANCE);
    }

    #[test]
    fn circles_containing_other_points_are_not_empty() {
        // A wide triangle near the equator whose circumcircle swallows the
        // fourth point, and small triangles that stay empty.
        let points = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-0.5, 0.75f64.sqrt(), 0.0),
            Point3::new(-0.5, -(0.75f64.sqrt()), 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let result = circle_ratio(&points, 1.0);
        let circle = result.smallest_empty_circle.unwrap();

        // The equatorial great circle has radius 1 and is empty, but the
        // triangles through the pole are smaller.
        assert!(circle.radius < 1.0);
        assert!(result.score.is_finite());
    }

    #[test]
    fn cocircular_ring_points_do_not_block_their_own_circle() {
        use crate::core::lattice::Lattice;

        // All four indices lie on the same latitude ring of a 20x20 lattice, so
        // the fourth point sits on the circle through the other three.
        let lattice = Lattice::generate(1.0, 20, 20).unwrap();
        let points = lattice.resolve(&[101, 102, 107, 110]).unwrap();
        let result = circle_ratio(&points, 1.0);

        let circle = result.smallest_empty_circle.unwrap();
        assert!((circle.radius - 0.8090169943749475).abs() < TOLERANCE);
        assert!(result.score.is_finite());
        assert!((result.score - 7.427023970152266).abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_placement_yields_infinite_score_not_nan() {
        let points = [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
            Point3::new(3.0, 3.0, 3.0),
        ];
        let result = circle_ratio(&points, 1.0);
        assert!(result.smallest_empty_circle.is_none());
        assert_eq!(result.score, f64::INFINITY);
        assert!(!result.score.is_nan());
    }

    #[test]
    fn degenerate_triples_are_skipped_among_valid_ones() {
        let points = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let result = circle_ratio(&points, 1.0);
        assert!(result.smallest_empty_circle.is_some());
        // Duplicated points make the closest pair zero-length.
        assert_eq!(result.score, f64::INFINITY);
    }
}
