use itertools::Itertools;
use nalgebra::Point3;

/// The closest pair within a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPair {
    /// Straight-line distance between the two points.
    pub distance: f64,
    /// Position (within the placement) of the earlier member of the pair.
    pub first: usize,
    /// Position (within the placement) of the later member of the pair.
    pub second: usize,
}

/// Finds the pair of points with the smallest chordal distance.
///
/// Pairs are visited with the first position ascending, then the second.
/// Ties resolve to the pair visited last. Returns `None` for fewer than two points.
pub fn closest_pair(points: &[Point3<f64>]) -> Option<ClosestPair> {
    let mut closest: Option<ClosestPair> = None;
    for (i, j) in (0..points.len()).tuple_combinations() {
        let distance = (points[i] - points[j]).norm();
        if closest.is_none_or(|c| distance <= c.distance) {
            closest = Some(ClosestPair {
                distance,
                first: i,
                second: j,
            });
        }
    }
    closest
}
