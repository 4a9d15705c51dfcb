use nalgebra::{Matrix2, Point3, Vector2, Vector3};

const ZERO_COMPONENT_TOLERANCE: f64 = 1e-12;
const SINGULAR_DETERMINANT_TOLERANCE: f64 = 1e-10;
/// Relative shrink applied to a circle before testing containment, so that
/// points lying on the circle up to rounding are not counted as inside.
pub const CONTAINMENT_TOLERANCE: f64 = 1e-9;

/// A circle in 3D space, described by its center and chordal radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl Circle {
    /// Whether `point` lies strictly inside the ball bounded by this circle.
    /// Points within [`CONTAINMENT_TOLERANCE`] (relative) of the boundary are
    /// treated as on it.
    #[inline]
    pub fn strictly_contains(&self, point: &Point3<f64>) -> bool {
        (point - self.center).norm() < self.radius * (1.0 - CONTAINMENT_TOLERANCE)
    }
}

/// A pair of coordinate axes onto which the bisector intersection is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPair {
    XY,
    XZ,
    YZ,
}

impl AxisPair {
    /// Candidate pairs in priority order.
    pub const PRIORITY: [AxisPair; 3] = [AxisPair::XY, AxisPair::XZ, AxisPair::YZ];

    #[inline]
    fn project(self, v: &Vector3<f64>) -> Vector2<f64> {
        match self {
            AxisPair::XY => Vector2::new(v.x, v.y),
            AxisPair::XZ => Vector2::new(v.x, v.z),
            AxisPair::YZ => Vector2::new(v.y, v.z),
        }
    }
}

/// A line within the plane of a triangle, given by a point and a unit direction.
#[derive(Debug, Clone, Copy)]
struct Bisector {
    midpoint: Point3<f64>,
    direction: Vector3<f64>,
}

impl Bisector {
    fn of_chord(from: &Point3<f64>, to: &Point3<f64>, plane_normal: &Vector3<f64>) -> Option<Self> {
        let direction = plane_normal.cross(&(to - from)).try_normalize(0.0)?;
        Some(Self {
            midpoint: nalgebra::center(from, to),
            direction,
        })
    }
}

/// Computes the circle passing through three points.
///
/// The center is found by intersecting the perpendicular bisectors of chords
/// `a-b` and `a-c` within the plane of the triangle. The intersection is solved
/// as a 2x2 system on the first usable axis pair (`XY`, then `XZ`, then `YZ`).
/// Returns `None` when the points are collinear or coincident, i.e. when no
/// axis pair yields a non-degenerate system.
pub fn circumcircle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Circle> {
    let plane_normal = (b - a).cross(&(c - a));
    let first = Bisector::of_chord(a, b, &plane_normal)?;
    let second = Bisector::of_chord(a, c, &plane_normal)?;

    let axes = AxisPair::PRIORITY
        .into_iter()
        .find(|&axes| is_usable_axis_pair(axes, &first, &second))?;

    let d1 = axes.project(&first.direction);
    let d2 = axes.project(&second.direction);
    let rhs = axes.project(&(second.midpoint - first.midpoint));

    // first.midpoint + s * d1 == second.midpoint + t * d2
    let system = Matrix2::new(d1.x, -d2.x, d1.y, -d2.y);
    let solution = system.try_inverse()? * rhs;

    let center = first.midpoint + first.direction * solution.x;
    let radius = (a - center).norm();
    if !radius.is_finite() {
        return None;
    }
    Some(Circle { center, radius })
}

fn is_usable_axis_pair(axes: AxisPair, first: &Bisector, second: &Bisector) -> bool {
    let d1 = axes.project(&first.direction);
    let d2 = axes.project(&second.direction);

    let vanishes = |v: &Vector2<f64>| {
        v.x.abs() <= ZERO_COMPONENT_TOLERANCE && v.y.abs() <= ZERO_COMPONENT_TOLERANCE
    };
    if vanishes(&d1) || vanishes(&d2) {
        return false;
    }

    let determinant = d2.x * d1.y - d1.x * d2.y;
    determinant.abs() > SINGULAR_DETERMINANT_TOLERANCE
}

/// Converts a straight-line distance between two sphere points into the
/// great-circle distance between them.
#[inline]
pub fn chord_to_arc_distance(chord: f64, sphere_radius: f64) -> f64 {
    (chord / (2.0 * sphere_radius)).clamp(-1.0, 1.0).asin() * sphere_radius * 2.0
}

/// Converts the chordal radius of a circle lying on the sphere into its
/// angular radius measured along the sphere surface.
#[inline]
pub fn chord_radius_to_arc_radius(chord_radius: f64, sphere_radius: f64) -> f64 {
    (chord_radius / sphere_radius).clamp(-1.0, 1.0).asin() * sphere_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn circumcircle_of_unit_axes_matches_analytical_circumradius() {
        let circle = circumcircle(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
        )
        .unwrap();

        let expected_radius = (2.0f64 / 3.0).sqrt();
        assert!(f64_approx_equal(circle.radius, expected_radius));
        let third = 1.0 / 3.0;
        assert!((circle.center - Point3::new(third, third, third)).norm() < TOLERANCE);
    }

    #[test]
    fn circumcircle_in_vertical_plane_falls_back_to_another_axis_pair() {
        // The triangle lies in the plane x = 0, so both bisectors project onto
        // the XY pair as parallel lines.
        let circle = circumcircle(
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(0.0, -1.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
        )
        .unwrap();

        assert!(f64_approx_equal(circle.radius, 1.0));
        assert!(circle.center.coords.norm() < TOLERANCE);
    }

    #[test]
    fn circumcircle_equidistant_from_all_vertices() {
        let a = Point3::new(0.3, -1.2, 2.0);
        let b = Point3::new(1.5, 0.4, -0.7);
        let c = Point3::new(-0.9, 2.2, 0.1);
        let circle = circumcircle(&a, &b, &c).unwrap();

        for p in [a, b, c] {
            assert!(f64_approx_equal((p - circle.center).norm(), circle.radius));
        }
    }

    #[test]
    fn collinear_points_yield_no_circle() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(2.0, 2.0, 2.0);
        let c = Point3::new(3.0, 3.0, 3.0);
        assert!(circumcircle(&a, &b, &c).is_none());
    }

    #[test]
    fn coincident_points_yield_no_circle() {
        let a = Point3::new(0.5, 0.5, 0.0);
        assert!(circumcircle(&a, &a, &Point3::new(1.0, 0.0, 0.0)).is_none());
        assert!(circumcircle(&a, &a, &a).is_none());
    }

    #[test]
    fn strictly_contains_excludes_boundary_points() {
        let circle = Circle {
            center: Point3::origin(),
            radius: 1.0,
        };
        assert!(circle.strictly_contains(&Point3::new(0.5, 0.0, 0.0)));
        assert!(!circle.strictly_contains(&Point3::new(2.0, 0.0, 0.0)));
        assert!(!circle.strictly_contains(&Point3::new(0.0, 0.0, 1.0 + 1e-12)));
    }

    #[test]
    fn strictly_contains_ignores_rounding_on_the_boundary() {
        let circle = Circle {
            center: Point3::origin(),
            radius: 0.80901699437494756,
        };
        assert!(!circle.strictly_contains(&Point3::new(0.80901699437494745, 0.0, 0.0)));
        assert!(circle.strictly_contains(&Point3::new(0.809, 0.0, 0.0)));
    }

    #[test]
    fn chord_to_arc_distance_handles_quarter_and_antipodal_chords() {
        assert!(f64_approx_equal(
            chord_to_arc_distance(2.0f64.sqrt(), 1.0),
            FRAC_PI_2
        ));
        assert!(f64_approx_equal(chord_to_arc_distance(4.0, 2.0), 2.0 * PI));
        assert!(!chord_to_arc_distance(2.0 + 1e-15, 1.0).is_nan());
    }

    #[test]
    fn chord_radius_to_arc_radius_of_great_circle_is_quarter_turn() {
        assert!(f64_approx_equal(
            chord_radius_to_arc_radius(3.0, 3.0),
            3.0 * FRAC_PI_2
        ));
        assert!(f64_approx_equal(chord_radius_to_arc_radius(0.0, 1.0), 0.0));
    }
}
