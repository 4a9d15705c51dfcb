use crate::engine::config::ConfigError;
use nalgebra::Point3;
use std::f64::consts::PI;
use std::ops::Index;

/// Largest lattice accepted by [`Lattice::generate`].
pub const MAX_LATTICE_SIZE: usize = 1 << 24;

/// The fixed, ordered set of candidate points on the sphere surface.
///
/// Index 0 is the north pole `(0, 0, r)` and the last index is the south pole
/// `(0, 0, -r)`. In between are `stacks - 1` rings ordered by increasing polar
/// angle, each holding `slices` points ordered by increasing azimuth starting
/// from the x-axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    radius: f64,
    slices: usize,
    stacks: usize,
    points: Vec<Point3<f64>>,
}

impl Lattice {
    pub fn generate(radius: f64, slices: usize, stacks: usize) -> Result<Self, ConfigError> {
        let size = validate_dimensions(radius, slices, stacks)?;

        let mut points = Vec::with_capacity(size);
        points.push(Point3::new(0.0, 0.0, radius));

        for ring in 0..stacks - 1 {
            let polar = (ring + 1) as f64 * PI / stacks as f64;
            let (sin_polar, cos_polar) = polar.sin_cos();
            for slot in 0..slices {
                let azimuth = slot as f64 * 2.0 * PI / slices as f64;
                let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
                points.push(Point3::new(
                    sin_polar * cos_azimuth * radius,
                    sin_polar * sin_azimuth * radius,
                    cos_polar * radius,
                ));
            }
        }

        points.push(Point3::new(0.0, 0.0, -radius));

        Ok(Self {
            radius,
            slices,
            stacks,
            points,
        })
    }

    /// Number of lattice points for the given dimensions: `(stacks - 1) * slices + 2`.
    /// `None` if the count does not fit in a `usize`.
    #[inline]
    pub fn size_for(slices: usize, stacks: usize) -> Option<usize> {
        stacks.saturating_sub(1).checked_mul(slices)?.checked_add(2)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn slices(&self) -> usize {
        self.slices
    }

    pub fn stacks(&self) -> usize {
        self.stacks
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point3<f64>> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Resolves a placement's indices to coordinates.
    ///
    /// Returns `None` if any index lies outside the lattice.
    pub fn resolve(&self, indices: &[usize]) -> Option<Vec<Point3<f64>>> {
        indices.iter().map(|&i| self.points.get(i).copied()).collect()
    }
}

impl Index<usize> for Lattice {
    type Output = Point3<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

/// Checks lattice dimensions and returns the resulting number of points.
pub(crate) fn validate_dimensions(
    radius: f64,
    slices: usize,
    stacks: usize,
) -> Result<usize, ConfigError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name: "radius",
            reason: format!("must be a finite positive number, got {}", radius),
        });
    }
    if slices < 1 {
        return Err(ConfigError::InvalidParameter {
            name: "slices",
            reason: format!("must be at least 1, got {}", slices),
        });
    }
    if stacks < 2 {
        return Err(ConfigError::InvalidParameter {
            name: "stacks",
            reason: format!("must be at least 2, got {}", stacks),
        });
    }
    match Lattice::size_for(slices, stacks) {
        Some(size) if size <= MAX_LATTICE_SIZE => Ok(size),
        _ => Err(ConfigError::InvalidParameter {
            name: "slices",
            reason: format!(
                "{} slices by {} stacks exceeds the maximum of {} lattice points",
                slices, stacks, MAX_LATTICE_SIZE
            ),
        }),
    }
}
