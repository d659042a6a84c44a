use super::error::TransportError;
use crate::Arbitrary;
use crate::Coordinate;
use crate::Entropy;
use crate::Probability;

/// A discrete probability measure: weighted Dirac masses in ℝ^D.
///
/// Locations are stored as one flat row-major buffer of `len() * dimension()`
/// coordinates so that cost evaluators can walk them without indirection.
///
/// # Invariants
///
/// - at least one point, every point of the same dimension D ≥ 1
/// - one non-negative weight per point
/// - weights sum to 1 within [`MASS_TOLERANCE`](crate::MASS_TOLERANCE)
///
/// A `Measure` is immutable once built; derived measures
/// (e.g. [`subsample`](Measure::subsample)) are new values.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    weights: Vec<Probability>,
    locations: Vec<Coordinate>,
    dimension: usize,
}

impl Measure {
    /// Builds a measure from per-point weights and coordinates.
    pub fn new(
        weights: Vec<Probability>,
        points: Vec<Vec<Coordinate>>,
    ) -> Result<Self, TransportError> {
        let dimension = Self::dimension_of(&points)?;
        let locations = points.into_iter().flatten().collect::<Vec<_>>();
        Self::from_flat(weights, locations, dimension)
    }

    /// Builds a measure from a flat row-major coordinate buffer.
    pub fn from_flat(
        weights: Vec<Probability>,
        locations: Vec<Coordinate>,
        dimension: usize,
    ) -> Result<Self, TransportError> {
        if dimension == 0 || weights.is_empty() {
            return Err(TransportError::Empty);
        }
        if weights.len() * dimension != locations.len() {
            return Err(TransportError::LengthMismatch {
                weights: weights.len(),
                points: locations.len() / dimension,
            });
        }
        if let Some((index, &weight)) = weights.iter().enumerate().find(|(_, w)| !(**w >= 0.)) {
            return Err(TransportError::NonPositiveWeight { index, weight });
        }
        let mass = weights.iter().sum::<Probability>();
        if !((mass - 1.).abs() <= crate::MASS_TOLERANCE) {
            return Err(TransportError::Unnormalized(mass));
        }
        Ok(Self {
            weights,
            locations,
            dimension,
        })
    }

    /// Equal weight on every point.
    pub fn uniform(points: Vec<Vec<Coordinate>>) -> Result<Self, TransportError> {
        let n = points.len().max(1) as Probability;
        let weights = vec![1. / n; points.len()];
        Self::new(weights, points)
    }

    /// Rescales arbitrary non-negative weights so that they sum to one.
    pub fn normalized(
        weights: Vec<Probability>,
        points: Vec<Vec<Coordinate>>,
    ) -> Result<Self, TransportError> {
        let mass = weights.iter().sum::<Probability>();
        let weights = weights.into_iter().map(|w| w / mass).collect();
        Self::new(weights, points)
    }

    /// Quasi-uniform sampling of the unit sphere in ℝ³ (Fibonacci lattice).
    pub fn sphere(n: usize) -> Result<Self, TransportError> {
        let golden = std::f64::consts::PI * (3. - 5f64.sqrt());
        let points = (0..n)
            .map(|i| {
                let z = 1. - (2. * i as Coordinate + 1.) / n as Coordinate;
                let r = (1. - z * z).max(0.).sqrt();
                let phi = golden * i as Coordinate;
                vec![r * phi.cos(), r * phi.sin(), z]
            })
            .collect();
        Self::uniform(points)
    }

    /// Random cloud in the cube [-1, 1]^D with random positive weights.
    pub fn scatter<R>(n: usize, dimension: usize, rng: &mut R) -> Result<Self, TransportError>
    where
        R: rand::Rng,
    {
        let points = (0..n)
            .map(|_| {
                (0..dimension)
                    .map(|_| rng.random_range(-1.0..1.0))
                    .collect()
            })
            .collect();
        let weights = (0..n).map(|_| rng.random_range(0.1..1.0)).collect();
        Self::normalized(weights, points)
    }

    /// Keeps every `decimation`-th point and renormalizes the weights.
    pub fn subsample(&self, decimation: usize) -> Result<Self, TransportError> {
        let step = decimation.max(1);
        let (weights, points) = self
            .points()
            .zip(self.weights.iter())
            .step_by(step)
            .map(|(x, &w)| (w, x.to_vec()))
            .unzip::<_, _, Vec<_>, Vec<_>>();
        Self::normalized(weights, points)
    }

    /// Number of points N.
    pub fn len(&self) -> usize {
        self.weights.len()
    }
    /// Always false: measures hold at least one point.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
    /// Ambient dimension D.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
    pub fn weights(&self) -> &[Probability] {
        &self.weights
    }
    /// Flat row-major N×D coordinates.
    pub fn locations(&self) -> &[Coordinate] {
        &self.locations
    }
    /// Coordinates of point `i`.
    pub fn point(&self, i: usize) -> &[Coordinate] {
        &self.locations[i * self.dimension..(i + 1) * self.dimension]
    }
    pub fn points(&self) -> impl Iterator<Item = &[Coordinate]> {
        self.locations.chunks_exact(self.dimension)
    }
    /// Total mass; 1 up to rounding.
    pub fn mass(&self) -> Probability {
        self.weights.iter().sum()
    }

    /// Element-wise log of the weights. Fails on the first weight ≤ 0.
    pub fn log_weights(&self) -> Result<Vec<Entropy>, TransportError> {
        self.weights
            .iter()
            .enumerate()
            .map(|(index, &weight)| match weight > 0. {
                true => Ok(weight.ln()),
                false => Err(TransportError::NonPositiveWeight { index, weight }),
            })
            .collect()
    }

    /// Per-axis (min, max) of the point cloud.
    pub fn extent(&self) -> Vec<(Coordinate, Coordinate)> {
        let init = vec![(Coordinate::INFINITY, Coordinate::NEG_INFINITY); self.dimension];
        self.points().fold(init, |mut bounds, x| {
            bounds
                .iter_mut()
                .zip(x)
                .for_each(|((lo, hi), &c)| (*lo, *hi) = (lo.min(c), hi.max(c)));
            bounds
        })
    }

    /// Diagonal of the bounding box that contains both clouds.
    pub fn diameter(&self, other: &Self) -> Result<Coordinate, TransportError> {
        if self.dimension != other.dimension {
            return Err(TransportError::ShapeMismatch {
                lhs: self.dimension,
                rhs: other.dimension,
            });
        }
        Ok(self
            .extent()
            .into_iter()
            .zip(other.extent())
            .map(|((a, b), (c, d))| a.max(b).max(c).max(d) - a.min(b).min(c).min(d))
            .map(|side| side * side)
            .sum::<Coordinate>()
            .sqrt())
    }

    fn dimension_of(points: &[Vec<Coordinate>]) -> Result<usize, TransportError> {
        let expected = points
            .first()
            .map(Vec::len)
            .filter(|d| *d > 0)
            .ok_or(TransportError::Empty)?;
        match points.iter().position(|x| x.len() != expected) {
            None => Ok(expected),
            Some(index) => Err(TransportError::RaggedPoint {
                index,
                dimension: points[index].len(),
                expected,
            }),
        }
    }
}

impl Arbitrary for Measure {
    fn random() -> Self {
        Self::scatter(
            crate::ARBITRARY_POINTS,
            crate::ARBITRARY_DIMENSION,
            &mut rand::rng(),
        )
        .expect("positive weights normalize")
    }
}
