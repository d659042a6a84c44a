use crate::Entropy;
use crate::Probability;

/// Failures that abort a single transport solve.
///
/// Numerical divergence is deliberately absent: NaN and Inf flow through the
/// potentials as ordinary values and are left for the caller to flag.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The two point clouds live in spaces of different dimension.
    #[error("shape mismatch: source points are {lhs}-dimensional, target points are {rhs}-dimensional")]
    ShapeMismatch { lhs: usize, rhs: usize },
    /// A weight whose logarithm is undefined.
    #[error("weight {weight} at index {index} is not positive")]
    NonPositiveWeight { index: usize, weight: Probability },
    /// The blur scale must be a positive finite number.
    #[error("blur scale {0} is not positive and finite")]
    NonPositiveBlur(Entropy),
    /// The ε-scaling ratio must lie strictly between 0 and 1.
    #[error("scaling {0} is not in (0, 1)")]
    InvalidScaling(Entropy),
    /// Weights and locations disagree on the number of points.
    #[error("{weights} weights for {points} points")]
    LengthMismatch { weights: usize, points: usize },
    /// Weights do not sum to one.
    #[error("total mass {0} is not 1")]
    Unnormalized(Probability),
    /// A point whose dimension differs from the first point's.
    #[error("point {index} has dimension {dimension}, expected {expected}")]
    RaggedPoint {
        index: usize,
        dimension: usize,
        expected: usize,
    },
    /// Measures need at least one point of dimension at least one.
    #[error("empty measure")]
    Empty,
}
