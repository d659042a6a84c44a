use super::error::TransportError;
use super::measure::Measure;
use crate::Coordinate;
use crate::Energy;
use rayon::prelude::*;
use std::ops::Range;

/// Ground cost between the points of a source and a target cloud,
/// C(x, y) = ½‖x − y‖².
///
/// The one capability the solvers need is "evaluate the cost block for these
/// index ranges". How the block is produced (copied out of a stored matrix or
/// computed from the coordinates on demand) is up to the implementation.
///
/// # Implementations
///
/// - [`Dense`] — materialized N×M matrix, O(N·M) memory
/// - [`Lazy`] — computed from coordinates per block, O(N + M) memory
pub trait Cost: Sync {
    /// (N, M): number of source and target points.
    fn shape(&self) -> (usize, usize);
    /// C_ij between source point `i` and target point `j`.
    fn cost(&self, i: usize, j: usize) -> Energy;
    /// Writes the `rows × cols` cost block into `out`, row-major.
    ///
    /// `out` must hold exactly `rows.len() * cols.len()` entries.
    fn block(&self, rows: Range<usize>, cols: Range<usize>, out: &mut [Energy]) {
        debug_assert!(out.len() == rows.len() * cols.len());
        if cols.is_empty() {
            return;
        }
        out.chunks_exact_mut(cols.len())
            .zip(rows)
            .for_each(|(line, i)| {
                line.iter_mut()
                    .zip(cols.clone())
                    .for_each(|(c, j)| *c = self.cost(i, j))
            });
    }
}

/// Choice of cost evaluation strategy. Both give the same numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Backend {
    /// Precompute the full cost matrix.
    Dense,
    /// Evaluate costs on demand.
    #[default]
    Lazy,
}

impl Backend {
    /// Builds the evaluator for this strategy over two measures.
    pub fn evaluate<'a>(
        self,
        x: &'a Measure,
        y: &'a Measure,
    ) -> Result<Evaluator<'a>, TransportError> {
        match self {
            Self::Dense => Dense::new(x, y).map(Evaluator::Dense),
            Self::Lazy => Lazy::new(x, y).map(Evaluator::Lazy),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Dense => write!(f, "dense"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

/// A [`Cost`] whose strategy was picked at runtime through [`Backend`].
pub enum Evaluator<'a> {
    Dense(Dense),
    Lazy(Lazy<'a>),
}

impl Cost for Evaluator<'_> {
    fn shape(&self) -> (usize, usize) {
        match self {
            Self::Dense(c) => c.shape(),
            Self::Lazy(c) => c.shape(),
        }
    }
    fn cost(&self, i: usize, j: usize) -> Energy {
        match self {
            Self::Dense(c) => c.cost(i, j),
            Self::Lazy(c) => c.cost(i, j),
        }
    }
    fn block(&self, rows: Range<usize>, cols: Range<usize>, out: &mut [Energy]) {
        match self {
            Self::Dense(c) => c.block(rows, cols, out),
            Self::Lazy(c) => c.block(rows, cols, out),
        }
    }
}

/// Fully materialized cost matrix.
///
/// Filled through the separable form ½‖x‖² + ½‖y‖² − ⟨x, y⟩, which needs
/// D multiply-adds per entry instead of an N×M×D difference broadcast.
pub struct Dense {
    matrix: Vec<Energy>,
    rows: usize,
    cols: usize,
}

impl Dense {
    pub fn new(x: &Measure, y: &Measure) -> Result<Self, TransportError> {
        dimensions(x, y)?;
        let (rows, cols) = (x.len(), y.len());
        let ref xx = norms(x);
        let ref yy = norms(y);
        let mut matrix = vec![0.; rows * cols];
        matrix
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(i, line)| {
                let xi = x.point(i);
                line.iter_mut()
                    .zip(y.points())
                    .zip(yy)
                    .for_each(|((c, yj), half)| {
                        // cancellation can leave tiny negatives when x ≈ y
                        *c = (xx[i] + half - dot(xi, yj)).max(0.);
                    })
            });
        Ok(Self { matrix, rows, cols })
    }
    /// Row `i` of the matrix.
    pub fn row(&self, i: usize) -> &[Energy] {
        &self.matrix[i * self.cols..(i + 1) * self.cols]
    }
}

impl Cost for Dense {
    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    fn cost(&self, i: usize, j: usize) -> Energy {
        self.matrix[i * self.cols + j]
    }
    fn block(&self, rows: Range<usize>, cols: Range<usize>, out: &mut [Energy]) {
        debug_assert!(out.len() == rows.len() * cols.len());
        if cols.is_empty() {
            return;
        }
        out.chunks_exact_mut(cols.len())
            .zip(rows)
            .for_each(|(line, i)| line.copy_from_slice(&self.row(i)[cols.clone()]));
    }
}

/// Symbolic cost matrix: only the two coordinate buffers are held,
/// every entry is computed when a block is requested.
pub struct Lazy<'a> {
    x: &'a Measure,
    y: &'a Measure,
}

impl<'a> Lazy<'a> {
    pub fn new(x: &'a Measure, y: &'a Measure) -> Result<Self, TransportError> {
        dimensions(x, y)?;
        Ok(Self { x, y })
    }
}

impl Cost for Lazy<'_> {
    fn shape(&self) -> (usize, usize) {
        (self.x.len(), self.y.len())
    }
    fn cost(&self, i: usize, j: usize) -> Energy {
        self.x
            .point(i)
            .iter()
            .zip(self.y.point(j))
            .map(|(a, b)| a - b)
            .map(|d| d * d)
            .sum::<Energy>()
            / 2.
    }
}

fn dimensions(x: &Measure, y: &Measure) -> Result<(), TransportError> {
    match x.dimension() == y.dimension() {
        true => Ok(()),
        false => Err(TransportError::ShapeMismatch {
            lhs: x.dimension(),
            rhs: y.dimension(),
        }),
    }
}

/// Halved squared norm of every point.
fn norms(measure: &Measure) -> Vec<Energy> {
    measure.points().map(|p| dot(p, p) / 2.).collect()
}

fn dot(a: &[Coordinate], b: &[Coordinate]) -> Energy {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;

    #[test]
    fn dense_and_lazy_agree() {
        let x = Measure::random();
        let y = Measure::random();
        let dense = Dense::new(&x, &y).unwrap();
        let lazy = Lazy::new(&x, &y).unwrap();
        assert_eq!(dense.shape(), lazy.shape());
        for i in 0..x.len() {
            for j in 0..y.len() {
                let (a, b) = (dense.cost(i, j), lazy.cost(i, j));
                assert!(
                    (a - b).abs() <= 1e-5 * b.abs() + 1e-9,
                    "C[{}, {}]: dense {} vs lazy {}",
                    i,
                    j,
                    a,
                    b
                );
            }
        }
    }
    #[test]
    fn blocks_agree() {
        let x = Measure::random();
        let y = Measure::random();
        let dense = Backend::Dense.evaluate(&x, &y).unwrap();
        let lazy = Backend::Lazy.evaluate(&x, &y).unwrap();
        let ref mut a = vec![0.; 5 * 7];
        let ref mut b = vec![0.; 5 * 7];
        dense.block(3..8, 10..17, a);
        lazy.block(3..8, 10..17, b);
        assert!(a.iter().zip(b.iter()).all(|(a, b)| (a - b).abs() < 1e-9));
        assert!((a[7 + 2] - lazy.cost(4, 12)).abs() < 1e-9);
    }
    #[test]
    fn half_squared_distance() {
        let x = Measure::uniform(vec![vec![0., 0., 0.]]).unwrap();
        let y = Measure::uniform(vec![vec![1., 2., 2.]]).unwrap();
        assert_eq!(Lazy::new(&x, &y).unwrap().cost(0, 0), 4.5);
        assert!((Dense::new(&x, &y).unwrap().cost(0, 0) - 4.5).abs() < 1e-12);
    }
    #[test]
    fn dimension_mismatch() {
        let x = Measure::uniform(vec![vec![0., 0.]]).unwrap();
        let y = Measure::uniform(vec![vec![0., 0., 0.]]).unwrap();
        for backend in [Backend::Dense, Backend::Lazy] {
            assert!(matches!(
                backend.evaluate(&x, &y),
                Err(TransportError::ShapeMismatch { lhs: 2, rhs: 3 })
            ));
        }
    }
}
