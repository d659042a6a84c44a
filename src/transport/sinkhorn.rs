use super::cost::Backend;
use super::cost::Cost;
use super::error::TransportError;
use super::measure::Measure;
use super::potential::Duals;
use crate::Entropy;

/// Entropic optimal transport via the log-domain Sinkhorn loop.
///
/// Plain coordinate ascent on the dual problem at a fixed ε = σ².
///
/// # Algorithm
///
/// 1. Start from F = 0, G = 0
/// 2. Alternately update F (soft-min over targets) then G (soft-min over
///    sources, using the F just computed), exactly `iterations` times
/// 3. Return (F, G) in cost units
///
/// There is no convergence check. Accuracy is bought with iterations:
/// small `blur` needs many sweeps, and at extreme values the potentials may
/// overflow into NaN/∞, which is returned as is rather than repaired.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sinkhorn {
    /// Blur scale σ; ε = σ².
    pub blur: Entropy,
    /// Number of alternating sweeps T.
    pub iterations: usize,
    /// Cost evaluation strategy.
    pub backend: Backend,
}

impl Default for Sinkhorn {
    fn default() -> Self {
        Self {
            blur: crate::SINKHORN_BLUR,
            iterations: crate::SINKHORN_ITERATIONS,
            backend: Backend::default(),
        }
    }
}

impl Sinkhorn {
    pub fn new(blur: Entropy, iterations: usize, backend: Backend) -> Self {
        Self {
            blur,
            iterations,
            backend,
        }
    }

    /// Regularization strength ε = σ².
    pub fn epsilon(&self) -> Result<Entropy, TransportError> {
        epsilon(self.blur)
    }

    /// Solves between `x` and `y` with a freshly built cost evaluator.
    pub fn solve(&self, x: &Measure, y: &Measure) -> Result<Duals, TransportError> {
        let ref cost = self.backend.evaluate(x, y)?;
        self.solve_with(x, y, cost)
    }

    /// Solves between `x` and `y` over an existing cost evaluator.
    pub fn solve_with<C>(&self, x: &Measure, y: &Measure, cost: &C) -> Result<Duals, TransportError>
    where
        C: Cost,
    {
        debug_assert!(cost.shape() == (x.len(), y.len()));
        let eps = self.epsilon()?;
        let ref loga = x.log_weights()?;
        let ref logb = y.log_weights()?;
        let start = std::time::Instant::now();
        let mut duals = Duals::zeros(x.len(), y.len(), eps);
        for _ in 0..self.iterations {
            duals.sweep(cost, loga, logb, eps);
        }
        log::debug!(
            "sinkhorn {}x{} {:<6} ε={:.2e} T={:<6} {:?}",
            x.len(),
            y.len(),
            self.backend,
            eps,
            self.iterations,
            start.elapsed()
        );
        Ok(duals)
    }
}

/// ε = σ², for a positive finite σ.
pub(crate) fn epsilon(blur: Entropy) -> Result<Entropy, TransportError> {
    match blur.is_finite() && blur > 0. {
        true => Ok(blur * blur),
        false => Err(TransportError::NonPositiveBlur(blur)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::transport::Estimator;

    fn line(weights: Vec<f64>, xs: Vec<f64>) -> Measure {
        Measure::new(weights, xs.into_iter().map(|x| vec![x]).collect()).unwrap()
    }

    #[test]
    fn zero_iterations_is_noop() {
        let x = Measure::random();
        let y = Measure::random();
        let duals = Sinkhorn::new(0.1, 0, Backend::Lazy).solve(&x, &y).unwrap();
        assert!(duals.f().iter().all(|&f| f == 0.));
        assert!(duals.g().iter().all(|&g| g == 0.));
        assert_eq!(duals.f().len(), x.len());
        assert_eq!(duals.g().len(), y.len());
    }
    #[test]
    fn backends_agree() {
        let x = Measure::random();
        let y = Measure::random();
        let dense = Sinkhorn::new(0.3, 20, Backend::Dense).solve(&x, &y).unwrap();
        let lazy = Sinkhorn::new(0.3, 20, Backend::Lazy).solve(&x, &y).unwrap();
        assert!(dense.f().iter().zip(lazy.f()).all(|(a, b)| (a - b).abs() < 1e-8));
        assert!(dense.g().iter().zip(lazy.g()).all(|(a, b)| (a - b).abs() < 1e-8));
    }
    #[test]
    fn identical_measures_cost_nothing() {
        let x = line(vec![0.5, 0.5], vec![0., 1.]);
        let y = line(vec![0.5, 0.5], vec![0., 1.]);
        let solver = Sinkhorn::new(0.1, 50, Backend::Lazy);
        let ref cost = solver.backend.evaluate(&x, &y).unwrap();
        let duals = solver.solve_with(&x, &y, cost).unwrap();
        let primal = Estimator::Primal.estimate(&x, &y, &duals, cost);
        assert!(primal.abs() < 1e-3, "primal cost {}", primal);
        // the dual objective keeps the entropic offset ε·log 2
        let dual = Estimator::Dual.estimate(&x, &y, &duals, cost);
        assert!((dual - 0.01 * 2f64.ln()).abs() < 1e-6, "dual cost {}", dual);
    }
    #[test]
    fn single_points_cost_half_squared_distance() {
        let x = line(vec![1.], vec![0.]);
        let y = line(vec![1.], vec![1.]);
        for blur in [0.5, 0.1, 0.01] {
            let solver = Sinkhorn::new(blur, 100, Backend::Dense);
            let ref cost = solver.backend.evaluate(&x, &y).unwrap();
            let duals = solver.solve_with(&x, &y, cost).unwrap();
            for estimator in [Estimator::Dual, Estimator::Primal] {
                let estimate = estimator.estimate(&x, &y, &duals, cost);
                assert!((estimate - 0.5).abs() < blur, "{:?} {}", estimator, estimate);
            }
        }
    }
    #[test]
    fn more_iterations_do_not_drift_away() {
        let x = Measure::random().subsample(4).unwrap();
        let y = Measure::random().subsample(4).unwrap();
        let reference = Sinkhorn::new(0.3, 5000, Backend::Lazy).solve(&x, &y).unwrap();
        let ref cost = Backend::Lazy.evaluate(&x, &y).unwrap();
        let truth = Estimator::Dual.estimate(&x, &y, &reference, cost);
        let errors = [1, 2, 5, 10, 20, 50, 100, 500]
            .into_iter()
            .map(|t| Sinkhorn::new(0.3, t, Backend::Lazy).solve(&x, &y).unwrap())
            .map(|d| Estimator::Dual.estimate(&x, &y, &d, cost))
            .map(|c| (c - truth).abs())
            .collect::<Vec<_>>();
        for window in errors.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-9,
                "error increasing: {} -> {}",
                window[0],
                window[1]
            );
        }
    }
    #[test]
    fn rejects_zero_weight() {
        let x = line(vec![1., 0.], vec![0., 1.]);
        let y = line(vec![1.], vec![0.]);
        assert_eq!(
            Sinkhorn::new(0.1, 1, Backend::Lazy).solve(&x, &y),
            Err(TransportError::NonPositiveWeight {
                index: 1,
                weight: 0.
            })
        );
    }
    #[test]
    fn rejects_bad_blur() {
        let x = Measure::random();
        for blur in [0., -1., f64::NAN] {
            assert!(matches!(
                Sinkhorn::new(blur, 1, Backend::Lazy).solve(&x, &x),
                Err(TransportError::NonPositiveBlur(_))
            ));
        }
    }
    #[test]
    fn rejects_dimension_mismatch() {
        let x = line(vec![1.], vec![0.]);
        let y = Measure::uniform(vec![vec![0., 0.]]).unwrap();
        assert_eq!(
            Sinkhorn::default().solve(&x, &y),
            Err(TransportError::ShapeMismatch { lhs: 1, rhs: 2 })
        );
    }
}
