use super::cost::Backend;
use super::cost::Cost;
use super::error::TransportError;
use super::measure::Measure;
use super::potential::Duals;
use super::sinkhorn::epsilon;
use crate::Entropy;

/// Sinkhorn with ε-scaling.
///
/// Instead of running every sweep at the target ε = σ², the blur scale is
/// annealed geometrically from the diameter of the problem down to σ, with a
/// single sweep per scale. Potentials are warm-started from one scale to the
/// next, which is what makes a handful of sweeps enough.
///
/// `scaling` trades speed (→ 0) for accuracy (→ 1): it is the ratio between
/// two consecutive blur scales.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Annealing {
    /// Target blur scale σ.
    pub blur: Entropy,
    /// Ratio between consecutive blur scales, in (0, 1).
    pub scaling: Entropy,
    /// Cost evaluation strategy.
    pub backend: Backend,
}

impl Default for Annealing {
    fn default() -> Self {
        Self {
            blur: crate::SINKHORN_BLUR,
            scaling: crate::ANNEALING_SCALING,
            backend: Backend::default(),
        }
    }
}

impl Annealing {
    pub fn new(blur: Entropy, scaling: Entropy, backend: Backend) -> Self {
        Self {
            blur,
            scaling,
            backend,
        }
    }

    /// Decreasing sequence of ε values, one per sweep:
    /// diameter², then ε_k = exp(2·ln d + 2k·ln s) while above σ², then σ².
    pub fn schedule(&self, diameter: Entropy) -> Result<Vec<Entropy>, TransportError> {
        let target = epsilon(self.blur)?;
        if !(self.scaling > 0. && self.scaling < 1.) {
            return Err(TransportError::InvalidScaling(self.scaling));
        }
        let diameter = diameter.max(self.blur);
        let hi = 2. * diameter.ln();
        let lo = 2. * self.blur.ln();
        let step = 2. * self.scaling.ln();
        let count = ((lo - hi) / step).ceil().max(0.) as usize;
        Ok(std::iter::once(diameter * diameter)
            .chain((0..count).map(|k| (hi + k as Entropy * step).exp()))
            .chain(std::iter::once(target))
            .collect())
    }

    pub fn solve(&self, x: &Measure, y: &Measure) -> Result<Duals, TransportError> {
        let ref cost = self.backend.evaluate(x, y)?;
        self.solve_with(x, y, cost)
    }

    pub fn solve_with<C>(&self, x: &Measure, y: &Measure, cost: &C) -> Result<Duals, TransportError>
    where
        C: Cost,
    {
        let schedule = self.schedule(x.diameter(y)?)?;
        let ref loga = x.log_weights()?;
        let ref logb = y.log_weights()?;
        let start = std::time::Instant::now();
        let mut duals = Duals::zeros(x.len(), y.len(), schedule[0]);
        for &eps in schedule.iter() {
            duals.sweep(cost, loga, logb, eps);
        }
        log::debug!(
            "annealing {}x{} {:<6} ε={:.2e} s={:<5} sweeps={:<6} {:?}",
            x.len(),
            y.len(),
            self.backend,
            duals.epsilon(),
            self.scaling,
            schedule.len(),
            start.elapsed()
        );
        Ok(duals)
    }
}
