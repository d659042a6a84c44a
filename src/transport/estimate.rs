use super::cost::Cost;
use super::measure::Measure;
use super::potential::Duals;
use crate::Energy;
use crate::Probability;
use rayon::prelude::*;

/// Scalar summary of a solved transport problem.
///
/// - `Dual` — ⟨a, F⟩ + ⟨b, G⟩, the entropic OT value. On two identical
///   measures it does not vanish but tends to ε·H(a).
/// - `Primal` — ⟨C, π⟩, the transport cost of the implicit plan, without the
///   entropic term. Vanishes on identical well-separated measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Estimator {
    #[default]
    Dual,
    Primal,
}

impl Estimator {
    pub fn estimate<C>(&self, x: &Measure, y: &Measure, duals: &Duals, cost: &C) -> Energy
    where
        C: Cost,
    {
        let plan = Plan::from((x, y, duals, cost));
        match self {
            Self::Dual => plan.dual(),
            Self::Primal => plan.primal(),
        }
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Dual => write!(f, "dual"),
            Self::Primal => write!(f, "primal"),
        }
    }
}

/// The transport plan encoded by a pair of dual potentials.
///
/// Nothing is materialized; every mass is recomputed from (F, G, C) when asked.
pub struct Plan<'a, C> {
    x: &'a Measure,
    y: &'a Measure,
    duals: &'a Duals,
    cost: &'a C,
}

impl<C> Plan<'_, C>
where
    C: Cost,
{
    /// π_ij = exp((F_i + G_j − C_ij) / ε) · a_i · b_j
    pub fn mass(&self, i: usize, j: usize) -> Probability {
        self.density(i, j, self.cost.cost(i, j))
    }
    /// ⟨a, F⟩ + ⟨b, G⟩
    pub fn dual(&self) -> Energy {
        let f = self.x.weights().iter().zip(self.duals.f());
        let g = self.y.weights().iter().zip(self.duals.g());
        f.chain(g).map(|(w, p)| w * p).sum()
    }
    /// Σ_ij C_ij · π_ij
    pub fn primal(&self) -> Energy {
        (0..self.x.len())
            .into_par_iter()
            .map(|i| self.row(i).map(|(c, p)| c * p).sum::<Energy>())
            .sum()
    }
    /// Σ_j π_ij for every source point.
    pub fn rows(&self) -> Vec<Probability> {
        (0..self.x.len())
            .into_par_iter()
            .map(|i| self.row(i).map(|(_, p)| p).sum::<Probability>())
            .collect()
    }
    /// Σ_i π_ij for every target point.
    pub fn cols(&self) -> Vec<Probability> {
        (0..self.y.len())
            .into_par_iter()
            .map(|j| (0..self.x.len()).map(|i| self.mass(i, j)).sum::<Probability>())
            .collect()
    }
    /// L1 distance between the plan's marginals and (a, b).
    pub fn violation(&self) -> Probability {
        let rows = self.rows().into_iter().zip(self.x.weights());
        let cols = self.cols().into_iter().zip(self.y.weights());
        rows.chain(cols).map(|(p, w)| (p - w).abs()).sum()
    }

    /// (C_ij, π_ij) along row i, one cost tile at a time.
    fn row(&self, i: usize) -> impl Iterator<Item = (Energy, Probability)> + '_ {
        let m = self.y.len();
        (0..m).step_by(crate::COST_TILE).flat_map(move |start| {
            let end = (start + crate::COST_TILE).min(m);
            let mut tile = vec![0.; end - start];
            self.cost.block(i..i + 1, start..end, &mut tile);
            tile.into_iter()
                .zip(start..end)
                .map(move |(c, j)| (c, self.density(i, j, c)))
        })
    }
    fn density(&self, i: usize, j: usize, c: Energy) -> Probability {
        let exponent = (self.duals.f()[i] + self.duals.g()[j] - c) / self.duals.epsilon();
        exponent.exp() * self.x.weights()[i] * self.y.weights()[j]
    }
}

impl<'a, C> From<(&'a Measure, &'a Measure, &'a Duals, &'a C)> for Plan<'a, C> {
    fn from((x, y, duals, cost): (&'a Measure, &'a Measure, &'a Duals, &'a C)) -> Self {
        Self { x, y, duals, cost }
    }
}
