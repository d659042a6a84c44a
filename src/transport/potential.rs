use super::cost::Cost;
use super::softmin;
use crate::Energy;
use crate::Entropy;

/// A dual potential sampled on the points of one measure.
pub type Potential = Vec<Energy>;

/// Dual potentials (F, G) of the entropic transport problem.
///
/// Both vectors are expressed in cost units: the implicit plan is
/// π_ij = exp((F_i + G_j − C_ij) / ε) · a_i · b_j
/// with `eps` the regularization of the last sweep that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Duals {
    f: Potential,
    g: Potential,
    eps: Entropy,
}

impl Duals {
    /// F = 0 on the N source points, G = 0 on the M target points.
    pub fn zeros(n: usize, m: usize, eps: Entropy) -> Self {
        Self {
            f: vec![0.; n],
            g: vec![0.; m],
            eps,
        }
    }
    pub fn f(&self) -> &[Energy] {
        &self.f
    }
    pub fn g(&self) -> &[Energy] {
        &self.g
    }
    pub fn epsilon(&self) -> Entropy {
        self.eps
    }
    /// False once the iteration has diverged into NaN or ±∞.
    pub fn is_finite(&self) -> bool {
        self.f.iter().chain(self.g.iter()).all(|x| x.is_finite())
    }

    /// One Gauss-Seidel Sinkhorn sweep at regularization `eps`:
    ///
    /// F_i ← −ε · LSE_j[ −C_ij/ε + G_j/ε + log b_j ]
    /// G_j ← −ε · LSE_i[ −C_ij/ε + F_i/ε + log a_i ]  (with the new F)
    pub fn sweep<C>(&mut self, cost: &C, loga: &[Entropy], logb: &[Entropy], eps: Entropy)
    where
        C: Cost,
    {
        let ref h = Self::exponent(&self.g, logb, eps);
        softmin::softmin_rows(cost, eps, h, &mut self.f);
        let ref h = Self::exponent(&self.f, loga, eps);
        softmin::softmin_cols(cost, eps, h, &mut self.g);
        self.eps = eps;
    }

    /// potential / ε + log weight
    fn exponent(potential: &[Energy], logw: &[Entropy], eps: Entropy) -> Vec<Entropy> {
        potential
            .iter()
            .zip(logw)
            .map(|(p, lw)| p / eps + lw)
            .collect()
    }
}
