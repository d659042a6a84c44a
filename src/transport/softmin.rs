use super::cost::Cost;
use crate::Energy;
use crate::Entropy;
use rayon::prelude::*;

/// Streaming log-sum-exp: log Σ_k exp(v_k) accumulated tile by tile.
///
/// Every tile is shifted by its running maximum before exponentiation,
/// so the sum never overflows however small ε makes the exponents.
/// NaN and +∞ are not filtered; they poison the result.
#[derive(Debug, Clone, Copy)]
pub struct LogSumExp {
    max: Entropy,
    sum: Entropy,
}

impl Default for LogSumExp {
    fn default() -> Self {
        Self {
            max: Entropy::NEG_INFINITY,
            sum: 0.,
        }
    }
}

impl LogSumExp {
    /// Folds one tile of log-domain values into the accumulator.
    pub fn extend(&mut self, tile: &[Entropy]) {
        let peak = tile.iter().fold(Entropy::NEG_INFINITY, |m, &v| {
            if v > m || v.is_nan() { v } else { m }
        });
        if peak == Entropy::NEG_INFINITY {
            return;
        }
        let head = if peak > self.max || peak.is_nan() {
            peak
        } else {
            self.max
        };
        let sum = tile.iter().map(|v| (v - head).exp()).sum::<Entropy>();
        self.sum = self.sum * (self.max - head).exp() + sum;
        self.max = head;
    }
    /// log Σ exp over everything folded so far. −∞ when empty.
    pub fn value(&self) -> Entropy {
        self.max + self.sum.ln()
    }
}

impl From<&[Entropy]> for LogSumExp {
    fn from(values: &[Entropy]) -> Self {
        let mut lse = Self::default();
        lse.extend(values);
        lse
    }
}

/// Soft-minimum over the columns of the cost, for every row:
///
/// out_i = −ε · log Σ_j exp(h_j − C_ij / ε)
///
/// Rows are independent and reduced in parallel; each row streams over
/// column tiles of [`COST_TILE`](crate::COST_TILE) entries.
pub fn softmin_rows<C>(cost: &C, eps: Entropy, h: &[Entropy], out: &mut [Energy])
where
    C: Cost,
{
    let (n, m) = cost.shape();
    debug_assert!(out.len() == n && h.len() == m);
    out.par_iter_mut()
        .enumerate()
        .for_each_init(
            || vec![0.; crate::COST_TILE],
            |buffer, (i, out)| {
                let mut lse = LogSumExp::default();
                for start in (0..m).step_by(crate::COST_TILE) {
                    let end = (start + crate::COST_TILE).min(m);
                    let tile = &mut buffer[..end - start];
                    cost.block(i..i + 1, start..end, tile);
                    shift(tile, &h[start..end], eps);
                    lse.extend(tile);
                }
                *out = -eps * lse.value();
            },
        );
}

/// Soft-minimum over the rows of the cost, for every column:
///
/// out_j = −ε · log Σ_i exp(h_i − C_ij / ε)
pub fn softmin_cols<C>(cost: &C, eps: Entropy, h: &[Entropy], out: &mut [Energy])
where
    C: Cost,
{
    let (n, m) = cost.shape();
    debug_assert!(out.len() == m && h.len() == n);
    out.par_iter_mut()
        .enumerate()
        .for_each_init(
            || vec![0.; crate::COST_TILE],
            |buffer, (j, out)| {
                let mut lse = LogSumExp::default();
                for start in (0..n).step_by(crate::COST_TILE) {
                    let end = (start + crate::COST_TILE).min(n);
                    let tile = &mut buffer[..end - start];
                    cost.block(start..end, j..j + 1, tile);
                    shift(tile, &h[start..end], eps);
                    lse.extend(tile);
                }
                *out = -eps * lse.value();
            },
        );
}

/// c ↦ h − c / ε, in place.
fn shift(tile: &mut [Energy], h: &[Entropy], eps: Entropy) {
    tile.iter_mut().zip(h).for_each(|(c, h)| *c = h - *c / eps);
}
