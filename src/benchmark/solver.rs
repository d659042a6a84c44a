use crate::transport::Annealing;
use crate::transport::Backend;
use crate::transport::Duals;
use crate::transport::Measure;
use crate::transport::Sinkhorn;
use crate::transport::TransportError;

/// A configured OT solver that can be timed by the [`Harness`](super::Harness).
///
/// Only [`duals`](Solver::duals) is timed; reading a cost off the potentials
/// happens afterwards, over a cost evaluator built from [`backend`](Solver::backend).
pub trait Solver {
    /// Short label of this configuration, e.g. `sinkhorn-lazy-T100`.
    fn name(&self) -> String;
    /// Cost evaluation strategy of this configuration.
    fn backend(&self) -> Backend;
    /// Solves from scratch between `x` and `y`.
    fn duals(&self, x: &Measure, y: &Measure) -> Result<Duals, TransportError>;
}

impl Solver for Sinkhorn {
    fn name(&self) -> String {
        format!("sinkhorn-{}-T{}", self.backend, self.iterations)
    }
    fn backend(&self) -> Backend {
        self.backend
    }
    fn duals(&self, x: &Measure, y: &Measure) -> Result<Duals, TransportError> {
        self.solve(x, y)
    }
}

impl Solver for Annealing {
    fn name(&self) -> String {
        format!("annealing-{}-s{}", self.backend, self.scaling)
    }
    fn backend(&self) -> Backend {
        self.backend
    }
    fn duals(&self, x: &Measure, y: &Measure) -> Result<Duals, TransportError> {
        self.solve(x, y)
    }
}

impl<S> Solver for Box<S>
where
    S: Solver + ?Sized,
{
    fn name(&self) -> String {
        self.as_ref().name()
    }
    fn backend(&self) -> Backend {
        self.as_ref().backend()
    }
    fn duals(&self, x: &Measure, y: &Measure) -> Result<Duals, TransportError> {
        self.as_ref().duals(x, y)
    }
}
