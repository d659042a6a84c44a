use super::report::Curve;
use super::report::Record;
use super::solver::Solver;
use crate::Energy;
use crate::transport::Backend;
use crate::transport::Duals;
use crate::transport::Estimator;
use crate::transport::Measure;
use crate::transport::TransportError;
use std::time::Duration;
use std::time::Instant;

/// Time-vs-accuracy benchmark of OT solver configurations.
///
/// Candidates are attempted one after the other, in the order given
/// (cheapest first). Each attempt is timed, scored against a fixed ground
/// truth, and recorded. Once the wall-clock budget is spent, the remaining
/// (more expensive) candidates are skipped.
///
/// A failing or diverging candidate does not stop the experiment: it is
/// recorded with a non-finite error so that the attempt stays visible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Harness {
    budget: Option<Duration>,
    estimator: Estimator,
}

impl Harness {
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            budget,
            estimator: Estimator::default(),
        }
    }
    pub fn with_estimator(self, estimator: Estimator) -> Self {
        Self { estimator, ..self }
    }
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }
    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    /// Runs the reference configuration once and returns its cost.
    pub fn truth<S>(&self, reference: &S, x: &Measure, y: &Measure) -> Result<Energy, TransportError>
    where
        S: Solver,
    {
        let start = Instant::now();
        let ref duals = reference.duals(x, y)?;
        let cost = self.estimate(reference, x, y, duals)?;
        log::info!(
            "{:<32}{:<16.8}{:?}",
            format!("ground truth ({})", reference.name()),
            cost,
            start.elapsed()
        );
        if !cost.is_finite() {
            log::warn!("reference solver {} diverged", reference.name());
        }
        Ok(cost)
    }

    /// Lazily attempts `candidates`, one [`Record`] per step.
    pub fn experiment<'a, S>(
        &'a self,
        candidates: &'a [S],
        x: &'a Measure,
        y: &'a Measure,
        truth: Energy,
    ) -> Experiment<'a, S>
    where
        S: Solver,
    {
        Experiment {
            harness: self,
            pending: candidates.iter(),
            x,
            y,
            truth,
            spent: 0.,
            done: false,
        }
    }

    /// Runs a whole family of candidates into a named [`Curve`].
    pub fn run<S>(&self, name: &str, candidates: &[S], x: &Measure, y: &Measure, truth: Energy) -> Curve
    where
        S: Solver,
    {
        log::info!("{:<32}{:<32}", "benchmarking", name);
        let records = self.experiment(candidates, x, y, truth).collect();
        Curve::new(name, records)
    }

    /// Solves once (timed), then scores the potentials (untimed).
    fn attempt<S>(&self, solver: &S, x: &Measure, y: &Measure, truth: Energy) -> Record
    where
        S: Solver,
    {
        let start = Instant::now();
        let duals = solver.duals(x, y);
        let elapsed = start.elapsed().as_secs_f64();
        match duals.and_then(|ref duals| self.estimate(solver, x, y, duals)) {
            Ok(cost) => {
                let record = Record::new(elapsed, cost, truth);
                match cost.is_finite() {
                    true => log::debug!("{:<32}{}", solver.name(), record),
                    false => log::warn!("{:<32}diverged after {:.3}s", solver.name(), elapsed),
                }
                record
            }
            Err(e) => {
                log::warn!("{:<32}failed: {}", solver.name(), e);
                Record::failed(elapsed)
            }
        }
    }

    fn estimate<S>(&self, solver: &S, x: &Measure, y: &Measure, duals: &Duals) -> Result<Energy, TransportError>
    where
        S: Solver,
    {
        // the dual objective never reads the cost, no need to materialize it
        let backend = match self.estimator {
            Estimator::Dual => Backend::Lazy,
            Estimator::Primal => solver.backend(),
        };
        let ref cost = backend.evaluate(x, y)?;
        Ok(self.estimator.estimate(x, y, duals, cost))
    }

    fn exhausted(&self, spent: f64) -> bool {
        self.budget.is_some_and(|b| spent >= b.as_secs_f64())
    }
}

/// One pass of the [`Harness`] over an ordered list of candidates.
///
/// Each call to `next` takes the next pending candidate through
/// run → timed → scored and yields its [`Record`]. Iteration ends when every
/// candidate was attempted or when the cumulative solve time reaches the
/// budget; a solve is never interrupted midway.
pub struct Experiment<'a, S> {
    harness: &'a Harness,
    pending: std::slice::Iter<'a, S>,
    x: &'a Measure,
    y: &'a Measure,
    truth: Energy,
    spent: f64,
    done: bool,
}

impl<S> Experiment<'_, S> {
    /// Seconds spent solving so far.
    pub fn spent(&self) -> f64 {
        self.spent
    }
    /// Candidates not attempted yet.
    pub fn remaining(&self) -> usize {
        match self.done {
            true => 0,
            false => self.pending.len(),
        }
    }
}

impl<S> Iterator for Experiment<'_, S>
where
    S: Solver,
{
    type Item = Record;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let solver = self.pending.next()?;
        let record = self.harness.attempt(solver, self.x, self.y, self.truth);
        self.spent += record.elapsed;
        if self.harness.exhausted(self.spent) {
            self.done = true;
            if self.pending.len() > 0 {
                log::info!(
                    "budget exhausted after {:.3}s, skipping {} configurations",
                    self.spent,
                    self.pending.len()
                );
            }
        }
        Some(record)
    }
}
