use super::harness::Harness;
use super::report::Report;
use crate::Entropy;
use crate::transport::Annealing;
use crate::transport::Backend;
use crate::transport::Measure;
use crate::transport::Sinkhorn;
use crate::transport::TransportError;
use std::time::Duration;

/// Full comparison between solver families on one (source, target, blur) problem.
///
/// The ground truth comes from a near-exact ε-scaling solve. Then, for each
/// backend, the ε-scaling solver is swept over [`ANNEALING_SCHEDULE`] and the
/// plain Sinkhorn loop over [`SINKHORN_SCHEDULE`], each family under its own
/// time budget.
///
/// [`ANNEALING_SCHEDULE`]: crate::ANNEALING_SCHEDULE
/// [`SINKHORN_SCHEDULE`]: crate::SINKHORN_SCHEDULE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suite {
    pub blur: Entropy,
    pub maxtime: Option<Duration>,
    pub backends: [Option<Backend>; 2],
}

impl Default for Suite {
    fn default() -> Self {
        Self {
            blur: crate::SINKHORN_BLUR,
            maxtime: Some(Duration::from_secs_f64(crate::BENCHMARK_MAXTIME)),
            backends: [Some(Backend::Dense), Some(Backend::Lazy)],
        }
    }
}

impl Suite {
    pub fn new(blur: Entropy, maxtime: Option<Duration>) -> Self {
        Self {
            blur,
            maxtime,
            ..Self::default()
        }
    }
    /// Restricts the suite to a single cost backend.
    pub fn only(self, backend: Backend) -> Self {
        Self {
            backends: [Some(backend), None],
            ..self
        }
    }

    pub fn run(&self, x: &Measure, y: &Measure) -> Result<Report, TransportError> {
        log::info!(
            "{:<32}{}x{} σ={}",
            "solving OT problem",
            x.len(),
            y.len(),
            self.blur
        );
        let harness = Harness::new(self.maxtime);
        let reference = Annealing::new(self.blur, crate::ANNEALING_REFERENCE, Backend::Lazy);
        let truth = harness.truth(&reference, x, y)?;
        let mut curves = Vec::new();
        for backend in self.backends.iter().flatten().copied() {
            let candidates = self.annealing(backend);
            let name = format!("ε-scaling ({})", backend);
            curves.push(harness.run(&name, &candidates, x, y, truth));
        }
        for backend in self.backends.iter().flatten().copied() {
            let candidates = self.sinkhorn(backend);
            let name = format!("sinkhorn loop ({})", backend);
            curves.push(harness.run(&name, &candidates, x, y, truth));
        }
        Ok(Report::new(x.len(), y.len(), self.blur, truth, curves))
    }

    fn annealing(&self, backend: Backend) -> Vec<Annealing> {
        crate::ANNEALING_SCHEDULE
            .iter()
            .map(|&s| Annealing::new(self.blur, s, backend))
            .collect()
    }
    fn sinkhorn(&self, backend: Backend) -> Vec<Sinkhorn> {
        crate::SINKHORN_SCHEDULE
            .iter()
            .map(|&t| Sinkhorn::new(self.blur, t, backend))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_curve_per_family_and_backend() {
        let x = Measure::sphere(24).unwrap();
        let y = Measure::sphere(16).unwrap();
        let report = Suite::new(0.5, Some(Duration::ZERO)).run(&x, &y).unwrap();
        assert_eq!(report.curves.len(), 4);
        assert!(report.curves.iter().all(|c| c.records().len() == 1));
        assert!(report.truth.is_finite());
        assert_eq!((report.source, report.target), (24, 16));
    }
    #[test]
    fn single_backend() {
        let x = Measure::sphere(12).unwrap();
        let report = Suite::new(0.5, Some(Duration::ZERO))
            .only(Backend::Lazy)
            .run(&x, &x)
            .unwrap();
        assert_eq!(report.curves.len(), 2);
        assert!(report.curves.iter().all(|c| c.name().contains("lazy")));
    }
    #[test]
    fn dimension_mismatch_fails_fast() {
        let x = Measure::sphere(4).unwrap();
        let y = Measure::uniform(vec![vec![0., 1.]]).unwrap();
        assert!(matches!(
            Suite::default().run(&x, &y),
            Err(TransportError::ShapeMismatch { lhs: 3, rhs: 2 })
        ));
    }
}
