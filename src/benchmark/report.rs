use crate::Energy;
use crate::Entropy;

/// One timed attempt of one solver configuration.
///
/// `error` is |cost − ground truth|. A failed solve carries NaN for both
/// `cost` and `error`; a diverged one carries whatever non-finite cost it
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    /// Wall-clock seconds spent in the solve.
    pub elapsed: f64,
    pub error: Energy,
    pub cost: Energy,
}

impl Record {
    pub fn new(elapsed: f64, cost: Energy, truth: Energy) -> Self {
        Self {
            elapsed,
            error: (cost - truth).abs(),
            cost,
        }
    }
    pub fn failed(elapsed: f64) -> Self {
        Self {
            elapsed,
            error: Energy::NAN,
            cost: Energy::NAN,
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:>10.4}s {:>12.3e} {:>14.8}",
            self.elapsed, self.error, self.cost
        )
    }
}

/// Ordered records of one solver family, cheapest configuration first.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    name: String,
    records: Vec<Record>,
}

impl Curve {
    pub fn new(name: &str, records: Vec<Record>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Everything an external plotter needs to draw error-vs-time curves.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub title: String,
    pub source: usize,
    pub target: usize,
    pub blur: Entropy,
    pub truth: Energy,
    pub curves: Vec<Curve>,
}

impl Report {
    pub fn new(source: usize, target: usize, blur: Entropy, truth: Energy, curves: Vec<Curve>) -> Self {
        Self {
            title: format!(
                "Solving a {}-by-{} OT problem, with a blurring scale σ = {}",
                source, target, blur
            ),
            source,
            target,
            blur,
            truth,
            curves,
        }
    }
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "ground truth {:.8}", self.truth)?;
        for curve in self.curves.iter() {
            writeln!(f, "{}", curve.name)?;
            writeln!(f, "{:>11} {:>12} {:>14}", "time", "error", "cost")?;
            for record in curve.records.iter() {
                writeln!(f, "{}", record)?;
            }
        }
        Ok(())
    }
}
