//! Entropic optimal transport between weighted point clouds.
//!
//! This crate solves the entropic OT problem with a log-domain Sinkhorn loop,
//! over either a dense cost matrix or a lazy cost evaluator, and measures how
//! fast competing solver configurations converge to a reference cost.
//!
//! - [`transport`] — measures, cost evaluators, Sinkhorn and ε-scaling solvers
//! - [`benchmark`] — time-vs-accuracy harness and serializable reports

pub mod benchmark;
pub mod transport;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Transport costs, dual potentials and cost estimates.
pub type Energy = f64;
/// Regularization strength and log-domain quantities.
pub type Entropy = f64;
/// Point weights of a discrete measure.
pub type Probability = f64;
/// Point coordinates in the ambient space.
pub type Coordinate = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for tests and benchmarks.
pub trait Arbitrary {
    /// Generate a random instance.
    fn random() -> Self;
}

// ============================================================================
// MEASURES
// ============================================================================
/// Allowed drift of a measure's total mass away from 1.
pub const MASS_TOLERANCE: Probability = 1e-6;
/// Point count of `Arbitrary` measures.
pub const ARBITRARY_POINTS: usize = 64;
/// Ambient dimension of `Arbitrary` measures.
pub const ARBITRARY_DIMENSION: usize = 3;

// ============================================================================
// COST EVALUATION
// Lazy reductions stream over tiles of the cost matrix so that memory stays
// linear in the number of points.
// ============================================================================
/// Number of cost entries evaluated per streaming tile.
pub const COST_TILE: usize = 1024;

// ============================================================================
// SINKHORN OPTIMAL TRANSPORT
// ε = σ². Lower σ = closer to exact OT, more iterations needed.
// ============================================================================
/// Default blur scale σ.
pub const SINKHORN_BLUR: Entropy = 0.01;
/// Default number of alternating sweeps.
pub const SINKHORN_ITERATIONS: usize = 100;
/// Iteration counts benchmarked for the plain Sinkhorn loop.
pub const SINKHORN_SCHEDULE: [usize; 11] = [5, 10, 20, 50, 100, 200, 500, 1000, 2000, 5000, 10000];

// ============================================================================
// ε-SCALING
// Ratio between consecutive blur scales. 0 = fast and coarse, 1 = slow and exact.
// ============================================================================
/// Default ratio between consecutive blur scales.
pub const ANNEALING_SCALING: Entropy = 0.5;
/// Scaling of the reference solve that defines the ground truth.
pub const ANNEALING_REFERENCE: Entropy = 0.999;
/// Scalings benchmarked for the ε-scaling solver.
pub const ANNEALING_SCHEDULE: [Entropy; 7] = [0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.99];

// ============================================================================
// BENCHMARKING
// ============================================================================
/// Default wall-clock budget per solver family (seconds).
pub const BENCHMARK_MAXTIME: f64 = 1.0;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("time moves slow")?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}
