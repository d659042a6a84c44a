//! Time-vs-accuracy benchmarks of OT solvers.
//!
//! A [`Harness`] runs a reference [`Solver`] once to get a ground-truth cost,
//! then times families of cheaper configurations and records how far each
//! lands from it. [`Suite`] wires the standard comparison (ε-scaling vs plain
//! Sinkhorn, dense vs lazy costs) and produces a serializable [`Report`].
mod harness;
mod report;
mod solver;
mod suite;

pub use harness::*;
pub use report::*;
pub use solver::*;
pub use suite::*;
