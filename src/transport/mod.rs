//! Entropic optimal transport between discrete measures.
//!
//! ## Solvers
//!
//! - [`Sinkhorn`] — fixed-ε log-domain coordinate ascent, `iterations` sweeps
//! - [`Annealing`] — ε-scaling Sinkhorn, one sweep per blur scale
//!
//! ## Core Types
//!
//! - [`Measure`] — weighted point cloud in ℝ^D
//! - [`Cost`] — ½‖x − y‖² ground cost, [`Dense`] or [`Lazy`]
//! - [`Duals`] — dual potentials (F, G) in cost units
//! - [`Estimator`] — scalar cost read off the potentials
//! - [`Plan`] — the implicit transport plan, for diagnostics
mod annealing;
mod cost;
mod error;
mod estimate;
mod measure;
mod potential;
mod sinkhorn;
mod softmin;

pub use annealing::*;
pub use cost::*;
pub use error::*;
pub use estimate::*;
pub use measure::*;
pub use potential::*;
pub use sinkhorn::*;
pub use softmin::*;
