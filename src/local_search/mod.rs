//! Local search operators for improving tours.
//!
//! - [`two_opt_improve`] — 2-opt segment reversal with fixed endpoints

mod two_opt;

pub use two_opt::{two_opt_improve, two_opt_improve_with, TwoOptOutcome, DEFAULT_MAX_ITERATIONS};
