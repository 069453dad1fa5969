//! Implementations of the evaluator operators.
pub mod simulated;

pub use simulated::{
    SimulatedCiphertext, SimulatedEvaluator, SimulationError, SimulationResult,
};
