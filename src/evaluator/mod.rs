//! Homomorphic polynomial evaluation.
//!
//! The operator capability set is the [`PolynomialEvaluator`] trait; the
//! Paterson–Stockmeyer driver only sequences those operators and keeps the
//! degree, level and scale bookkeeping consistent.

pub mod errors;
pub mod paterson_stockmeyer;
pub mod power_basis;
pub mod traits;

pub use errors::{BoxError, EvaluationError, EvaluationResult};
pub use paterson_stockmeyer::evaluate_paterson_stockmeyer;
pub use power_basis::PowerBasis;
pub use traits::{Ciphertext, PolynomialEvaluator};
