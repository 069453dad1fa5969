pub mod backends;
pub mod evaluator;
pub mod metadata;
pub mod params;
pub mod polynomial;
pub mod scale;

pub use backends::{SimulatedCiphertext, SimulatedEvaluator, SimulationError};
pub use evaluator::{
    Ciphertext, EvaluationError, EvaluationResult, PolynomialEvaluator,
    PowerBasis, evaluate_paterson_stockmeyer,
};
pub use metadata::{CodecError, CodecResult, EncodingDomain, MetaData};
pub use params::{ParameterError, Parameters, ParametersBuilder};
pub use polynomial::{
    PatersonStockmeyerPolynomial, PatersonStockmeyerPolynomialVector,
    Polynomial, PolynomialError, PolynomialVector, SlotsIndex, optimal_split,
};
pub use scale::{SCALE_PRECISION, Scale};
