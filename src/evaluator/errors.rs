use thiserror::Error;

/// Failure reported by an operator implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("polynomial vector has no baby steps to evaluate")]
    EmptyPolynomial,

    #[error("slot group {group} has {actual} baby steps, expected {expected}")]
    SplitMismatch {
        group: usize,
        expected: usize,
        actual: usize,
    },

    #[error("missing power basis entry X^{power}")]
    MissingPower { power: usize },

    #[error("cannot evaluate polynomial[{index}]: {source}")]
    BabyStep {
        index: usize,
        #[source]
        source: BoxError,
    },

    #[error("giant step on degree {degree} failed: {source}")]
    GiantStep {
        degree: usize,
        #[source]
        source: BoxError,
    },

    #[error("final rescale failed: {source}")]
    FinalRescale {
        #[source]
        source: BoxError,
    },
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
