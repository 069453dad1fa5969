//! Plaintext polynomials and their slot-wise vector form.
pub mod paterson_stockmeyer;

pub use paterson_stockmeyer::{
    PatersonStockmeyerPolynomial, PatersonStockmeyerPolynomialVector,
    optimal_split,
};

use crate::Scale;
use num_complex::Complex64;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolynomialError {
    #[error("polynomial has no coefficients")]
    EmptyPolynomial,

    #[error("polynomial vector must contain at least one polynomial")]
    EmptyVector,

    #[error("{count} polynomials require a slots index")]
    MissingSlotsIndex { count: usize },

    #[error("slots index refers to polynomial {index}, vector has {count}")]
    SlotsIndexOutOfRange { index: usize, count: usize },

    #[error("slot group {group} has {actual} baby steps, expected {expected}")]
    SplitMismatch {
        group: usize,
        expected: usize,
        actual: usize,
    },

    #[error("slot group {group} disagrees with group 0 on baby step {chunk}")]
    ChunkMismatch { group: usize, chunk: usize },

    #[error("missing power basis entry X^{power}")]
    MissingPower { power: usize },

    #[error("decomposition needs level {needed}, only {available} available")]
    InsufficientLevels { needed: usize, available: usize },
}

pub type PolynomialResult<T> = Result<T, PolynomialError>;

/// Polynomial in the monomial basis, coefficients in ascending order.
///
/// `level` and `scale` are the target level and scale of the ciphertext
/// obtained by evaluating this polynomial; they are only meaningful once the
/// polynomial is a baby-step chunk of a Paterson–Stockmeyer decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    pub coeffs: Vec<Complex64>,
    /// Set on the chunk that carries the leading coefficient.
    pub lead: bool,
    pub level: usize,
    pub scale: Scale,
}

impl Polynomial {
    pub fn new(coeffs: Vec<Complex64>) -> PolynomialResult<Self> {
        if coeffs.is_empty() {
            return Err(PolynomialError::EmptyPolynomial);
        }
        Ok(Self {
            coeffs,
            lead: true,
            level: 0,
            scale: Scale::default(),
        })
    }

    pub fn from_real(coeffs: &[f64]) -> PolynomialResult<Self> {
        Self::new(coeffs.iter().map(|&c| Complex64::new(c, 0.0)).collect())
    }

    /// Degree implied by the coefficient count; an empty coefficient list
    /// reports 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Horner evaluation in the clear.
    pub fn evaluate(&self, x: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
    }

    /// Splits `self = quotient * X^n + remainder` where the remainder keeps
    /// exactly `n` coefficients.
    pub fn factorize(&self, n: usize) -> (Polynomial, Polynomial) {
        debug_assert!(n > 0 && n <= self.degree());
        let quotient = Polynomial {
            coeffs: self.coeffs[n..].to_vec(),
            lead: self.lead,
            level: self.level,
            scale: self.scale,
        };
        let remainder = Polynomial {
            coeffs: self.coeffs[..n].to_vec(),
            lead: false,
            level: self.level,
            scale: self.scale,
        };
        (quotient, remainder)
    }

    /// Pads with zero coefficients up to `degree`.
    pub(crate) fn padded_to(&self, degree: usize) -> Polynomial {
        let mut padded = self.clone();
        if degree > padded.degree() {
            padded.coeffs.resize(degree + 1, Complex64::new(0.0, 0.0));
        }
        padded
    }
}

/// Maps a polynomial index to the slot positions it is evaluated on.
pub type SlotsIndex = BTreeMap<usize, Vec<usize>>;

/// One polynomial per slot group. Without a slots index the single
/// polynomial applies to every slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialVector {
    pub value: Vec<Polynomial>,
    pub slots_index: Option<SlotsIndex>,
}

impl PolynomialVector {
    pub fn new(
        value: Vec<Polynomial>,
        slots_index: Option<SlotsIndex>,
    ) -> PolynomialResult<Self> {
        if value.is_empty() {
            return Err(PolynomialError::EmptyVector);
        }
        match &slots_index {
            None if value.len() > 1 => {
                return Err(PolynomialError::MissingSlotsIndex {
                    count: value.len(),
                });
            }
            Some(index) => {
                if let Some(&bad) = index.keys().find(|&&k| k >= value.len()) {
                    return Err(PolynomialError::SlotsIndexOutOfRange {
                        index: bad,
                        count: value.len(),
                    });
                }
            }
            None => {}
        }
        Ok(Self { value, slots_index })
    }

    pub fn uniform(poly: Polynomial) -> Self {
        Self {
            value: vec![poly],
            slots_index: None,
        }
    }

    /// Largest degree among the polynomials of the vector.
    pub fn degree(&self) -> usize {
        self.value.iter().map(Polynomial::degree).max().unwrap_or(0)
    }
}
