//! Baby-step/giant-step decomposition of a polynomial.
//!
//! `p = q * X^n + r` is applied recursively, with `n` the smallest power of
//! two at least half the degree, until every piece has degree below the
//! baby-step base. Pieces are listed highest-degree first. Each piece gets
//! the level and scale that make the giant-step merges line up: a quotient
//! sits one level above its parent and is scaled so that rescaling it and
//! multiplying by `X^n` lands exactly on the parent's scale.
use super::{
    Polynomial, PolynomialError, PolynomialResult, PolynomialVector, SlotsIndex,
};
use crate::evaluator::{Ciphertext, PowerBasis};
use crate::{Parameters, Scale};

/// Number of bits needed to represent `value`.
pub(crate) fn bit_len(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()) as usize
}

/// Log2 of the baby-step base minimising the number of non-scalar
/// multiplications for a polynomial of degree below `2^log_degree`.
pub fn optimal_split(log_degree: usize) -> usize {
    if log_degree < 2 {
        return 1;
    }
    let log_degree = log_degree as i64;
    let mut log_split = log_degree >> 1;
    let a = (1i64 << log_split)
        + (1i64 << (log_degree - log_split))
        + log_degree
        - log_split
        - 3;
    let b = (1i64 << (log_split + 1))
        + (1i64 << (log_degree - log_split - 1))
        + log_degree
        - log_split
        - 4;
    if a > b {
        log_split += 1;
    }
    log_split as usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatersonStockmeyerPolynomial {
    /// Degree of the decomposed polynomial.
    pub degree: usize,
    /// Baby-step base, a power of two.
    pub base: usize,
    /// Level of the input ciphertext.
    pub level: usize,
    /// Scale of the evaluated result.
    pub scale: Scale,
    /// Baby-step chunks, highest-degree chunk first.
    pub value: Vec<Polynomial>,
}

impl PatersonStockmeyerPolynomial {
    /// Decomposes `poly` for evaluation on the input encrypted in `basis`
    /// so that the evaluated result has scale `output_scale`.
    pub fn new<C: Ciphertext>(
        poly: &Polynomial,
        params: &Parameters,
        basis: &PowerBasis<C>,
        output_scale: Scale,
    ) -> PolynomialResult<Self> {
        let input_level = basis
            .get(1)
            .ok_or(PolynomialError::MissingPower { power: 1 })?
            .level();

        let log_degree = bit_len(poly.degree());
        let log_split = optimal_split(log_degree);

        // The result is rescaled once more after the last merge, so the
        // merged ciphertext must sit at level >= 1.
        let insufficient = PolynomialError::InsufficientLevels {
            needed: log_degree + 1,
            available: input_level,
        };
        let target_level = input_level
            .checked_sub(log_degree)
            .filter(|&level| level >= 1)
            .ok_or_else(|| insufficient.clone())?;
        let q = params.rescale_factor(target_level).ok_or(insufficient)?;

        let mut value = Vec::new();
        split_chunks(
            poly.clone(),
            log_split,
            target_level,
            output_scale * q,
            params,
            basis,
            &mut value,
        )?;

        Ok(Self {
            degree: poly.degree(),
            base: 1 << log_split,
            level: input_level,
            scale: output_scale,
            value,
        })
    }
}

fn split_chunks<C: Ciphertext>(
    poly: Polynomial,
    log_split: usize,
    level: usize,
    scale: Scale,
    params: &Parameters,
    basis: &PowerBasis<C>,
    chunks: &mut Vec<Polynomial>,
) -> PolynomialResult<()> {
    if poly.degree() < (1 << log_split) {
        chunks.push(Polynomial {
            level,
            scale,
            ..poly
        });
        return Ok(());
    }

    let mut next_power = 1 << log_split;
    while next_power < (poly.degree() >> 1) + 1 {
        next_power <<= 1;
    }

    let x_pow = basis
        .get(next_power)
        .ok_or(PolynomialError::MissingPower { power: next_power })?;
    if x_pow.level() < level {
        return Err(PolynomialError::InsufficientLevels {
            needed: level,
            available: x_pow.level(),
        });
    }

    let quotient_level = level + 1;
    let q = params.rescale_factor(quotient_level).ok_or(
        PolynomialError::InsufficientLevels {
            needed: quotient_level,
            available: params.max_level(),
        },
    )?;
    let quotient_scale = scale * q / x_pow.scale();

    let (quotient, remainder) = poly.factorize(next_power);
    split_chunks(
        quotient,
        log_split,
        quotient_level,
        quotient_scale,
        params,
        basis,
        chunks,
    )?;
    split_chunks(remainder, log_split, level, scale, params, basis, chunks)
}

/// Slot-wise family of decomposed polynomials sharing one chunk layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PatersonStockmeyerPolynomialVector {
    pub value: Vec<PatersonStockmeyerPolynomial>,
    pub slots_index: Option<SlotsIndex>,
}

impl PatersonStockmeyerPolynomialVector {
    /// Checks that every group has the same number of chunks and that
    /// chunks at the same position agree on level, scale and degree.
    pub fn new(
        value: Vec<PatersonStockmeyerPolynomial>,
        slots_index: Option<SlotsIndex>,
    ) -> PolynomialResult<Self> {
        let first = value.first().ok_or(PolynomialError::EmptyVector)?;
        let split = first.value.len();

        for (group, poly) in value.iter().enumerate().skip(1) {
            if poly.value.len() != split {
                return Err(PolynomialError::SplitMismatch {
                    group,
                    expected: split,
                    actual: poly.value.len(),
                });
            }
            for (chunk, (ours, theirs)) in
                poly.value.iter().zip(&first.value).enumerate()
            {
                if ours.level != theirs.level
                    || ours.scale != theirs.scale
                    || ours.degree() != theirs.degree()
                {
                    return Err(PolynomialError::ChunkMismatch { group, chunk });
                }
            }
        }

        Ok(Self { value, slots_index })
    }

    /// Decomposes every polynomial of `vector`, padding them to a common
    /// degree first so that they share a chunk layout.
    pub fn from_polynomial_vector<C: Ciphertext>(
        vector: &PolynomialVector,
        params: &Parameters,
        basis: &PowerBasis<C>,
        output_scale: Scale,
    ) -> PolynomialResult<Self> {
        let degree = vector.degree();
        let value = vector
            .value
            .iter()
            .map(|poly| {
                PatersonStockmeyerPolynomial::new(
                    &poly.padded_to(degree),
                    params,
                    basis,
                    output_scale,
                )
            })
            .collect::<PolynomialResult<Vec<_>>>()?;
        Self::new(value, vector.slots_index.clone())
    }

    /// Number of baby-step chunks per group.
    pub fn split(&self) -> usize {
        self.value.first().map_or(0, |poly| poly.value.len())
    }
}

impl From<PatersonStockmeyerPolynomial> for PatersonStockmeyerPolynomialVector {
    fn from(poly: PatersonStockmeyerPolynomial) -> Self {
        Self {
            value: vec![poly],
            slots_index: None,
        }
    }
}
