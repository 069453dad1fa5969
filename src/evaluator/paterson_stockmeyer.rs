//! Paterson–Stockmeyer evaluation of a decomposed polynomial vector.
//!
//! Small steps evaluate every baby-step chunk against the power basis.
//! Giant steps then merge neighbouring chunks of equal degree `d` as
//! `low + high * X^n`, with `n = 2^bit_len(d)`, until a single ciphertext is
//! left. The chunk count does not need to be a power of two: a trailing
//! chunk that found no partner takes the degree of its predecessor and is
//! merged in a later round.
use super::{
    Ciphertext, EvaluationError, EvaluationResult, PolynomialEvaluator,
    PowerBasis,
};
use crate::polynomial::paterson_stockmeyer::bit_len;
use crate::polynomial::{PatersonStockmeyerPolynomialVector, PolynomialVector};
use crate::SCALE_PRECISION;
use tracing::{debug, instrument, trace};

/// Number of leading bits on which the two addends of a giant step must
/// agree.
const SCALE_DELTA_BITS: f64 = (SCALE_PRECISION - 12) as f64;

/// Partially evaluated piece of the polynomial: `value` encrypts a
/// polynomial of degree at most `degree` in the input.
#[derive(Debug)]
struct Entry<C> {
    degree: usize,
    value: C,
}

/// Evaluates `poly` on the input encrypted in `basis`.
///
/// Every power-of-two entry of `basis` requested by the giant steps, and
/// every power read by the baby steps, must be present.
///
/// # Panics
/// If the two addends of a giant step disagree on their scale. This means
/// the decomposition assigned inconsistent chunk scales and the result
/// would decrypt to garbage.
#[instrument(
    skip_all,
    fields(groups = poly.value.len(), split = poly.split())
)]
pub fn evaluate_paterson_stockmeyer<E: PolynomialEvaluator>(
    poly: &PatersonStockmeyerPolynomialVector,
    basis: &PowerBasis<E::Ciphertext>,
    ops: &E,
) -> EvaluationResult<E::Ciphertext> {
    let mut entries = small_steps(poly, basis, ops)?;

    let mut round = 0;
    while entries.len() > 1 {
        round += 1;
        debug!(
            round,
            degrees = ?entries.iter().map(|e| e.degree).collect::<Vec<_>>(),
            "giant-step round"
        );
        entries = merge_round(entries, basis, ops)?;
    }

    let entry = entries.pop().ok_or(EvaluationError::EmptyPolynomial)?;
    let mut result = entry.value;
    if result.degree() == 2 {
        result = ops.relinearize(result);
    }
    let result = ops
        .rescale(result)
        .map_err(|source| EvaluationError::FinalRescale {
            source: Box::new(source),
        })?;

    debug!(
        rounds = round,
        level = result.level(),
        log_scale = result.scale().log2(),
        "polynomial evaluated"
    );
    Ok(result)
}

/// Evaluates each baby-step chunk and returns the results in ascending
/// degree order, i.e. reversed with respect to `poly`.
fn small_steps<E: PolynomialEvaluator>(
    poly: &PatersonStockmeyerPolynomialVector,
    basis: &PowerBasis<E::Ciphertext>,
    ops: &E,
) -> EvaluationResult<Vec<Entry<E::Ciphertext>>> {
    let first = poly.value.first().ok_or(EvaluationError::EmptyPolynomial)?;
    let split = first.value.len();
    if split == 0 {
        return Err(EvaluationError::EmptyPolynomial);
    }
    for (group, p) in poly.value.iter().enumerate() {
        if p.value.len() != split {
            return Err(EvaluationError::SplitMismatch {
                group,
                expected: split,
                actual: p.value.len(),
            });
        }
    }

    let mut entries = Vec::with_capacity(split);
    for (index, chunk) in first.value.iter().enumerate() {
        // Transpose: the index-th chunk of every slot group.
        let vector = PolynomialVector {
            value: poly.value.iter().map(|p| p.value[index].clone()).collect(),
            slots_index: poly.slots_index.clone(),
        };

        trace!(index, degree = chunk.degree(), level = chunk.level, "baby step");
        let value = ops
            .evaluate_polynomial_vector_from_power_basis(
                chunk.level,
                &vector,
                basis,
                chunk.scale,
            )
            .map_err(|source| EvaluationError::BabyStep {
                index,
                source: Box::new(source),
            })?;

        entries.push(Entry {
            degree: chunk.degree(),
            value,
        });
    }
    entries.reverse();
    Ok(entries)
}

/// One left-to-right pass over the working list.
fn merge_round<E: PolynomialEvaluator>(
    entries: Vec<Entry<E::Ciphertext>>,
    basis: &PowerBasis<E::Ciphertext>,
    ops: &E,
) -> EvaluationResult<Vec<Entry<E::Ciphertext>>> {
    let mut next: Vec<Entry<E::Ciphertext>> = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter().peekable();

    while let Some(mut even) = iter.next() {
        if let Some(odd) = iter.next_if(|odd| odd.degree == even.degree) {
            next.push(merge(even, odd, basis, ops)?);
        } else if iter.peek().is_none() {
            // Unpaired trailing entry: it joins the bracket of its
            // predecessor and is merged next round.
            debug_assert!(!next.is_empty(), "trailing entry has no predecessor");
            if let Some(prev) = next.last() {
                even.degree = prev.degree;
            }
            next.push(even);
        } else {
            next.push(even);
        }
    }

    Ok(next)
}

fn merge<E: PolynomialEvaluator>(
    even: Entry<E::Ciphertext>,
    odd: Entry<E::Ciphertext>,
    basis: &PowerBasis<E::Ciphertext>,
    ops: &E,
) -> EvaluationResult<Entry<E::Ciphertext>> {
    let power = 1 << bit_len(even.degree);
    let x_pow = basis
        .get(power)
        .ok_or(EvaluationError::MissingPower { power })?;

    trace!(degree = even.degree, power, "giant step");
    let value = eval_monomial(&even.value, odd.value, x_pow, ops).map_err(
        |source| EvaluationError::GiantStep {
            degree: even.degree,
            source: Box::new(source),
        },
    )?;

    Ok(Entry {
        degree: 2 * power - 1,
        value,
    })
}

/// Computes `a + b * x_pow`, reusing `b`.
fn eval_monomial<E: PolynomialEvaluator>(
    a: &E::Ciphertext,
    mut b: E::Ciphertext,
    x_pow: &E::Ciphertext,
    ops: &E,
) -> Result<E::Ciphertext, E::Error> {
    if b.degree() == 2 {
        b = ops.relinearize(b);
    }

    let b = ops.rescale(b)?;
    let b = ops.mul(b, x_pow);

    if !a.scale().in_delta(b.scale(), SCALE_DELTA_BITS) {
        panic!(
            "scale discrepancy: {} != {}",
            a.scale().value(),
            b.scale().value()
        );
    }

    Ok(ops.add(b, a))
}
