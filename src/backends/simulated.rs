//! Cleartext simulation of the homomorphic operators.
//!
//! A [`SimulatedCiphertext`] carries the slot values it "encrypts" together
//! with the degree, level and scale a real RLWE ciphertext would have after
//! the same sequence of operations. Rescaling divides the scale by the
//! modulus dropped from the chain, so scale drift between levels is modelled
//! exactly; fresh encryptions add Gaussian noise of standard deviation
//! `error_std / scale` to every slot.
use crate::evaluator::{Ciphertext, PolynomialEvaluator, PowerBasis};
use crate::polynomial::{Polynomial, PolynomialVector};
use crate::{EncodingDomain, MetaData, Parameters, Scale};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("cannot rescale a ciphertext at level 0")]
    LevelExhausted,

    #[error("power basis has no entry X^{power}")]
    MissingPower { power: usize },

    #[error("X^{power} is at level {available}, below requested level {requested}")]
    LevelTooHigh {
        power: usize,
        requested: usize,
        available: usize,
    },

    #[error("requested level {level} exceeds max level {max_level}")]
    InvalidLevel { level: usize, max_level: usize },

    #[error("input too long: got {got}, max {max}")]
    TooManyValues { got: usize, max: usize },

    #[error("slot {slot} out of range for {slots} slots")]
    SlotOutOfRange { slot: usize, slots: usize },

    #[error("invalid noise standard deviation {std_dev}")]
    InvalidNoise { std_dev: f64 },
}

pub type SimulationResult<T> = Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedCiphertext {
    pub values: Vec<Complex64>,
    pub degree: usize,
    pub level: usize,
    pub meta: MetaData,
}

impl Ciphertext for SimulatedCiphertext {
    fn degree(&self) -> usize {
        self.degree
    }

    fn level(&self) -> usize {
        self.level
    }

    fn meta_data(&self) -> &MetaData {
        &self.meta
    }
}

pub struct SimulatedEvaluator {
    params: Parameters,
}

impl SimulatedEvaluator {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Encrypts `values` at the top level with the default scale. Unused
    /// slots are zero.
    pub fn encrypt<R: Rng>(
        &self,
        values: &[Complex64],
        rng: &mut R,
    ) -> SimulationResult<SimulatedCiphertext> {
        let slots = self.params.slots();
        if values.len() > slots {
            return Err(SimulationError::TooManyValues {
                got: values.len(),
                max: slots,
            });
        }

        let scale = self.params.default_scale();
        let std_dev = self.params.error_std() / scale.value();
        let noise = Normal::new(0.0, std_dev)
            .map_err(|_| SimulationError::InvalidNoise { std_dev })?;

        let values = (0..slots)
            .map(|i| {
                let value = values.get(i).copied().unwrap_or_default();
                value + Complex64::new(noise.sample(rng), noise.sample(rng))
            })
            .collect();

        Ok(SimulatedCiphertext {
            values,
            degree: 1,
            level: self.params.max_level(),
            meta: MetaData {
                scale,
                encoding_domain: EncodingDomain::Slots,
                // Bounded by MAX_LOG_SLOTS.
                log_slots: self.params.log_slots().map(|l| l as i8),
                is_ntt: true,
                is_montgomery: false,
            },
        })
    }

    pub fn decrypt(&self, ct: &SimulatedCiphertext) -> Vec<Complex64> {
        ct.values.clone()
    }

    /// Slot positions `poly.value[index]` applies to.
    fn slots_of(
        &self,
        poly: &PolynomialVector,
        index: usize,
    ) -> SimulationResult<Vec<usize>> {
        let slots = self.params.slots();
        match &poly.slots_index {
            None => Ok((0..slots).collect()),
            Some(map) => {
                let positions = map.get(&index).cloned().unwrap_or_default();
                match positions.iter().find(|&&slot| slot >= slots) {
                    Some(&slot) => {
                        Err(SimulationError::SlotOutOfRange { slot, slots })
                    }
                    None => Ok(positions),
                }
            }
        }
    }

    /// Looks up the powers `chunk` reads, checking they can be used at
    /// `level`.
    fn powers_for<'a>(
        &self,
        chunk: &Polynomial,
        level: usize,
        basis: &'a PowerBasis<SimulatedCiphertext>,
    ) -> SimulationResult<Vec<Option<&'a SimulatedCiphertext>>> {
        let mut powers = vec![None];
        for (power, coeff) in chunk.coeffs.iter().enumerate().skip(1) {
            if *coeff == Complex64::default() {
                powers.push(None);
                continue;
            }
            let ct = basis
                .get(power)
                .ok_or(SimulationError::MissingPower { power })?;
            if ct.level < level {
                return Err(SimulationError::LevelTooHigh {
                    power,
                    requested: level,
                    available: ct.level,
                });
            }
            powers.push(Some(ct));
        }
        Ok(powers)
    }
}

impl PolynomialEvaluator for SimulatedEvaluator {
    type Ciphertext = SimulatedCiphertext;
    type Error = SimulationError;

    fn evaluate_polynomial_vector_from_power_basis(
        &self,
        level: usize,
        poly: &PolynomialVector,
        basis: &PowerBasis<SimulatedCiphertext>,
        scale: Scale,
    ) -> SimulationResult<SimulatedCiphertext> {
        if level > self.params.max_level() {
            return Err(SimulationError::InvalidLevel {
                level,
                max_level: self.params.max_level(),
            });
        }
        let x = basis
            .get(1)
            .ok_or(SimulationError::MissingPower { power: 1 })?;

        let mut values = vec![Complex64::default(); self.params.slots()];
        for (index, chunk) in poly.value.iter().enumerate() {
            let powers = self.powers_for(chunk, level, basis)?;
            for slot in self.slots_of(poly, index)? {
                values[slot] = chunk
                    .coeffs
                    .iter()
                    .zip(&powers)
                    .map(|(&coeff, power)| match power {
                        Some(ct) => coeff * ct.values[slot],
                        None => coeff,
                    })
                    .sum();
            }
        }

        trace!(level, log_scale = scale.log2(), "chunk evaluated");
        Ok(SimulatedCiphertext {
            values,
            degree: 1,
            level,
            meta: MetaData { scale, ..x.meta },
        })
    }

    fn relinearize(&self, mut ct: SimulatedCiphertext) -> SimulatedCiphertext {
        ct.degree = ct.degree.min(1);
        ct
    }

    fn rescale(
        &self,
        mut ct: SimulatedCiphertext,
    ) -> SimulationResult<SimulatedCiphertext> {
        let q = self
            .params
            .rescale_factor(ct.level)
            .ok_or(SimulationError::LevelExhausted)?;
        ct.meta.scale = ct.meta.scale / q;
        ct.level -= 1;
        trace!(level = ct.level, log_scale = ct.meta.scale.log2(), "rescaled");
        Ok(ct)
    }

    fn mul(
        &self,
        mut lhs: SimulatedCiphertext,
        rhs: &SimulatedCiphertext,
    ) -> SimulatedCiphertext {
        for (a, b) in lhs.values.iter_mut().zip(&rhs.values) {
            *a *= b;
        }
        lhs.degree += rhs.degree;
        lhs.level = lhs.level.min(rhs.level);
        lhs.meta.scale = lhs.meta.scale * rhs.meta.scale;
        lhs
    }

    fn add(
        &self,
        mut lhs: SimulatedCiphertext,
        rhs: &SimulatedCiphertext,
    ) -> SimulatedCiphertext {
        for (a, b) in lhs.values.iter_mut().zip(&rhs.values) {
            *a += b;
        }
        lhs.degree = lhs.degree.max(rhs.degree);
        lhs.level = lhs.level.min(rhs.level);
        lhs
    }
}
