//! Scheme parameters: the modulus chain and the default encoding scale.
pub mod builder;

pub use builder::ParametersBuilder;

use crate::Scale;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("modulus chain must contain at least one modulus")]
    EmptyModulusChain,

    #[error("modulus {modulus} at level {level} is too small")]
    InvalidModulus { level: usize, modulus: u64 },

    #[error("log default scale {0} out of range (1..=62)")]
    InvalidLogScale(u32),

    #[error("log slots {0:?} out of range")]
    InvalidLogSlots([usize; 2]),

    #[error("invalid error standard deviation: {0} (must be finite and >= 0)")]
    InvalidErrorStd(f64),
}

pub type ParameterResult<T> = Result<T, ParameterError>;

/// Largest supported log-slot count per dimension.
pub const MAX_LOG_SLOTS: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    moduli: Vec<u64>,
    log_default_scale: u32,
    log_slots: [usize; 2],
    error_std: f64,
}

impl Parameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::new()
    }

    pub fn new(
        moduli: Vec<u64>,
        log_default_scale: u32,
        log_slots: [usize; 2],
        error_std: f64,
    ) -> ParameterResult<Self> {
        if moduli.is_empty() {
            return Err(ParameterError::EmptyModulusChain);
        }
        if let Some((level, &modulus)) =
            moduli.iter().enumerate().find(|&(_, &q)| q < 2)
        {
            return Err(ParameterError::InvalidModulus { level, modulus });
        }
        if !(1..=62).contains(&log_default_scale) {
            return Err(ParameterError::InvalidLogScale(log_default_scale));
        }
        if log_slots.iter().any(|&l| l > MAX_LOG_SLOTS) {
            return Err(ParameterError::InvalidLogSlots(log_slots));
        }
        if !error_std.is_finite() || error_std < 0.0 {
            return Err(ParameterError::InvalidErrorStd(error_std));
        }
        Ok(Self {
            moduli,
            log_default_scale,
            log_slots,
            error_std,
        })
    }

    pub fn moduli(&self) -> &[u64] {
        &self.moduli
    }

    /// Level of a fresh ciphertext.
    pub fn max_level(&self) -> usize {
        self.moduli.len() - 1
    }

    pub fn default_scale(&self) -> Scale {
        Scale::from_log2(self.log_default_scale)
    }

    pub fn log_slots(&self) -> [usize; 2] {
        self.log_slots
    }

    /// Total number of slots across both dimensions.
    pub fn slots(&self) -> usize {
        1 << (self.log_slots[0] + self.log_slots[1])
    }

    pub fn error_std(&self) -> f64 {
        self.error_std
    }

    /// Factor by which a rescale at `level` divides the scale, `None` when
    /// there is no level below to rescale into.
    pub fn rescale_factor(&self, level: usize) -> Option<Scale> {
        if level == 0 {
            return None;
        }
        self.moduli.get(level).map(|&q| Scale::new(q as f64))
    }
}
