use super::{ParameterResult, Parameters};

/// Default modulus chain: a 55-bit base modulus followed by rescaling
/// moduli close to, but distinct from, the default 2^40 scale.
const DEFAULT_MODULI: [u64; 8] = [
    0x7fffffffba0001,
    0xffffee0001,
    0xffffc40001,
    0x10000140001,
    0xffff8a0001,
    0xffff820001,
    0x100003e0001,
    0xffff6e0001,
];

pub struct ParametersBuilder {
    moduli: Option<Vec<u64>>,
    log_default_scale: Option<u32>,
    log_slots: Option<[usize; 2]>,
    error_std: Option<f64>,
}

impl Default for ParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametersBuilder {
    pub fn new() -> Self {
        Self {
            moduli: None,
            log_default_scale: None,
            log_slots: None,
            error_std: None,
        }
    }

    pub fn moduli(mut self, moduli: Vec<u64>) -> Self {
        self.moduli = Some(moduli);
        self
    }

    pub fn log_default_scale(mut self, log_scale: u32) -> Self {
        self.log_default_scale = Some(log_scale);
        self
    }

    pub fn log_slots(mut self, log_slots: [usize; 2]) -> Self {
        self.log_slots = Some(log_slots);
        self
    }

    pub fn error_std(mut self, std_dev: f64) -> Self {
        self.error_std = Some(std_dev);
        self
    }

    pub fn build(self) -> ParameterResult<Parameters> {
        Parameters::new(
            self.moduli.unwrap_or_else(|| DEFAULT_MODULI.to_vec()),
            self.log_default_scale.unwrap_or(40),
            self.log_slots.unwrap_or([0, 4]),
            self.error_std.unwrap_or(3.2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterError;

    #[test]
    fn defaults_build() {
        let params = ParametersBuilder::new().build().unwrap();
        assert_eq!(params.max_level(), 7);
        assert_eq!(params.slots(), 16);
        assert_eq!(params.default_scale().log2(), 40.0);
    }

    #[test]
    fn overrides_are_validated() {
        assert_eq!(
            Parameters::builder().moduli(vec![]).build(),
            Err(ParameterError::EmptyModulusChain)
        );
        assert_eq!(
            Parameters::builder().error_std(-1.0).build(),
            Err(ParameterError::InvalidErrorStd(-1.0))
        );
    }
}
