use super::{Ciphertext, PolynomialEvaluator};
use crate::polynomial::optimal_split;
use crate::polynomial::paterson_stockmeyer::bit_len;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Encrypted powers `X^k` of an input ciphertext `X`, keyed by `k`.
#[derive(Debug, Clone)]
pub struct PowerBasis<C> {
    value: BTreeMap<usize, C>,
}

impl<C: Ciphertext> PowerBasis<C> {
    /// Basis holding only `X^1 = x`.
    pub fn new(x: C) -> Self {
        Self {
            value: BTreeMap::from([(1, x)]),
        }
    }

    pub fn get(&self, power: usize) -> Option<&C> {
        self.value.get(&power)
    }

    pub fn insert(&mut self, power: usize, ct: C) -> Option<C> {
        self.value.insert(power, ct)
    }

    pub fn contains(&self, power: usize) -> bool {
        self.value.contains_key(&power)
    }

    /// Exponents present in the basis, ascending.
    pub fn powers(&self) -> impl Iterator<Item = usize> + '_ {
        self.value.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Builds every power a Paterson–Stockmeyer evaluation of a degree
    /// `degree` polynomial reads: the baby steps `X^1..X^(base-1)` and the
    /// giant steps `X^(2^j)` for `base <= 2^j < 2^bit_len(degree)`.
    #[instrument(skip_all, fields(degree = degree))]
    pub fn generate<E>(x: C, degree: usize, ops: &E) -> Result<Self, E::Error>
    where
        E: PolynomialEvaluator<Ciphertext = C>,
    {
        let log_degree = bit_len(degree);
        let log_split = optimal_split(log_degree);

        let mut basis = Self::new(x);
        for power in 2..(1 << log_split) {
            basis.gen_power(power, ops)?;
        }
        for log_power in log_split..log_degree {
            basis.gen_power(1 << log_power, ops)?;
        }
        debug!(entries = basis.len(), "power basis ready");
        Ok(basis)
    }

    /// Computes `X^power` from smaller powers if it is not present yet.
    ///
    /// `X^(2^j)` is squared from `X^(2^(j-1))`; any other power `n` is the
    /// product of the largest power of two below `n` and the remainder.
    /// `X^0` is not part of a basis; asking for it does nothing.
    pub fn gen_power<E>(&mut self, power: usize, ops: &E) -> Result<(), E::Error>
    where
        E: PolynomialEvaluator<Ciphertext = C>,
    {
        if power == 0 {
            return Ok(());
        }
        self.power(power, ops).map(|_| ())
    }

    fn power<E>(&mut self, power: usize, ops: &E) -> Result<C, E::Error>
    where
        E: PolynomialEvaluator<Ciphertext = C>,
    {
        if let Some(ct) = self.value.get(&power) {
            return Ok(ct.clone());
        }

        let a = if power.is_power_of_two() {
            power >> 1
        } else {
            1 << (bit_len(power) - 1)
        };
        let lhs = self.power(a, ops)?;
        let rhs = self.power(power - a, ops)?;

        let product = ops.rescale(ops.relinearize(ops.mul(lhs, &rhs)))?;
        debug!(
            power,
            level = product.level(),
            log_scale = product.scale().log2(),
            "generated power"
        );
        self.value.insert(power, product.clone());
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{SimulatedCiphertext, SimulatedEvaluator};
    use crate::Parameters;
    use num_complex::Complex64;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup() -> (SimulatedEvaluator, SimulatedCiphertext) {
        let params = Parameters::builder()
            .log_slots([0, 1])
            .error_std(0.0)
            .build()
            .unwrap();
        let eval = SimulatedEvaluator::new(params);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let values = [Complex64::new(2.0, 0.0), Complex64::new(-0.5, 0.0)];
        let x = eval.encrypt(&values, &mut rng).unwrap();
        (eval, x)
    }

    #[test]
    fn zeroth_power_is_ignored() {
        let (eval, x) = setup();
        let mut basis = PowerBasis::new(x);
        basis.gen_power(0, &eval).unwrap();
        assert_eq!(basis.powers().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn gen_power_fills_intermediate_powers() {
        let (eval, x) = setup();
        let mut basis = PowerBasis::new(x);
        basis.gen_power(6, &eval).unwrap();
        // 6 = 4 + 2, 4 = 2 * 2
        assert_eq!(basis.powers().collect::<Vec<_>>(), vec![1, 2, 4, 6]);
        let x6 = basis.get(6).unwrap();
        assert_eq!(x6.values[0], Complex64::new(64.0, 0.0));
        assert_eq!(x6.level(), 4);
    }
}
