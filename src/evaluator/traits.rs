use super::PowerBasis;
use crate::polynomial::PolynomialVector;
use crate::{MetaData, Scale};

/// Structural view of a ciphertext: what the polynomial evaluator reads.
pub trait Ciphertext: Clone {
    /// Number of encrypted polynomial components minus one.
    fn degree(&self) -> usize;

    /// Position in the modulus chain.
    fn level(&self) -> usize;

    fn meta_data(&self) -> &MetaData;

    fn scale(&self) -> Scale {
        self.meta_data().scale
    }
}

/// Homomorphic operators the polynomial evaluator is built on.
///
/// Operators consume the operand they overwrite and return the result, so
/// implementations can reuse its storage.
pub trait PolynomialEvaluator {
    type Ciphertext: Ciphertext;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates every polynomial of `poly` on its slots, using only scalar
    /// multiplications by entries of `basis`. The result is a degree-1
    /// ciphertext at `level` with scale `scale`.
    fn evaluate_polynomial_vector_from_power_basis(
        &self,
        level: usize,
        poly: &PolynomialVector,
        basis: &PowerBasis<Self::Ciphertext>,
        scale: Scale,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Reduces a degree-2 ciphertext to degree 1.
    fn relinearize(&self, ct: Self::Ciphertext) -> Self::Ciphertext;

    /// Drops one level, dividing the scale by the dropped modulus.
    fn rescale(
        &self,
        ct: Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;

    fn mul(
        &self,
        lhs: Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Self::Ciphertext;

    fn add(
        &self,
        lhs: Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Self::Ciphertext;
}
