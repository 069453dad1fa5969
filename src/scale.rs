use crate::metadata::{CodecError, CodecResult};
use std::fmt;
use std::ops::{Div, Mul};

/// Number of significant bits carried by a [`Scale`].
pub const SCALE_PRECISION: u32 = f64::MANTISSA_DIGITS;

/// Fixed-point scaling factor attached to every ciphertext.
///
/// The encoded message is `round(m * scale)`; multiplying two ciphertexts
/// multiplies their scales and rescaling divides the scale by the modulus
/// that is dropped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Scale {
    pub value: f64,
}

impl Scale {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn from_log2(log_scale: u32) -> Self {
        Self::new(2f64.powi(log_scale as i32))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn log2(&self) -> f64 {
        self.value.log2()
    }

    /// Returns `-log2(|1 - self/other|)`, the number of leading bits on
    /// which both scales agree. Identical scales return infinity.
    pub fn log2_delta(&self, other: Scale) -> f64 {
        if self.value == other.value {
            return f64::INFINITY;
        }
        -(1.0 - self.value / other.value).abs().log2()
    }

    /// True if both scales agree on at least `log2_delta` leading bits.
    pub fn in_delta(&self, other: Scale, log2_delta: f64) -> bool {
        self.log2_delta(other) >= log2_delta
    }

    pub const fn binary_size() -> usize {
        8
    }

    pub fn encode(&self, buf: &mut [u8]) -> CodecResult<usize> {
        let needed = Self::binary_size();
        if buf.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                actual: buf.len(),
            });
        }
        buf[..needed].copy_from_slice(&self.value.to_le_bytes());
        Ok(needed)
    }

    pub fn decode(&mut self, buf: &[u8]) -> CodecResult<usize> {
        let needed = Self::binary_size();
        if buf.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                actual: buf.len(),
            });
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&buf[..needed]);
        self.value = f64::from_le_bytes(bytes);
        Ok(needed)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Mul for Scale {
    type Output = Scale;

    fn mul(self, rhs: Scale) -> Scale {
        Scale::new(self.value * rhs.value)
    }
}

impl Div for Scale {
    type Output = Scale;

    fn div(self, rhs: Scale) -> Scale {
        Scale::new(self.value / rhs.value)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2^{:.6}", self.log2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_scales_are_infinitely_close() {
        let s = Scale::from_log2(40);
        assert_eq!(s.log2_delta(s), f64::INFINITY);
        assert!(s.in_delta(s, SCALE_PRECISION as f64));
    }

    #[test]
    fn in_delta_counts_agreeing_bits() {
        let a = Scale::new(1024.0);
        // relative difference of 2^-20
        let b = Scale::new(1024.0 * (1.0 + 2f64.powi(-20)));
        assert!(a.in_delta(b, 19.0));
        assert!(!a.in_delta(b, 21.0));
    }

    #[test]
    fn mul_and_div_track_rescaling() {
        let delta = Scale::from_log2(30);
        let squared = delta * delta;
        assert_eq!(squared.log2(), 60.0);
        assert_eq!(squared / delta, delta);
    }

    #[test]
    fn encode_requires_eight_bytes() {
        let mut buf = [0u8; 7];
        assert!(matches!(
            Scale::new(3.5).encode(&mut buf),
            Err(CodecError::BufferTooSmall {
                needed: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn encode_decode_preserves_value() {
        let mut buf = [0u8; 8];
        let scale = Scale::new(1099511627776.5);
        assert_eq!(scale.encode(&mut buf).unwrap(), 8);
        let mut decoded = Scale::default();
        assert_eq!(decoded.decode(&buf).unwrap(), 8);
        assert_eq!(decoded, scale);
    }
}
