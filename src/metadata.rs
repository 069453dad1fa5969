//! Per-ciphertext metadata and its fixed-size binary form.
//!
//! Layout (13 bytes):
//!
//! ```text
//! [scale: 8][encoding domain: 1][log slots 0: i8][log slots 1: i8][ntt: 1][montgomery: 1]
//! ```
use crate::Scale;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Whether plaintext values are packed into slots or raw coefficients.
///
/// Tags other than 0 and 1 are kept as [`EncodingDomain::Other`] so that
/// decoding never loses the byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingDomain {
    #[default]
    Slots,
    Coefficients,
    Other(u8),
}

impl EncodingDomain {
    pub fn tag(self) -> u8 {
        match self {
            Self::Slots => 0,
            Self::Coefficients => 1,
            Self::Other(tag) => tag,
        }
    }
}

impl From<u8> for EncodingDomain {
    fn from(tag: u8) -> Self {
        match tag {
            0 => Self::Slots,
            1 => Self::Coefficients,
            tag => Self::Other(tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetaData {
    pub scale: Scale,
    pub encoding_domain: EncodingDomain,
    /// Log2 of the slot count per dimension, one signed byte each on the
    /// wire.
    pub log_slots: [i8; 2],
    /// Polynomials are stored in the NTT (evaluation) domain.
    pub is_ntt: bool,
    /// Residues are stored in Montgomery form.
    pub is_montgomery: bool,
}

impl MetaData {
    /// Slot count per dimension, `None` when a log slot count is negative
    /// or too large for `usize`.
    pub fn slots(&self) -> Option<[usize; 2]> {
        let slots = |log_slots: i8| {
            u32::try_from(log_slots)
                .ok()
                .and_then(|shift| 1usize.checked_shl(shift))
        };
        Some([slots(self.log_slots[0])?, slots(self.log_slots[1])?])
    }

    pub const fn binary_size() -> usize {
        5 + Scale::binary_size()
    }

    /// Structural comparison over every field, without tolerance.
    pub fn equal(&self, other: &MetaData) -> bool {
        self == other
    }

    /// Writes the metadata into the front of `buf`, returning the number of
    /// bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> CodecResult<usize> {
        let needed = Self::binary_size();
        if buf.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                actual: buf.len(),
            });
        }

        let mut n = self.scale.encode(buf)?;

        buf[n] = self.encoding_domain.tag();
        n += 1;

        for &log_slots in &self.log_slots {
            buf[n] = log_slots as u8;
            n += 1;
        }

        buf[n] = self.is_ntt as u8;
        n += 1;

        buf[n] = self.is_montgomery as u8;
        n += 1;

        Ok(n)
    }

    /// Reads metadata produced by [`MetaData::encode`], returning the number
    /// of bytes consumed. Only a short buffer fails; `self` is left
    /// untouched in that case.
    pub fn decode(&mut self, buf: &[u8]) -> CodecResult<usize> {
        let needed = Self::binary_size();
        if buf.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                actual: buf.len(),
            });
        }

        let mut scale = Scale::default();
        let mut n = scale.decode(buf)?;

        let encoding_domain = EncodingDomain::from(buf[n]);
        n += 1;

        let log_slots = [buf[n] as i8, buf[n + 1] as i8];
        n += 2;

        // Any nonzero byte is true.
        let is_ntt = buf[n] != 0;
        n += 1;

        let is_montgomery = buf[n] != 0;
        n += 1;

        *self = MetaData {
            scale,
            encoding_domain,
            log_slots,
            is_ntt,
            is_montgomery,
        };
        Ok(n)
    }

    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut buf = vec![0u8; Self::binary_size()];
        self.encode(&mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(buf: &[u8]) -> CodecResult<Self> {
        let mut meta = Self::default();
        meta.decode(buf)?;
        Ok(meta)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> CodecResult<usize> {
        let buf = self.to_bytes()?;
        writer.write_all(&buf)?;
        Ok(buf.len())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> CodecResult<Self> {
        let mut buf = [0u8; MetaData::binary_size()];
        reader.read_exact(&mut buf)?;
        Self::from_bytes(&buf)
    }
}
