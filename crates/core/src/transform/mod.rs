//! Byte transforms applied while framing.
//!
//! The framer needs three pure byte transforms and treats each one as an
//! injected strategy:
//!
//! - [`Checksum`] - 16-bit integrity check over the data segment
//! - [`Whitening`] - length-preserving, self-inverse scrambler
//! - [`ForwardErrorCorrection`] - redundancy encoding that expands the segment
//!
//! Every trait is implemented for plain functions and closures of the
//! matching signature, so a test double is just a closure.
//!
//! The default implementations follow the CC1110 radio family used on
//! OpenLST boards:
//!
//! - [`Crc16`] - CRC-16, poly 0x8005, init 0xFFFF (CRC-16/CMS)
//! - [`Pn9`] - PN9 whitening seeded with 0x1FF
//! - [`Cc1110Fec`] - rate 1/2 convolutional code with 4x4 interleaving

mod crc16;
mod fec;
mod whitening;

use std::fmt;
use std::sync::Arc;

pub use crc16::Crc16;
pub use fec::{encoded_len, Cc1110Fec};
pub use whitening::{Pn9, Pn9Sequence};

/// 16-bit checksum over a byte slice.
pub trait Checksum {
    fn checksum16(&self, bytes: &[u8]) -> u16;
}

/// Length-preserving scrambler. Applying it twice restores the input.
pub trait Whitening {
    fn whiten(&self, bytes: &[u8]) -> Vec<u8>;
}

/// Forward error correction encoder. Output is at least twice the input.
pub trait ForwardErrorCorrection {
    fn encode_fec(&self, bytes: &[u8]) -> Vec<u8>;
}

impl<F> Checksum for F
where
    F: Fn(&[u8]) -> u16,
{
    fn checksum16(&self, bytes: &[u8]) -> u16 {
        self(bytes)
    }
}

impl<F> Whitening for F
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn whiten(&self, bytes: &[u8]) -> Vec<u8> {
        self(bytes)
    }
}

impl<F> ForwardErrorCorrection for F
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn encode_fec(&self, bytes: &[u8]) -> Vec<u8> {
        self(bytes)
    }
}

/// The set of transforms an encoder frames with.
///
/// Cloning is cheap; the strategies are shared.
#[derive(Clone)]
pub struct Transforms {
    checksum: Arc<dyn Checksum + Send + Sync>,
    whitening: Arc<dyn Whitening + Send + Sync>,
    fec: Arc<dyn ForwardErrorCorrection + Send + Sync>,
}

impl Transforms {
    pub fn new<C, W, F>(checksum: C, whitening: W, fec: F) -> Self
    where
        C: Checksum + Send + Sync + 'static,
        W: Whitening + Send + Sync + 'static,
        F: ForwardErrorCorrection + Send + Sync + 'static,
    {
        Self {
            checksum: Arc::new(checksum),
            whitening: Arc::new(whitening),
            fec: Arc::new(fec),
        }
    }

    /// Replace the checksum, keeping the other two strategies.
    pub fn with_checksum<C>(mut self, checksum: C) -> Self
    where
        C: Checksum + Send + Sync + 'static,
    {
        self.checksum = Arc::new(checksum);
        self
    }

    /// Replace the whitening, keeping the other two strategies.
    pub fn with_whitening<W>(mut self, whitening: W) -> Self
    where
        W: Whitening + Send + Sync + 'static,
    {
        self.whitening = Arc::new(whitening);
        self
    }

    /// Replace the FEC encoder, keeping the other two strategies.
    pub fn with_fec<F>(mut self, fec: F) -> Self
    where
        F: ForwardErrorCorrection + Send + Sync + 'static,
    {
        self.fec = Arc::new(fec);
        self
    }

    pub fn checksum(&self) -> &dyn Checksum {
        self.checksum.as_ref()
    }

    pub fn whitening(&self) -> &dyn Whitening {
        self.whitening.as_ref()
    }

    pub fn fec(&self) -> &dyn ForwardErrorCorrection {
        self.fec.as_ref()
    }
}

impl Default for Transforms {
    fn default() -> Self {
        Self::new(Crc16, Pn9, Cc1110Fec)
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transforms").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_are_strategies() {
        let transforms = Transforms::new(
            |bytes: &[u8]| bytes.len() as u16,
            |bytes: &[u8]| bytes.iter().map(|b| !b).collect::<Vec<u8>>(),
            |bytes: &[u8]| bytes.iter().flat_map(|&b| [b, b]).collect::<Vec<u8>>(),
        );

        assert_eq!(transforms.checksum().checksum16(&[1, 2, 3]), 3);
        assert_eq!(transforms.whitening().whiten(&[0x00, 0xF0]), vec![0xFF, 0x0F]);
        assert_eq!(transforms.fec().encode_fec(&[7, 9]), vec![7, 7, 9, 9]);
    }

    #[test]
    fn test_default_uses_cc1110_algorithms() {
        let transforms = Transforms::default();
        assert_eq!(transforms.checksum().checksum16(b"123456789"), 0xAEE7);
        assert_eq!(transforms.whitening().whiten(&[0x00]), vec![0xFF]);
        assert_eq!(transforms.fec().encode_fec(&[]).len(), 4);
    }

    #[test]
    fn test_with_replaces_one_strategy() {
        let transforms = Transforms::default().with_checksum(|_: &[u8]| 0xBEEFu16);
        assert_eq!(transforms.checksum().checksum16(b"123456789"), 0xBEEF);
        assert_eq!(transforms.whitening().whiten(&[0x00]), vec![0xFF]);
    }
}
