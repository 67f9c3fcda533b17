//! PN9 data whitening.
//!
//! The keystream comes from a 9-bit LFSR (x^9 + x^5 + 1) seeded with all
//! ones. Each data byte is XORed with the low 8 bits of the register, then
//! the register is clocked 8 times. XOR makes the transform its own inverse.

use super::Whitening;

/// Initial register value.
pub const PN9_SEED: u16 = 0x1FF;

/// Default whitening for OpenLST data segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pn9;

impl Whitening for Pn9 {
    fn whiten(&self, bytes: &[u8]) -> Vec<u8> {
        bytes
            .iter()
            .zip(Pn9Sequence::new())
            .map(|(byte, key)| byte ^ key)
            .collect()
    }
}

/// Infinite PN9 keystream, one byte per item.
#[derive(Debug, Clone)]
pub struct Pn9Sequence {
    register: u16,
}

impl Pn9Sequence {
    pub fn new() -> Self {
        Self { register: PN9_SEED }
    }
}

impl Default for Pn9Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Pn9Sequence {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let key = (self.register & 0xFF) as u8;
        for _ in 0..8 {
            let feedback = ((self.register >> 5) ^ self.register) & 0x01;
            self.register = (self.register >> 1) | (feedback << 8);
        }
        Some(key)
    }
}
