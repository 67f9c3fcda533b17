//! CC1110 forward error correction.
//!
//! Encoding runs in two stages:
//!
//! 1. Trellis termination and convolution. The input is padded with `0x0B`
//!    terminator bytes to an even length of `2 * (len / 2 + 1)` bytes, then
//!    fed MSB first through a rate 1/2, constraint length 4 convolutional
//!    encoder. Every input byte yields two output bytes.
//! 2. Interleaving. Each 4-byte block of encoder output is treated as a 4x4
//!    matrix of 2-bit symbols and transposed.
//!
//! The output length is `4 * (len / 2 + 1)`.

use super::ForwardErrorCorrection;

/// Output symbol for each (3-bit state, input bit) pair.
const ENCODE_TABLE: [u8; 16] = [0, 3, 1, 2, 3, 0, 2, 1, 3, 0, 2, 1, 0, 3, 1, 2];

/// Byte appended to flush the encoder state.
pub const TRELLIS_TERMINATOR: u8 = 0x0B;

/// Default FEC for OpenLST data segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cc1110Fec;

impl ForwardErrorCorrection for Cc1110Fec {
    fn encode_fec(&self, bytes: &[u8]) -> Vec<u8> {
        interleave(&convolve(bytes))
    }
}

/// Length of the FEC output for `input_len` bytes of input.
pub fn encoded_len(input_len: usize) -> usize {
    4 * (input_len / 2 + 1)
}

fn convolve(bytes: &[u8]) -> Vec<u8> {
    let padded_len = 2 * (bytes.len() / 2 + 1);
    let mut out = Vec::with_capacity(padded_len * 2);

    // Upper 3 bits hold encoder state, lower 8 bits the current input byte.
    let mut register: u16 = 0;

    let input = bytes
        .iter()
        .copied()
        .chain(std::iter::repeat(TRELLIS_TERMINATOR))
        .take(padded_len);

    for byte in input {
        register = (register & 0x700) | u16::from(byte);
        let mut symbols: u16 = 0;
        for _ in 0..8 {
            symbols = (symbols << 2) | u16::from(ENCODE_TABLE[(register >> 7) as usize]);
            register = (register << 1) & 0x7FF;
        }
        out.extend_from_slice(&symbols.to_be_bytes());
    }

    out
}

fn interleave(encoded: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded.len());

    for block in encoded.chunks_exact(4) {
        let mut word: u32 = 0;
        for j in 0..16usize {
            let byte = block[!j & 0x03];
            let shift = 2 * ((j & 0x0C) >> 2);
            word = (word << 2) | u32::from((byte >> shift) & 0x03);
        }
        out.extend_from_slice(&word.to_be_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0), 4);
        assert_eq!(encoded_len(1), 4);
        assert_eq!(encoded_len(2), 8);
        assert_eq!(encoded_len(3), 8);
        assert_eq!(encoded_len(10), 24);
    }

    #[test]
    fn test_output_length_matches_encoded_len() {
        for len in 0..40 {
            let out = Cc1110Fec.encode_fec(&vec![0xA5; len]);
            assert_eq!(out.len(), encoded_len(len));
            assert!(out.len() >= 2 * len);
        }
    }

    #[test]
    fn test_terminator_only_vectors() {
        assert_eq!(Cc1110Fec.encode_fec(&[]), vec![0x44, 0x30, 0x44, 0xEC]);
        assert_eq!(Cc1110Fec.encode_fec(&[0x00]), vec![0x40, 0x00, 0x40, 0xC0]);
    }

    #[test]
    fn test_short_vector() {
        assert_eq!(
            Cc1110Fec.encode_fec(&[0x01, 0x02, 0x03]),
            vec![0x4C, 0xF0, 0x30, 0x10, 0x48, 0x3C, 0x43, 0xE3]
        );
    }

    #[test]
    fn test_segment_vector() {
        let segment = [0x09, 0xC0, 0x00, 0x01, 0xAB, 0xCD, 0x12, 0x34, 0xF1, 0xA1];
        assert_eq!(
            Cc1110Fec.encode_fec(&segment),
            vec![
                0x00, 0x1C, 0x14, 0xEC, 0xC0, 0x00, 0x00, 0x00, 0xC6, 0x93, 0xAA, 0x12,
                0xE7, 0xB3, 0xFF, 0xB6, 0xEE, 0x3D, 0xE2, 0xE4, 0x44, 0x33, 0x47, 0xED,
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let data = b"OpenLST";
        assert_eq!(Cc1110Fec.encode_fec(data), Cc1110Fec.encode_fec(data));
    }
}
