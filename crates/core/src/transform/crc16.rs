//! CRC-16 as computed by the CC1110 radio.

use crc::{Crc, CRC_16_CMS};

use super::Checksum;

/// Poly 0x8005, init 0xFFFF, no reflection, no final XOR.
const CC1110_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_CMS);

/// Default checksum for OpenLST data segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16;

impl Checksum for Crc16 {
    fn checksum16(&self, bytes: &[u8]) -> u16 {
        CC1110_CRC.checksum(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(Crc16.checksum16(b"123456789"), 0xAEE7);
    }

    #[test]
    fn test_empty_is_init() {
        assert_eq!(Crc16.checksum16(&[]), 0xFFFF);
    }

    #[test]
    fn test_segment_vector() {
        let segment = [0x09, 0xC0, 0x00, 0x01, 0xAB, 0xCD, 0x12, 0x34];
        assert_eq!(Crc16.checksum16(&segment), 0xA1F1);
    }

    #[test]
    fn test_single_bit_flip_changes_crc() {
        let data = b"telemetry";
        let mut corrupted = data.to_vec();
        corrupted[3] ^= 0x01;
        assert_ne!(Crc16.checksum16(data), Crc16.checksum16(&corrupted));
    }
}
