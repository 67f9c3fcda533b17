//! Packet generation and loading.
//!
//! When no packet file is specified, we generate a burst of raw packets with
//! a mix of payload shapes so whitening and FEC have something visible to do:
//!
//! - Runs of one byte value (long constant stretches whitening breaks up)
//! - Text-like command strings
//! - Random telemetry bytes
//!
//! Packet files hold one hex-encoded raw packet per line. Blank lines and
//! lines starting with `#` are skipped.

use openlst_framer_core::framer::{RawPacket, MAX_RAW_LEN};
use openlst_framer_core::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Largest application payload that still fits a frame (after HWID and seqnum).
pub const MAX_PAYLOAD: usize = MAX_RAW_LEN - 4;

/// Generate `count` raw packets with consecutive seqnums.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `hwid`: hardware ID written into every packet
/// - `max_payload`: upper bound on each packet's data length
pub fn generate_packets(seed: u64, count: usize, hwid: u16, max_payload: usize) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let max_payload = max_payload.min(MAX_PAYLOAD);
    let first_seqnum: u16 = rng.gen();

    (0..count)
        .map(|i| {
            let seqnum = first_seqnum.wrapping_add(i as u16);
            let len = rng.gen_range(0..=max_payload);
            let data = generate_payload(&mut rng, len);
            RawPacket::compose(hwid, seqnum, &data)
        })
        .collect()
}

fn generate_payload(rng: &mut ChaCha8Rng, len: usize) -> Vec<u8> {
    match rng.gen_range(0..10) {
        // 30% runs of same byte
        0..=2 => {
            let byte_value: u8 = rng.gen();
            vec![byte_value; len]
        }

        // 30% command-like text
        3..=5 => {
            let alphabet = b"abcdefghijklmnopqrstuvwxyz0123456789 _=";
            (0..len)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                .collect()
        }

        // 40% random telemetry
        _ => (0..len).map(|_| rng.gen()).collect(),
    }
}

/// Parse one line of hex (whitespace between bytes allowed).
pub fn parse_hex(line: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = line.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(Error::Config(format!("odd number of hex digits: {}", line.trim())));
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let hi = hex_value(pair[0]);
            let lo = hex_value(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(Error::Config(format!("invalid hex: {}", line.trim()))),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|v| v as u8)
}

/// Read raw packets from a hex packet file.
pub fn read_packet_file(path: &Path) -> Result<Vec<Vec<u8>>> {
    let text = std::fs::read_to_string(path)?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_hex)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_packets() {
        let packets = generate_packets(42, 10, 0x1234, 32);
        assert_eq!(packets.len(), 10);
        for packet in &packets {
            assert_eq!(&packet[..2], &[0x12, 0x34]);
            assert!(packet.len() >= 4 && packet.len() <= 4 + 32);
        }
    }

    #[test]
    fn test_seqnums_are_consecutive() {
        let packets = generate_packets(5, 3, 0x0001, 0);
        let seqnums: Vec<u16> = packets
            .iter()
            .map(|p| u16::from_be_bytes([p[2], p[3]]))
            .collect();
        assert_eq!(seqnums[1], seqnums[0].wrapping_add(1));
        assert_eq!(seqnums[2], seqnums[0].wrapping_add(2));
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_packets(12345, 8, 7, 64), generate_packets(12345, 8, 7, 64));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_packets(1, 8, 7, 64), generate_packets(2, 8, 7, 64));
    }

    #[test]
    fn test_payload_clamped_to_frame_limit() {
        for packet in generate_packets(3, 50, 9, 10_000) {
            assert!(packet.len() <= MAX_RAW_LEN);
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("1234 0001 abCD").unwrap(), vec![0x12, 0x34, 0x00, 0x01, 0xAB, 0xCD]);
        assert!(parse_hex("123").is_err());
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn test_read_packet_file() {
        let path = std::env::temp_dir().join(format!("openlst-packets-{}.hex", std::process::id()));
        std::fs::write(&path, "# telemetry burst\n12340001abcd\n\n  beef  \n").unwrap();

        let packets = read_packet_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(packets, vec![vec![0x12, 0x34, 0x00, 0x01, 0xAB, 0xCD], vec![0xBE, 0xEF]]);
    }
}
