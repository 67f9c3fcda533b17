//! Data segment framing.
//!
//! A raw packet arrives HWID first. Before transmission the HWID is moved
//! behind the payload, a length and flags byte are put in front, and a
//! checksum is appended:
//!
//! # Raw Packet
//!
//! ```text
//! +------------------+
//! | HWID (2 bytes)   |
//! +------------------+
//! | Seqnum (2)       |
//! +------------------+
//! | Data (N)         |
//! +------------------+
//! ```
//!
//! # Data Segment
//!
//! ```text
//! +------------------+
//! | Length (1)       |  bytes following this one = raw_len + 3
//! +------------------+
//! | Flags (1)        |  fixed per encoder
//! +------------------+
//! | Seqnum (2)       |  copied unchanged
//! +------------------+
//! | Data (N)         |  copied unchanged
//! +------------------+
//! | HWID (2)         |  relocated from the front
//! +------------------+
//! | Checksum (2)     |  u16 little-endian
//! +------------------+
//! ```
//!
//! The checksum covers Length through HWID inclusive.
//!
//! The framer only moves byte ranges. It never parses or re-encodes the
//! seqnum or HWID. Whitening and FEC happen later in the
//! [`assembler`](crate::assembler).

use crate::config::FrameConfig;
use crate::error::{PacketError, Result};
use crate::transform::Checksum;

/// Size of the HWID at the front of a raw packet.
pub const HWID_LEN: usize = 2;

/// Size of the seqnum following the HWID.
pub const SEQNUM_LEN: usize = 2;

/// Size of the trailing checksum.
pub const CHECKSUM_LEN: usize = 2;

/// Bytes the segment adds on top of the raw packet (length, flags, checksum).
pub const SEGMENT_OVERHEAD: usize = 2 + CHECKSUM_LEN;

/// Largest raw packet whose length byte still fits in a `u8`.
pub const MAX_RAW_LEN: usize = u8::MAX as usize - 3;

/// A validated raw packet, borrowed from the inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket<'a> {
    bytes: &'a [u8],
}

impl<'a> RawPacket<'a> {
    /// Validate a raw message.
    ///
    /// # Errors
    /// - `PacketError::TooShort` if there is no room for the HWID
    /// - `PacketError::TooLong` if the length byte would overflow
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < HWID_LEN {
            return Err(PacketError::TooShort {
                required: HWID_LEN,
                actual: bytes.len(),
            }
            .into());
        }
        if bytes.len() > MAX_RAW_LEN {
            return Err(PacketError::TooLong {
                max: MAX_RAW_LEN,
                actual: bytes.len(),
            }
            .into());
        }
        Ok(Self { bytes })
    }

    /// Build the raw message bytes for a packet.
    pub fn compose(hwid: u16, seqnum: u16, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HWID_LEN + SEQNUM_LEN + data.len());
        bytes.extend_from_slice(&hwid.to_be_bytes());
        bytes.extend_from_slice(&seqnum.to_be_bytes());
        bytes.extend_from_slice(data);
        bytes
    }

    pub fn hwid(&self) -> u16 {
        u16::from_be_bytes(self.hwid_bytes())
    }

    pub fn hwid_bytes(&self) -> [u8; 2] {
        [self.bytes[0], self.bytes[1]]
    }

    /// Everything after the HWID: seqnum followed by data.
    pub fn seqnum_and_payload(&self) -> &'a [u8] {
        &self.bytes[HWID_LEN..]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A framed data segment, before whitening and FEC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    bytes: Vec<u8>,
}

impl DataSegment {
    /// Value of the length byte.
    pub fn length(&self) -> u8 {
        self.bytes[0]
    }

    pub fn flags(&self) -> u8 {
        self.bytes[1]
    }

    /// Seqnum and data as copied from the raw packet.
    pub fn seqnum_and_payload(&self) -> &[u8] {
        &self.bytes[2..self.hwid_offset()]
    }

    /// Sequence number, if the raw packet carried one.
    pub fn seqnum(&self) -> Option<u16> {
        match self.seqnum_and_payload() {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// Application data following the seqnum.
    pub fn data(&self) -> &[u8] {
        let body = self.seqnum_and_payload();
        body.get(SEQNUM_LEN..).unwrap_or(&[])
    }

    pub fn hwid_bytes(&self) -> [u8; 2] {
        let at = self.hwid_offset();
        [self.bytes[at], self.bytes[at + 1]]
    }

    /// Checksum as stored (decoded from little-endian).
    pub fn checksum(&self) -> u16 {
        let at = self.bytes.len() - CHECKSUM_LEN;
        u16::from_le_bytes([self.bytes[at], self.bytes[at + 1]])
    }

    /// Bytes covered by the checksum.
    pub fn checksummed(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - CHECKSUM_LEN]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn hwid_offset(&self) -> usize {
        self.bytes.len() - CHECKSUM_LEN - HWID_LEN
    }
}

impl AsRef<[u8]> for DataSegment {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Build the data segment for a validated raw packet.
pub fn encode(raw: &RawPacket<'_>, cfg: &FrameConfig, checksum: &dyn Checksum) -> DataSegment {
    let body = raw.seqnum_and_payload();

    // Bounded by MAX_RAW_LEN, checked in RawPacket::parse
    let length = (raw.len() + 3) as u8;

    let mut bytes = Vec::with_capacity(raw.len() + SEGMENT_OVERHEAD);
    bytes.push(length);
    bytes.push(cfg.flags);
    bytes.extend_from_slice(body);
    bytes.extend_from_slice(&raw.hwid_bytes());

    let crc = checksum.checksum16(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());

    DataSegment { bytes }
}

/// Validate raw message bytes and build the data segment.
///
/// # Errors
/// Propagates `RawPacket::parse` errors. Nothing is built on failure.
pub fn encode_raw(raw: &[u8], cfg: &FrameConfig, checksum: &dyn Checksum) -> Result<DataSegment> {
    let packet = RawPacket::parse(raw)?;
    Ok(encode(&packet, cfg, checksum))
}
