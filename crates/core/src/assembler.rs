//! Transmit frame assembly.
//!
//! # Frame Format
//!
//! ```text
//! +----------------------------+
//! | Preamble                   |  0xAA x preamble_bytes
//! +----------------------------+
//! | Sync words                 |  (high, low) x sync_words
//! +----------------------------+
//! | Transform(DataSegment)     |  whiten (optional), then FEC (optional)
//! +----------------------------+
//! ```
//!
//! The preamble and sync words are never whitened or FEC encoded. When both
//! transforms are enabled, FEC is computed over the whitened bytes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{FrameConfig, PREAMBLE_BYTE};
use crate::framer::DataSegment;
use crate::transform::Transforms;

/// A complete frame, ready to be handed to the radio byte by byte.
///
/// Immutable once built. Clones share the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitFrame {
    bytes: Bytes,
    prefix_len: usize,
}

impl TransmitFrame {
    /// Wrap already-assembled frame bytes.
    ///
    /// `prefix_len` is clamped to the frame length.
    pub fn from_bytes(bytes: Bytes, prefix_len: usize) -> Self {
        let prefix_len = prefix_len.min(bytes.len());
        Self { bytes, prefix_len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap clone of the frame buffer.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// Unencoded preamble and sync word bytes.
    pub fn prefix(&self) -> &[u8] {
        &self.bytes[..self.prefix_len]
    }

    /// Encoded data segment following the prefix.
    pub fn body(&self) -> &[u8] {
        &self.bytes[self.prefix_len..]
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Build the preamble and sync word prefix for a configuration.
pub fn preamble(cfg: &FrameConfig) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(cfg.prefix_len());
    write_prefix(&mut out, cfg);
    out.to_vec()
}

/// Apply the enabled transforms to a data segment, whitening first.
pub fn transform_segment(
    segment: &DataSegment,
    cfg: &FrameConfig,
    transforms: &Transforms,
) -> Vec<u8> {
    let mut content = segment.as_bytes().to_vec();

    if cfg.whitening_enabled {
        content = transforms.whitening().whiten(&content);
    }
    if cfg.fec_enabled {
        content = transforms.fec().encode_fec(&content);
    }

    content
}

/// Assemble a transmit frame from a data segment.
pub fn assemble(
    segment: &DataSegment,
    cfg: &FrameConfig,
    transforms: &Transforms,
) -> TransmitFrame {
    let body = transform_segment(segment, cfg, transforms);
    let prefix_len = cfg.prefix_len();

    let mut out = BytesMut::with_capacity(prefix_len + body.len());
    write_prefix(&mut out, cfg);
    out.put_slice(&body);

    TransmitFrame {
        bytes: out.freeze(),
        prefix_len,
    }
}

fn write_prefix(out: &mut BytesMut, cfg: &FrameConfig) {
    out.put_bytes(PREAMBLE_BYTE, cfg.preamble_bytes as usize);
    for _ in 0..cfg.sync_words {
        out.put_u8(cfg.sync_byte_high);
        out.put_u8(cfg.sync_byte_low);
    }
}
