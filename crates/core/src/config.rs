//! Frame configuration.
//!
//! A [`FrameConfig`] is fixed when an encoder is built and is never mutated
//! while encoding. The defaults match the stock OpenLST radio settings.

use crate::error::{ConfigError, Result};

/// Byte repeated to form the preamble.
pub const PREAMBLE_BYTE: u8 = 0xAA;

/// Upper bound on preamble + sync word bytes in front of every frame.
pub const MAX_PREFIX_BYTES: usize = 1024;

/// Per-instance framing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Number of 0xAA bytes to prepend
    pub preamble_bytes: u32,

    /// First byte of the sync word pair
    pub sync_byte_high: u8,

    /// Second byte of the sync word pair
    pub sync_byte_low: u8,

    /// Number of times the sync word pair is repeated
    pub sync_words: u32,

    /// Flags byte written into every frame
    pub flags: u8,

    /// Apply forward error correction to the data segment
    pub fec_enabled: bool,

    /// Apply whitening to the data segment
    pub whitening_enabled: bool,
}

impl FrameConfig {
    /// Configuration with neither whitening nor FEC.
    pub fn plain() -> Self {
        Self {
            fec_enabled: false,
            whitening_enabled: false,
            ..Self::default()
        }
    }

    pub fn with_preamble_bytes(mut self, preamble_bytes: u32) -> Self {
        self.preamble_bytes = preamble_bytes;
        self
    }

    pub fn with_sync_word(mut self, high: u8, low: u8) -> Self {
        self.sync_byte_high = high;
        self.sync_byte_low = low;
        self
    }

    pub fn with_sync_words(mut self, sync_words: u32) -> Self {
        self.sync_words = sync_words;
        self
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_fec(mut self, enabled: bool) -> Self {
        self.fec_enabled = enabled;
        self
    }

    pub fn with_whitening(mut self, enabled: bool) -> Self {
        self.whitening_enabled = enabled;
        self
    }

    /// Number of unencoded bytes placed in front of the data segment.
    ///
    /// Saturates instead of overflowing so oversized counts are caught by
    /// [`validate`](Self::validate).
    pub fn prefix_len(&self) -> usize {
        let preamble = self.preamble_bytes as usize;
        let sync = (self.sync_words as usize).saturating_mul(2);
        preamble.saturating_add(sync)
    }

    /// Check the configuration before it is used by an encoder.
    ///
    /// # Errors
    /// - `ConfigError::PrefixTooLong` if preamble + sync exceeds [`MAX_PREFIX_BYTES`]
    pub fn validate(&self) -> Result<()> {
        let size = self.prefix_len();
        if size > MAX_PREFIX_BYTES {
            return Err(ConfigError::PrefixTooLong {
                size,
                max: MAX_PREFIX_BYTES,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            preamble_bytes: 4,
            sync_byte_high: 0xD3,
            sync_byte_low: 0x91,
            sync_words: 2,
            flags: 0xC0,
            fec_enabled: true,
            whitening_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let cfg = FrameConfig::default();
        assert_eq!(cfg.preamble_bytes, 4);
        assert_eq!((cfg.sync_byte_high, cfg.sync_byte_low), (0xD3, 0x91));
        assert_eq!(cfg.sync_words, 2);
        assert_eq!(cfg.flags, 0xC0);
        assert!(cfg.fec_enabled);
        assert!(cfg.whitening_enabled);
        assert_eq!(cfg.prefix_len(), 8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_plain_disables_transforms() {
        let cfg = FrameConfig::plain();
        assert!(!cfg.fec_enabled);
        assert!(!cfg.whitening_enabled);
        assert_eq!(cfg.flags, 0xC0);
    }

    #[test]
    fn test_zero_counts_are_valid() {
        let cfg = FrameConfig::default()
            .with_preamble_bytes(0)
            .with_sync_words(0);
        assert_eq!(cfg.prefix_len(), 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_prefix_limit() {
        let at_limit = FrameConfig::default()
            .with_preamble_bytes(MAX_PREFIX_BYTES as u32 - 2)
            .with_sync_words(1);
        assert!(at_limit.validate().is_ok());

        let over = at_limit.with_preamble_bytes(MAX_PREFIX_BYTES as u32 - 1);
        assert!(matches!(
            over.validate(),
            Err(Error::InvalidConfig(ConfigError::PrefixTooLong { size, max }))
                if size == MAX_PREFIX_BYTES + 1 && max == MAX_PREFIX_BYTES
        ));
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let cfg = FrameConfig::default()
            .with_preamble_bytes(u32::MAX)
            .with_sync_words(u32::MAX);
        assert!(cfg.validate().is_err());
    }
}
