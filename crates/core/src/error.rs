//! Error types for the OpenLST framer.
//!
//! Errors only exist at the two boundaries of the encoder:
//! - Construction: the frame configuration is rejected before any encoder exists
//! - Encoding: a raw packet is rejected before anything enters the queue
//!
//! Emission never fails. It only reads frames that were fully built and
//! validated on the way in.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Config: configuration rejected at construction (fatal)
/// - Packet: raw packet rejected at encode time (recoverable)
/// - I/O: file system operations in drivers built on the core
#[derive(Debug, Error)]
pub enum Error {
    /// Frame configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Raw packet cannot be framed
    #[error("invalid packet: {0}")]
    InvalidPacket(#[from] PacketError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Driver-level configuration error (e.g. unparseable argument)
    #[error("configuration error: {0}")]
    Config(String),
}

/// Frame configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Preamble plus sync words would exceed the prefix limit
    #[error("preamble and sync words need {size} bytes, limit is {max}")]
    PrefixTooLong { size: usize, max: usize },
}

/// Raw packet errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    /// Packet is too short to contain the HWID
    #[error("packet too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Length byte of the resulting frame would overflow
    #[error("packet too long: at most {max} bytes fit the length byte, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
