//! openlst-framer-core: transmit-side framing for the OpenLST radio link
//!
//! This library turns raw command/telemetry packets into the exact byte
//! stream an OpenLST radio expects on air, and paces that stream so a slow
//! downstream interface never has to buffer more than it asked for.
//!
//! # Architecture
//!
//! The pipeline is split along clear module boundaries:
//! - `transform`: checksum, whitening and FEC strategies (CC1110 defaults)
//! - `framer`: raw packet to data segment (HWID relocation, length, checksum)
//! - `assembler`: whitening, FEC and the preamble/sync prefix
//! - `queue`: FIFO of built frames with a cursor into the head frame
//! - `emitter`: capacity-bounded emission step
//! - `encoder`: the two entry points, `push_packet` and `emit`
//! - `metrics`: observable encoder behavior
//!
//! # Design Principles
//!
//! - **No panics**: bad input is rejected with structured errors
//! - **All-or-nothing framing**: a rejected packet never reaches the queue
//! - **Bounded steps**: one emission step never exceeds the offered capacity
//! - **Injectable transforms**: every byte transform can be swapped out

pub mod assembler;
pub mod config;
pub mod emitter;
pub mod encoder;
pub mod error;
pub mod framer;
pub mod metrics;
pub mod queue;
pub mod transform;

// Re-export commonly used types
pub use assembler::TransmitFrame;
pub use config::FrameConfig;
pub use emitter::{Discard, Emission};
pub use encoder::{Encoder, SharedEncoder};
pub use error::{Error, Result};
pub use framer::{DataSegment, RawPacket};
pub use metrics::Metrics;
pub use queue::{FrameState, TransmitQueue};
pub use transform::Transforms;
