//! The encoder and its two entry points.
//!
//! [`Encoder`] owns the configuration, transforms, transmit queue and
//! metrics for one radio link:
//!
//! - [`Encoder::push_packet`] is called when a raw packet arrives
//! - [`Encoder::emit`] is called on every scheduling tick
//!
//! Both run to completion without blocking or doing I/O. When the host calls
//! them from different threads, wrap the encoder in a [`SharedEncoder`] so a
//! single lock covers each call in full.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::assembler::{assemble, TransmitFrame};
use crate::config::FrameConfig;
use crate::emitter::{self, Discard, Emission};
use crate::error::Result;
use crate::framer::{self, RawPacket};
use crate::metrics::Metrics;
use crate::queue::TransmitQueue;
use crate::transform::Transforms;

/// Transmit-side encoder for one link.
#[derive(Debug)]
pub struct Encoder {
    config: FrameConfig,
    transforms: Transforms,
    queue: TransmitQueue,
    metrics: Metrics,
}

impl Encoder {
    /// Create an encoder with the default CC1110 transforms.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if the configuration fails validation.
    pub fn new(config: FrameConfig) -> Result<Self> {
        Self::with_transforms(config, Transforms::default())
    }

    /// Create an encoder with caller-supplied transforms.
    pub fn with_transforms(config: FrameConfig, transforms: Transforms) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            preamble_bytes = config.preamble_bytes,
            sync_words = config.sync_words,
            flags = config.flags,
            fec = config.fec_enabled,
            whitening = config.whitening_enabled,
            "encoder configured"
        );

        Ok(Self {
            config,
            transforms,
            queue: TransmitQueue::new(),
            metrics: Metrics::new(),
        })
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    /// Build the transmit frame for a raw packet without queueing it.
    pub fn frame(&self, raw: &[u8]) -> Result<TransmitFrame> {
        let packet = RawPacket::parse(raw)?;
        let segment = framer::encode(&packet, &self.config, self.transforms.checksum());
        Ok(assemble(&segment, &self.config, &self.transforms))
    }

    /// Frame a raw packet and append it to the transmit queue.
    ///
    /// Returns the length of the queued frame. A rejected packet leaves the
    /// queue untouched.
    ///
    /// # Errors
    /// `Error::InvalidPacket` if the packet is too short or too long.
    pub fn push_packet(&mut self, raw: &[u8]) -> Result<usize> {
        let frame = match self.frame(raw) {
            Ok(frame) => frame,
            Err(e) => {
                self.metrics.packets_rejected = self.metrics.packets_rejected.saturating_add(1);
                tracing::warn!(len = raw.len(), "rejected packet: {}", e);
                return Err(e);
            }
        };

        let len = frame.len();
        let m = &mut self.metrics;
        m.packets_encoded = m.packets_encoded.saturating_add(1);
        m.raw_bytes = m.raw_bytes.saturating_add(raw.len() as u64);
        m.segment_bytes = m
            .segment_bytes
            .saturating_add((raw.len() + framer::SEGMENT_OVERHEAD) as u64);
        m.frame_bytes = m.frame_bytes.saturating_add(len as u64);

        self.queue.enqueue(frame);

        tracing::debug!(
            raw_len = raw.len(),
            frame_len = len,
            queued = self.queue.len(),
            "packet queued"
        );

        Ok(len)
    }

    /// Run one emission step with `capacity` bytes of downstream room.
    pub fn emit(&mut self, capacity: usize) -> Emission {
        let emission = emitter::emit(&mut self.queue, capacity);
        self.record(&emission);
        emission
    }

    /// Run one emission step into a caller-owned buffer.
    pub fn emit_into(&mut self, out: &mut [u8]) -> (usize, Discard) {
        let emission = self.emit(out.len());
        (emission.copy_into(out), emission.discard)
    }

    pub fn queue(&self) -> &TransmitQueue {
        &self.queue
    }

    /// True when nothing is waiting to be emitted.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Bytes not yet emitted across all queued frames.
    pub fn pending_bytes(&self) -> usize {
        self.queue.pending_bytes()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut Metrics {
        &mut self.metrics
    }

    fn record(&mut self, emission: &Emission) {
        // Capacity is caller-controlled, so the totals saturate
        let m = &mut self.metrics;
        m.ticks = m.ticks.saturating_add(1);
        m.capacity_offered = m.capacity_offered.saturating_add(emission.capacity as u64);
        m.bytes_emitted = m.bytes_emitted.saturating_add(emission.len() as u64);
        m.input_discarded = m
            .input_discarded
            .saturating_add(emission.consumed_input_hint() as u64);

        if emission.is_idle() {
            m.idle_ticks = m.idle_ticks.saturating_add(1);
        }
        if emission.frame_completed {
            m.frames_completed = m.frames_completed.saturating_add(1);
            tracing::debug!(remaining_frames = self.queue.len(), "frame transmitted");
        }
    }
}

/// Cloneable, lock-guarded handle to an [`Encoder`].
///
/// Each method holds the lock for the whole call, so an emission step never
/// observes a half-queued frame.
#[derive(Debug, Clone)]
pub struct SharedEncoder {
    inner: Arc<Mutex<Encoder>>,
}

impl SharedEncoder {
    pub fn new(encoder: Encoder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(encoder)),
        }
    }

    pub fn push_packet(&self, raw: &[u8]) -> Result<usize> {
        self.lock().push_packet(raw)
    }

    pub fn emit(&self, capacity: usize) -> Emission {
        self.lock().emit(capacity)
    }

    pub fn emit_into(&self, out: &mut [u8]) -> (usize, Discard) {
        self.lock().emit_into(out)
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_idle()
    }

    /// Snapshot of the current metrics.
    pub fn metrics(&self) -> Metrics {
        self.lock().metrics().clone()
    }

    /// Run a closure with exclusive access to the encoder.
    pub fn with<R>(&self, f: impl FnOnce(&mut Encoder) -> R) -> R {
        f(&mut self.lock())
    }

    // Queue state is consistent between calls, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Encoder> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
