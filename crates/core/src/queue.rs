//! Transmit queue.
//!
//! Frames are appended at the tail as packets are encoded and drained from
//! the head by the [`emitter`](crate::emitter). A byte cursor records how
//! much of the head frame has already been handed out.
//!
//! # Invariants
//!
//! - The cursor is strictly inside the head frame, or 0 when the queue is empty
//! - Frames leave in the order they arrived, each one completely before the next
//! - A frame is dropped as soon as its last byte is taken
//!
//! # Growth
//!
//! The queue is unbounded. Encoding is much rarer than drain ticks, so
//! frames are never dropped or refused once built.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::assembler::TransmitFrame;

/// Where a frame is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Queued, no bytes emitted yet
    Pending,
    /// At the head with some bytes emitted
    Draining,
    /// Every byte emitted, frame removed from the queue
    Done,
}

/// Bytes handed out by one [`TransmitQueue::take`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub bytes: Bytes,
    /// True if these were the last bytes of the head frame
    pub frame_done: bool,
}

/// FIFO of transmit frames with a cursor into the head frame.
#[derive(Debug, Default)]
pub struct TransmitQueue {
    frames: VecDeque<TransmitFrame>,
    cursor: usize,
}

impl TransmitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame at the tail.
    ///
    /// Empty frames carry nothing to transmit and are not queued.
    pub fn enqueue(&mut self, frame: TransmitFrame) {
        if frame.is_empty() {
            return;
        }
        self.frames.push_back(frame);
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames waiting, including a partially emitted head.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Bytes of the head frame not yet emitted, or 0 if empty.
    pub fn peek_remaining(&self) -> usize {
        self.frames
            .front()
            .map_or(0, |head| head.len() - self.cursor)
    }

    /// Bytes not yet emitted across every queued frame.
    pub fn pending_bytes(&self) -> usize {
        let queued: usize = self.frames.iter().map(TransmitFrame::len).sum();
        queued - self.cursor
    }

    /// Offset into the head frame.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Lifecycle state of the head frame, if any.
    pub fn head_state(&self) -> Option<FrameState> {
        self.frames.front().map(|_| {
            if self.cursor == 0 {
                FrameState::Pending
            } else {
                FrameState::Draining
            }
        })
    }

    /// Take up to `max` bytes from the head frame.
    ///
    /// Never crosses into the next frame. Returns `None` if the queue is empty.
    pub fn take(&mut self, max: usize) -> Option<Chunk> {
        let head = self.frames.front()?;

        let n = max.min(head.len() - self.cursor);
        let bytes = head.bytes().slice(self.cursor..self.cursor + n);
        self.cursor += n;

        let frame_done = self.cursor == head.len();
        if frame_done {
            self.frames.pop_front();
            self.cursor = 0;
        }

        Some(Chunk { bytes, frame_done })
    }
}
