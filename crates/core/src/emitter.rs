//! Throttled emission.
//!
//! The host calls [`emit`] once per scheduling tick with the number of bytes
//! the downstream stage can accept. Each call drains at most one frame's
//! worth of bytes from the head of the [`TransmitQueue`], bounded by the
//! capacity. Unused capacity is not carried into the next frame.
//!
//! The host usually drives ticks with an input stream that carries no
//! payload. Whatever part of that input was not matched by output is
//! reported as [`Discard`] so it does not pile up upstream:
//!
//! - Idle queue: discard everything pending this tick
//! - Fewer bytes than capacity: discard the difference
//! - Full capacity used: discard nothing

use bytes::Bytes;

use crate::queue::TransmitQueue;

/// Upstream trigger input to drop after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Output filled the whole capacity
    None,
    /// Output fell short of capacity by this many bytes
    Excess(usize),
    /// Nothing to transmit; drop all pending input
    All,
}

impl Discard {
    /// Number of input items to consume given what is pending upstream.
    pub fn resolve(self, pending_input: usize) -> usize {
        match self {
            Discard::None => 0,
            Discard::Excess(n) => n.min(pending_input),
            Discard::All => pending_input,
        }
    }
}

/// Result of one emission step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    /// Bytes to hand downstream, `len() <= capacity`
    pub bytes: Bytes,
    pub discard: Discard,
    /// Capacity offered for this tick
    pub capacity: usize,
    /// True if the head frame finished during this tick
    pub frame_completed: bool,
}

impl Emission {
    /// Discarded input as a count, for hosts whose input matches capacity.
    pub fn consumed_input_hint(&self) -> usize {
        self.discard.resolve(self.capacity)
    }

    /// Copy the emitted bytes to the front of `out`, returning the count.
    ///
    /// `out` must be at least `len()` bytes, which holds when its length
    /// was the capacity of this step.
    pub fn copy_into(&self, out: &mut [u8]) -> usize {
        let n = self.len().min(out.len());
        out[..n].copy_from_slice(&self.bytes[..n]);
        n
    }

    pub fn is_idle(&self) -> bool {
        self.discard == Discard::All
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Run one emission step against the queue.
pub fn emit(queue: &mut TransmitQueue, capacity: usize) -> Emission {
    let Some(chunk) = queue.take(capacity) else {
        tracing::trace!(capacity, "transmit queue idle");
        return Emission {
            bytes: Bytes::new(),
            discard: Discard::All,
            capacity,
            frame_completed: false,
        };
    };

    let n = chunk.bytes.len();
    let discard = if capacity > n {
        Discard::Excess(capacity - n)
    } else {
        Discard::None
    };

    tracing::trace!(capacity, emitted = n, remaining = queue.pending_bytes(), "emit step");

    Emission {
        bytes: chunk.bytes,
        discard,
        capacity,
        frame_completed: chunk.frame_done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::TransmitFrame;
    use crate::queue::FrameState;

    fn queue_with(frames: &[&[u8]]) -> TransmitQueue {
        let mut queue = TransmitQueue::new();
        for bytes in frames {
            queue.enqueue(TransmitFrame::from_bytes(Bytes::copy_from_slice(bytes), 0));
        }
        queue
    }

    #[test]
    fn test_idle_discards_all() {
        let mut queue = TransmitQueue::new();
        for capacity in [0, 1, 4096] {
            let emission = emit(&mut queue, capacity);
            assert!(emission.is_empty());
            assert_eq!(emission.discard, Discard::All);
            assert_eq!(emission.consumed_input_hint(), capacity);
            assert!(emission.is_idle());
        }
    }

    #[test]
    fn test_partial_frame_example() {
        let mut queue = queue_with(&[&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]]);

        let emission = emit(&mut queue, 4);
        assert_eq!(emission.bytes.as_ref(), &[0, 1, 2, 3]);
        assert_eq!(emission.discard, Discard::None);
        assert!(!emission.frame_completed);
        assert_eq!(queue.cursor(), 4);
        assert_eq!(queue.head_state(), Some(FrameState::Draining));
    }

    #[test]
    fn test_short_frame_reports_excess() {
        let mut queue = queue_with(&[&[7, 7, 7]]);

        let emission = emit(&mut queue, 10);
        assert_eq!(emission.len(), 3);
        assert_eq!(emission.discard, Discard::Excess(7));
        assert_eq!(emission.consumed_input_hint(), 7);
        assert!(emission.frame_completed);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_capacity_not_carried_into_next_frame() {
        let mut queue = queue_with(&[&[1, 1], &[2, 2, 2]]);

        let first = emit(&mut queue, 100);
        assert_eq!(first.bytes.as_ref(), &[1, 1]);
        assert_eq!(first.discard, Discard::Excess(98));

        let second = emit(&mut queue, 100);
        assert_eq!(second.bytes.as_ref(), &[2, 2, 2]);
    }

    #[test]
    fn test_frame_carried_across_ticks() {
        let mut queue = queue_with(&[&[1, 2, 3, 4, 5], &[6, 7]]);
        let mut out = Vec::new();

        while !queue.is_empty() {
            let emission = emit(&mut queue, 2);
            assert!(emission.len() <= 2);
            out.extend_from_slice(&emission.bytes);
        }

        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_zero_capacity_with_pending_frame() {
        let mut queue = queue_with(&[&[1, 2]]);

        let emission = emit(&mut queue, 0);
        assert!(emission.is_empty());
        assert_eq!(emission.discard, Discard::None);
        assert_eq!(queue.peek_remaining(), 2);
    }

    #[test]
    fn test_copy_into_buffer() {
        let mut queue = queue_with(&[&[9, 8, 7]]);
        let mut out = [0u8; 8];

        let emission = emit(&mut queue, out.len());
        assert_eq!(emission.copy_into(&mut out), 3);
        assert_eq!(&out[..3], &[9, 8, 7]);
        assert_eq!(emission.discard, Discard::Excess(5));
    }

    #[test]
    fn test_discard_resolve() {
        assert_eq!(Discard::None.resolve(10), 0);
        assert_eq!(Discard::Excess(4).resolve(10), 4);
        assert_eq!(Discard::Excess(40).resolve(10), 10);
        assert_eq!(Discard::All.resolve(10), 10);
    }
}
