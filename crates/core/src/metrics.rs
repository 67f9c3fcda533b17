//! Metrics collection and reporting for the encoder.
//!
//! This module provides observable insights into framer and emitter behavior:
//! - Packets encoded and rejected
//! - Byte expansion from preamble, whitening and FEC
//! - Emission ticks, idle ticks and channel utilization
//!
//! # Thread Safety
//!
//! `Metrics` is a plain struct updated by the [`Encoder`](crate::Encoder)
//! that owns it. Shared access goes through
//! [`SharedEncoder`](crate::SharedEncoder).

use std::time::{Duration, Instant};

/// Counters for one encoder instance.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the encoder was created
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Encoding ===
    /// Raw packets framed and queued
    pub packets_encoded: u64,

    /// Raw packets rejected at the boundary
    pub packets_rejected: u64,

    /// Total raw packet bytes accepted
    pub raw_bytes: u64,

    /// Total data segment bytes (before whitening and FEC)
    pub segment_bytes: u64,

    /// Total transmit frame bytes (preamble, sync and encoded segment)
    pub frame_bytes: u64,

    // === Emission ===
    /// Emit steps run
    pub ticks: u64,

    /// Emit steps that found the queue empty
    pub idle_ticks: u64,

    /// Capacity offered across all ticks
    pub capacity_offered: u64,

    /// Bytes handed downstream
    pub bytes_emitted: u64,

    /// Frames emitted to completion
    pub frames_completed: u64,

    /// Upstream trigger input reported as discarded
    pub input_discarded: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            packets_encoded: 0,
            packets_rejected: 0,
            raw_bytes: 0,
            segment_bytes: 0,
            frame_bytes: 0,
            ticks: 0,
            idle_ticks: 0,
            capacity_offered: 0,
            bytes_emitted: 0,
            frames_completed: 0,
            input_discarded: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Frame bytes produced per raw byte accepted.
    ///
    /// Returns 0.0 if nothing was encoded.
    pub fn expansion_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.frame_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Fraction of offered capacity that carried frame bytes.
    pub fn utilization(&self) -> f64 {
        if self.capacity_offered == 0 {
            0.0
        } else {
            self.bytes_emitted as f64 / self.capacity_offered as f64
        }
    }

    /// Packets rejected per packet offered.
    pub fn rejection_rate(&self) -> f64 {
        let offered = self.packets_encoded + self.packets_rejected;
        if offered == 0 {
            0.0
        } else {
            self.packets_rejected as f64 / offered as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let duration_ms = self.duration().as_millis();

        println!("\n=== Encoder Summary ===");
        println!("Duration: {} ms", duration_ms);
        println!();

        println!("=== Framing ===");
        println!("Packets encoded: {}", self.packets_encoded);
        println!(
            "Packets rejected: {} ({:.2}%)",
            self.packets_rejected,
            self.rejection_rate() * 100.0
        );
        println!("Raw bytes: {}", self.raw_bytes);
        println!("Segment bytes: {}", self.segment_bytes);
        println!("Frame bytes: {}", self.frame_bytes);
        println!("Expansion: {:.2}x", self.expansion_ratio());
        println!();

        println!("=== Emission ===");
        println!("Ticks: {} ({} idle)", self.ticks, self.idle_ticks);
        println!("Bytes emitted: {}", self.bytes_emitted);
        println!("Frames completed: {}", self.frames_completed);
        println!("Input discarded: {}", self.input_discarded);
        println!("Utilization: {:.1}%", self.utilization() * 100.0);
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.bytes_emitted == self.frame_bytes {
            println!("✓ All frames transmitted");
            println!(
                "  {} frames, {} bytes in {} ticks",
                self.frames_completed, self.bytes_emitted, self.ticks
            );
        } else {
            println!(
                "✗ Transmission incomplete: {} of {} bytes emitted",
                self.bytes_emitted, self.frame_bytes
            );
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             packets_encoded={}\n\
             packets_rejected={}\n\
             raw_bytes={}\n\
             segment_bytes={}\n\
             frame_bytes={}\n\
             expansion_ratio={:.4}\n\
             ticks={}\n\
             idle_ticks={}\n\
             bytes_emitted={}\n\
             frames_completed={}\n\
             input_discarded={}\n\
             utilization={:.4}\n",
            self.duration().as_millis(),
            self.packets_encoded,
            self.packets_rejected,
            self.raw_bytes,
            self.segment_bytes,
            self.frame_bytes,
            self.expansion_ratio(),
            self.ticks,
            self.idle_ticks,
            self.bytes_emitted,
            self.frames_completed,
            self.input_discarded,
            self.utilization(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100);
    }

    #[test]
    fn test_expansion_ratio() {
        let mut metrics = Metrics::new();
        assert_eq!(metrics.expansion_ratio(), 0.0);

        metrics.raw_bytes = 100;
        metrics.frame_bytes = 250;
        assert_eq!(metrics.expansion_ratio(), 2.5);
    }

    #[test]
    fn test_utilization() {
        let mut metrics = Metrics::new();
        metrics.capacity_offered = 200;
        metrics.bytes_emitted = 50;
        assert_eq!(metrics.utilization(), 0.25);
    }

    #[test]
    fn test_rejection_rate() {
        let mut metrics = Metrics::new();
        metrics.packets_encoded = 3;
        metrics.packets_rejected = 1;
        assert_eq!(metrics.rejection_rate(), 0.25);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut metrics = Metrics::new();
        metrics.complete();
        let first = metrics.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(metrics.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.packets_encoded = 4;
        metrics.bytes_emitted = 128;
        metrics.idle_ticks = 2;

        let text = metrics.export_text();
        assert!(text.contains("packets_encoded=4"));
        assert!(text.contains("bytes_emitted=128"));
        assert!(text.contains("idle_ticks=2"));
    }
}
