//! Observability and Metrics
//!
//! Process-wide counters for codec activity. Each `encode`/`decode` call
//! records its outcome here; the counters never influence codec behaviour.
//!
//! Uses atomic counters so values can be encoded on several threads at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Successful encode calls
    pub encodes_total: AtomicU64,
    /// Failed encode calls
    pub encode_errors: AtomicU64,
    /// Successful decode calls
    pub decodes_total: AtomicU64,
    /// Failed decode calls
    pub decode_errors: AtomicU64,
    /// Bytes produced by the encoder
    pub bytes_encoded: AtomicU64,
    /// Bytes consumed by the decoder
    pub bytes_decoded: AtomicU64,
    /// Values written as references instead of in full
    pub reference_hits: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl CodecMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            encodes_total: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            decodes_total: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            reference_hits: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful encode
    pub fn encode_success(&self, byte_count: u64, reference_hits: u64) {
        self.encodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
        self.reference_hits
            .fetch_add(reference_hits, Ordering::Relaxed);
    }

    /// Record a failed encode
    pub fn encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful decode
    pub fn decode_success(&self, byte_count: u64) {
        self.decodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a failed decode
    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            encodes_total: self.encodes_total.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            decodes_total: self.decodes_total.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            reference_hits: self.reference_hits.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            encodes_total = snapshot.encodes_total,
            encode_errors = snapshot.encode_errors,
            decodes_total = snapshot.decodes_total,
            decode_errors = snapshot.decode_errors,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            reference_hits = snapshot.reference_hits,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub encodes_total: u64,
    pub encode_errors: u64,
    pub decodes_total: u64,
    pub decode_errors: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub reference_hits: u64,
    pub uptime_seconds: u64,
}

static METRICS: once_cell::sync::Lazy<CodecMetrics> = once_cell::sync::Lazy::new(CodecMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static CodecMetrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
