//! # Utility Modules
//!
//! Supporting utilities shared by the codec.
//!
//! ## Components
//! - **Metrics**: thread-safe counters for encode/decode activity and
//!   an operation timer that reports durations through `tracing`

pub mod metrics;

pub use metrics::{global_metrics, CodecMetrics, MetricsSnapshot};
