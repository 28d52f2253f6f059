//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Connection workers produce:
//!     → logging.rs (structured log events, one span per connection)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Connection ID flows through every event via the worker span
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
