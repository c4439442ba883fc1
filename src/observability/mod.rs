//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Submitters, poller, RPC client produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG / config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
