//! Resilience helpers for calls against the chain.
//!
//! Per-call deadlines live next to the calls themselves (`tokio::time::timeout`
//! in the blockchain adapters); this module holds the shared retry pacing.

pub mod backoff;

pub use backoff::calculate_backoff;
