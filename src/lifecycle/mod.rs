//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → confirmation waits observe it and stop polling
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
