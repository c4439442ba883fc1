//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SubmitterConfig (validated, immutable)
//!     → Providers::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Key material never lives in the file, only the name of the env var

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ConfirmationConfig, ExecutionMode, ExtensionConfig, ObservabilityConfig, RpcConfig,
    SubmitterConfig, WalletConfig,
};
