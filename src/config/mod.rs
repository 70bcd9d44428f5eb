//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → snapshot.rs ConfigHandle (Arc swapped on every change)
//!
//! On change:
//!     copy current snapshot → mutate the copy → validate
//!     → atomic swap of Arc<ClientConfig>
//!     → in-flight requests finish on the snapshot they started with
//! ```
//!
//! # Design Decisions
//! - Config is immutable once published; changes publish a new snapshot
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod snapshot;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ClientConfig, Credentials, ObservabilityConfig, RetryConfig, SelectionPolicy, TimeoutConfig, TransportConfig,
    VerificationConfig,
};
pub use snapshot::ConfigHandle;
pub use validation::{validate_config, ValidationError};
