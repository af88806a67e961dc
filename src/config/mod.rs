//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → RequestFactory (defaults applied to every new Request)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_str, ConfigError};
pub use schema::ClientConfig;
pub use schema::CookieConfig;
pub use schema::HeaderEntry;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::QueryConfig;
pub use schema::RequestConfig;
