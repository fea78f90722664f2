//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → routes registered once; router shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routes are registered exactly once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::{AdminConfig, ListenerConfig, ObservabilityConfig, RouteConfig, RouterConfig, TimeoutConfig};
