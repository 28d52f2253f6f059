//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ChatConfig (validated, immutable)
//!     → port overridden from the command line
//!     → shared via Arc with every connection worker
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ChatConfig;
pub use schema::LimitsConfig;
pub use schema::ListenerConfig;
pub use schema::TimeoutConfig;
