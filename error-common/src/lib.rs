//! Common error handling for RustCare voice services
//!
//! Process-level failures (bad configuration, a port that cannot be bound,
//! a server that stops serving) are reported as [`RustCareError`]. Request
//! and conversation errors have their own types in the crates that raise
//! them and are converted at the binary boundary.
//!
//! # Example
//!
//! ```rust
//! use error_common::{RustCareError, Result};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     raw.parse()
//!         .map_err(|e| RustCareError::ConfigError(format!("invalid port {}: {}", raw, e)))
//! }
//!
//! assert!(parse_port("8080").is_ok());
//! assert!(parse_port("eighty").is_err());
//! ```

pub mod types;

pub use types::*;
