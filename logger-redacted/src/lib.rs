//! HIPAA-compliant logging for RustCare voice services
//!
//! Patient utterances routinely carry phone numbers, e-mail addresses and
//! medical record numbers. Anything user-supplied goes through
//! [`PiiRedactor`] before it reaches a log line.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: user@example.com → u***@e***
//! - **Phone Numbers**: (555) 123-4567 → (***) ***-****
//! - **SSN**: 123-45-6789 → ***-**-****
//! - **Credit Cards**: 4111-1111-1111-1111 → ****-****-****-****
//! - **IP Addresses**: 192.168.1.1 → 192.***.***.1
//! - **Medical Record Numbers**: MRN123456 → MRN[REDACTED]
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, LoggerConfig, PiiRedactor};
//!
//! init_logging(&LoggerConfig::default()).ok();
//!
//! let redactor = PiiRedactor::default();
//! tracing::info!(
//!     input = %redactor.redact("call me at (555) 123-4567"),
//!     "Voice input received"
//! );
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;
