//! # PROMPT Core
//!
//! Core types shared by every crate of the PROMPT phase SDK:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use prompt_core::errors::AppError;
//!
//! let error = AppError::unauthorized(anyhow::anyhow!("could not authenticate"));
//! ```

pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
