//! Structured logging facility for Pallada
//!
//! - Single initialization point via `init(profile)` / `init_with_filter`
//! - Structured macros (`log_op_start!`, `log_op_end!`, `log_op_error!`,
//!   `log_op_skip!`) carrying canonical `component`/`op`/`event` fields
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use pallada_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_filter, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
