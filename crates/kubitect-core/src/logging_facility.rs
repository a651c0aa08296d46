//! Structured logging for kubitect.
//!
//! One initialization point ([`init`]), operation boundary macros
//! (`log_op_start!`, `log_op_end!`, `log_op_error!`) emitting the field
//! names from [`kubitect_core_types::schema`], and an in-memory capture
//! layer for asserting on log output in tests.
//!
//! ```rust
//! use kubitect_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
