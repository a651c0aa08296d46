//! Core types shared across kubitect facilities
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys and event names used by
//!   the logging macros and the error facility

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
