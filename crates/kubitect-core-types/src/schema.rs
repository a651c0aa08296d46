//! Canonical schema constants for structured logging and events

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Apply context
pub const FIELD_ACTION: &str = "action";
pub const FIELD_PATH: &str = "path";
pub const FIELD_APPLIED_DIGEST: &str = "applied_digest";
pub const FIELD_NEW_DIGEST: &str = "new_digest";

// Collection sizes
pub const FIELD_CHANGE_COUNT: &str = "change_count";
pub const FIELD_EVENT_COUNT: &str = "event_count";
pub const FIELD_BLOCK_COUNT: &str = "block_count";
pub const FIELD_WARN_COUNT: &str = "warn_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
