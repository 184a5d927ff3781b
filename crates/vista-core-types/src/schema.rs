//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Request shape
pub const FIELD_ENDPOINT: &str = "endpoint";
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_PAGE: &str = "page";
pub const FIELD_PK: &str = "pk";

// Collection sizes
pub const FIELD_PREFETCH_LEN: &str = "prefetch_len";
pub const FIELD_RESULT_LEN: &str = "result_len";
pub const FIELD_TOTAL_COUNT: &str = "total_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
