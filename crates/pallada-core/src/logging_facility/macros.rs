//! Canonical logging macros
//!
//! Every macro stamps `component = module_path!()` plus the operation name
//! and one of the canonical event names from `pallada_core_types::schema`.

/// Log the start of an operation
///
/// ```
/// # use pallada_core::log_op_start;
/// log_op_start!("resolve");
/// log_op_start!("resolve", query = "ив21");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use pallada_core::log_op_end;
/// log_op_end!("diff", duration_ms = 3, change_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error. `$err` is anything convertible into `ExError`.
///
/// ```
/// # use pallada_core::{log_op_error, errors::TimetableError};
/// let err = TimetableError::MalformedSource { reason: "no title".to_string() };
/// log_op_error!("build_schedule", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}

/// Log a recoverable condition that made an operation skip work
/// (corrupt snapshot, catalog page that failed to load).
///
/// ```
/// # use pallada_core::log_op_skip;
/// log_op_skip!("crawl_catalog", "page failed to parse", url = "https://example.org");
/// ```
#[macro_export]
macro_rules! log_op_skip {
    ($op:expr, $reason:expr) => {
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_SKIP,
            reason = %$reason,
        );
    };
    ($op:expr, $reason:expr, $($field:tt)*) => {
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_SKIP,
            reason = %$reason,
            $($field)*
        );
    };
}
