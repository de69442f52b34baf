//! Tracing utilities, enabled by the `tracing` cargo feature.
//!
//! Call sites use these macros unconditionally; they no-op when the feature
//! is disabled so compilers that don't want the dependency don't pay for it.

/// Emits a debug-level event describing a compiled statement.
///
/// ```ignore
/// trace_compile!("get", &sql, params.len());
/// ```
#[macro_export]
macro_rules! trace_compile {
    ($query_type:expr, $sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(query_type = $query_type, sql = %$sql, params = $param_count, "compiled statement");
    };
}
