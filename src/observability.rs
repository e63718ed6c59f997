//! Structured diagnostics for the materializer.
//!
//! The `log_metric!` macro emits one JSON-ish line of key/value pairs through the
//! `log` facade under the `parquet_rows::metric` target. It is compiled out of
//! release builds entirely.

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use parquet_rows::log_metric;
/// let rows = 4;
/// log_metric!("event"="segment_opened", "segment"=&0, "rows"=&rows);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::__log::debug!(target: "parquet_rows::metric", "ROWS_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
