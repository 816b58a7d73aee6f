//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with a default filter level of `info` and
/// millisecond timestamps, so batch edits and imports can be timed
/// from the log alone. Override the filter with RUST_LOG.
///
/// # Example
/// ```
/// hexvox::core::logging::init();
/// log::info!("tile editor core ready");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();
}
