//! Logging integration for the ferrite ORM.
//!
//! Provides a helper for configuring [`tracing`]-based logging and for
//! creating per-query spans so that compilation and execution logs can be
//! correlated.

/// Sets up the global tracing subscriber.
///
/// `level` is an env-filter directive (e.g. "debug", "info",
/// "ferrite_db=debug"). When `pretty` is true a human-readable format is
/// used; otherwise a structured JSON format suited to production log
/// pipelines.
///
/// Installing a second subscriber is a no-op.
pub fn setup_logging(level: &str, pretty: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if pretty {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one query, tagged with its table and action.
///
/// # Examples
///
/// ```
/// use ferrite_core::logging::query_span;
///
/// let span = query_span("users", "select");
/// let _guard = span.enter();
/// tracing::debug!("compiling");
/// ```
pub fn query_span(table: &str, action: &str) -> tracing::Span {
    tracing::debug_span!("query", table, action)
}
