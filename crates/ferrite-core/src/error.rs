//! Core error types for the ferrite ORM.
//!
//! Every failure the query core can produce is an explicit precondition
//! check: an out-of-range page number, a filter shape the compiler refuses
//! to render, a missing identifier, or an operation attempted without a
//! bound database. Failures reported by an external driver pass through
//! [`OrmError::Driver`] unchanged; the core never interprets or retries
//! them.

use thiserror::Error;

/// The primary error type for the ferrite ORM core.
///
/// The compiler itself is a total function over well-formed input: all
/// variants here are raised before any statement text is emitted, or wrap
/// an error reported by the external driver after execution.
#[derive(Error, Debug)]
pub enum OrmError {
    /// A pagination request with a page number below 1.
    #[error("invalid page number: {0} (pages are numbered from 1)")]
    InvalidPageNumber(u64),

    /// An operation was attempted with no bound database connection.
    #[error("no database connection is bound")]
    NoDatabase,

    /// A required identifier (usually a primary key) was absent.
    #[error("missing identifier: {0}")]
    MissingIdentifier(String),

    /// A preparation (migration) step was run a second time.
    #[error("preparation already applied: {0}")]
    AlreadyPrepared(String),

    /// A filter combined a value and comparison the compiler cannot render,
    /// e.g. a none value with anything but equals/not-equals.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// An update was compiled with nothing to write.
    #[error("empty write payload for table: {0}")]
    EmptyPayload(String),

    /// An opaque error reported by the external driver. Never interpreted
    /// or retried by the core; retry policy belongs to the driver layer.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl OrmError {
    /// Wraps an arbitrary driver-reported error.
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver(Box::new(err))
    }
}

/// A convenience type alias for `Result<T, OrmError>`.
pub type OrmResult<T> = Result<T, OrmError>;
