//! # ferrite-core
//!
//! Foundation types for the ferrite ORM core: the error taxonomy shared by
//! every other crate and the tracing-based logging setup. This crate has no
//! knowledge of queries or SQL and no dependency on the rest of the
//! workspace.
//!
//! ## Modules
//!
//! - [`error`] - The [`OrmError`](error::OrmError) taxonomy and result alias
//! - [`logging`] - Tracing subscriber setup and query spans

pub mod error;
pub mod logging;

// Re-export the most commonly used types at the crate root.
pub use error::{OrmError, OrmResult};
