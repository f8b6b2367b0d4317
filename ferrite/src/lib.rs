//! ferrite: a query-representation and SQL-compilation core for building
//! ORMs.
//!
//! This facade re-exports the workspace crates under stable module names:
//!
//! - [`core`]: error taxonomy and logging setup
//! - [`db`]: values, fields, the query model, the compiler, schema
//!   building, drivers, and pagination
//!
//! The [`prelude`] pulls in the handful of types nearly every caller
//! touches.

pub use ferrite_core as core;
pub use ferrite_db as db;

/// The types most programs want in scope.
pub mod prelude {
    pub use ferrite_core::{OrmError, OrmResult};
    pub use ferrite_db::driver::{Database, Driver, Row};
    pub use ferrite_db::entity::Entity;
    pub use ferrite_db::fields::{DataType, Field, ForeignKey, IdKind};
    pub use ferrite_db::pagination::{paginate, Page};
    pub use ferrite_db::query::{
        Comparison, FilterGroup, Query, QueryBuilder, Relation, SqlCompiler,
    };
    pub use ferrite_db::schema::{SchemaBuilder, SchemaConfig};
    pub use ferrite_db::value::Value;
}
