//! The query layer: expression trees, the fluent builder, and the
//! compiler that turns both into dialect-specific SQL.

pub mod builder;
pub mod compiler;
pub mod filter;

pub use builder::QueryBuilder;
pub use compiler::{
    Action, Dialect, GenericDialect, Join, Limit, PostgresDialect, Query, Sort, SortDirection,
    SqlCompiler, SqliteDialect,
};
pub use filter::{
    Comparison, FieldRef, FilterGroup, FilterItem, FilterValue, QueryFilter, Relation,
};
