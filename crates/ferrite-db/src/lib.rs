//! The database layer of ferrite.
//!
//! Everything here works over one pipeline: a fluent
//! [`QueryBuilder`](query::QueryBuilder) (or
//! [`SchemaBuilder`](schema::SchemaBuilder)) produces an immutable
//! [`Query`](query::Query), a [`SqlCompiler`](query::SqlCompiler)
//! renders it to parameterized SQL for one [`Dialect`](query::Dialect),
//! and a [`Driver`](driver::Driver) runs the result. Values travel
//! through the parameter channel only; statement text never embeds them.
//!
//! ```
//! use ferrite_db::query::{Comparison, QueryBuilder, SqlCompiler};
//!
//! let query = QueryBuilder::new("users")
//!     .filter("age", Comparison::GreaterOrEqual, 18)
//!     .sort_ascending("name")
//!     .limit(10, 0)
//!     .build();
//! let (sql, params) = SqlCompiler::generic().compile(&query).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT `users`.* FROM `users` WHERE `users`.`age` >= ? ORDER BY `users`.`name` ASC LIMIT 0,10"
//! );
//! assert_eq!(params.len(), 1);
//! ```

pub mod driver;
pub mod entity;
pub mod fields;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod value;

pub use driver::{Database, Driver, FromValue, Row};
pub use entity::{pivot_table, Entity};
pub use fields::{DataType, Field, ForeignKey, IdKind, ReferentialAction};
pub use pagination::{paginate, Page};
pub use query::{Query, QueryBuilder, SqlCompiler};
pub use schema::{SchemaBuilder, SchemaConfig};
pub use value::Value;
