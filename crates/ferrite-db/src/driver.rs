//! The execution seam between compiled queries and a concrete database.
//!
//! [`Driver`] is the single async trait a backend implements; it receives
//! finished statement text plus the ordered parameter list and knows
//! nothing about the query model. [`Database`] is the handle the rest of
//! the crate passes around: it binds a driver to a dialect, compiles each
//! [`Query`] on the way through, and fails unbound access with
//! [`OrmError::NoDatabase`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use ferrite_core::{OrmError, OrmResult};
use tracing::debug;

use crate::query::compiler::{Dialect, GenericDialect, Query, SqlCompiler};
use crate::value::Value;

/// One result row: ordered columns, addressable by position or by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Sets a column value. An existing column of the same name is
    /// replaced in place, keeping its position.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        if let Some(slot) = self.columns.iter_mut().find(|(name, _)| *name == column) {
            slot.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }

    /// Returns the raw value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the raw value at a position, if present.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.columns.get(index).map(|(_, value)| value)
    }

    /// Returns a column converted to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::MissingIdentifier`] when the column is absent;
    /// conversion failures surface as [`OrmError::Driver`].
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::MissingIdentifier(column.to_string()))?;
        convert(column, value)
    }

    /// Returns the column at a position converted to `T`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Row::try_get`], with the position standing in
    /// for the name.
    pub fn try_get_index<T: FromValue>(&self, index: usize) -> OrmResult<T> {
        let value = self
            .get_index(index)
            .ok_or_else(|| OrmError::MissingIdentifier(format!("column #{index}")))?;
        convert(&format!("column #{index}"), value)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates the columns in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

fn convert<T: FromValue>(label: &str, value: &Value) -> OrmResult<T> {
    T::from_value(value).ok_or_else(|| {
        OrmError::driver(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{label} holds {value:?}, incompatible type requested"),
        ))
    })
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

/// Conversion out of a [`Value`] into a concrete Rust type.
pub trait FromValue: Sized {
    /// Attempts the conversion, returning `None` on a type mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Date(date) => Some(*date),
            Value::Timestamp(ts) => Some(ts.date()),
            _ => None,
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uuid(id) => Some(*id),
            Value::String(s) => uuid::Uuid::parse_str(s).ok(),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

/// A database backend: runs finished statements against a real store.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Runs a statement that returns rows.
    async fn fetch(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>>;

    /// Runs a statement for its side effect, returning the affected row
    /// count.
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64>;
}

/// A shared dialect, usable wherever a concrete one is.
pub type SharedDialect = Arc<dyn Dialect + Send + Sync>;

impl Dialect for SharedDialect {
    fn quote(&self, ident: &str) -> String {
        (**self).quote(ident)
    }

    fn placeholder(&self, index: usize) -> String {
        (**self).placeholder(index)
    }

    fn limit_clause(&self, limit: crate::query::compiler::Limit) -> String {
        (**self).limit_clause(limit)
    }

    fn column_type(&self, data_type: &crate::fields::DataType) -> String {
        (**self).column_type(data_type)
    }
}

/// A handle binding an optional [`Driver`] to a [`Dialect`].
///
/// Queries pass through the compiler on their way to the driver, so
/// callers only ever hand over [`Query`] values. A handle with no bound
/// driver still constructs and compiles; only execution fails.
#[derive(Clone)]
pub struct Database {
    driver: Option<Arc<dyn Driver>>,
    compiler: Arc<SqlCompiler<SharedDialect>>,
}

impl Database {
    /// Binds a driver with the given dialect.
    pub fn new(driver: Arc<dyn Driver>, dialect: impl Dialect + Send + Sync + 'static) -> Self {
        Self {
            driver: Some(driver),
            compiler: Arc::new(SqlCompiler::new(Arc::new(dialect))),
        }
    }

    /// Creates a handle with no bound driver and the generic dialect.
    /// Execution against it fails with [`OrmError::NoDatabase`].
    pub fn unbound() -> Self {
        Self {
            driver: None,
            compiler: Arc::new(SqlCompiler::new(
                Arc::new(GenericDialect) as SharedDialect
            )),
        }
    }

    fn driver(&self) -> OrmResult<&Arc<dyn Driver>> {
        self.driver.as_ref().ok_or(OrmError::NoDatabase)
    }

    /// Compiles a query without running it.
    pub fn compile(&self, query: &Query) -> OrmResult<(String, Vec<Value>)> {
        self.compiler.compile(query)
    }

    /// Compiles and fetches the rows a query selects.
    pub async fn fetch(&self, query: &Query) -> OrmResult<Vec<Row>> {
        let driver = self.driver()?;
        let (sql, params) = self.compiler.compile(query)?;
        debug!(table = %query.table, %sql, params = params.len(), "fetching rows");
        driver.fetch(&sql, &params).await
    }

    /// Compiles and fetches at most one row.
    pub async fn fetch_one(&self, query: &Query) -> OrmResult<Option<Row>> {
        let mut rows = self.fetch(query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// Runs a count query and reads the single count column.
    pub async fn count(&self, query: &Query) -> OrmResult<u64> {
        let rows = self.fetch(query).await?;
        let Some(row) = rows.first() else {
            return Ok(0);
        };
        let count = row
            .try_get::<i64>("COUNT(*)")
            .or_else(|_| row.try_get_index::<i64>(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Compiles and executes a side-effecting query.
    pub async fn execute(&self, query: &Query) -> OrmResult<u64> {
        let driver = self.driver()?;
        let (sql, params) = self.compiler.compile(query)?;
        debug!(table = %query.table, %sql, params = params.len(), "executing statement");
        driver.execute(&sql, &params).await
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("bound", &self.driver.is_some())
            .finish_non_exhaustive()
    }
}
