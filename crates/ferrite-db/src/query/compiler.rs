//! Query model and SQL compiler.
//!
//! This module defines the immutable [`Query`] model that represents one
//! query intent, and the [`SqlCompiler`] that translates it into a
//! statement string plus an ordered parameter list. Raw values never appear
//! in the statement text; they flow exclusively through the parameter
//! channel, so injection is impossible by construction.
//!
//! Compilation is a pure function: the same `Query` always produces
//! byte-identical text and the same value sequence. Every placeholder's
//! value is appended in the exact left-to-right, depth-first order the
//! placeholder is emitted, which callers rely on to zip placeholders to
//! values positionally.

use crate::fields::{DataType, Field, ForeignKey, IdKind};
use crate::query::filter::{Comparison, FieldRef, FilterItem, FilterValue, QueryFilter, Relation};
use crate::value::Value;
use ferrite_core::{OrmError, OrmResult};

/// A sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortDirection {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    pub const fn sql_keyword(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sort {
    /// The column to sort by. A bare name qualifies with the query's
    /// table at compile time; a `"table.column"` name keeps its own
    /// qualifier.
    pub field: String,
    /// The direction.
    pub direction: SortDirection,
}

impl Sort {
    /// Creates an ascending sort.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A row-window bound: how many rows, starting where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Limit {
    /// Maximum number of rows to return.
    pub count: usize,
    /// Number of rows to skip.
    pub offset: usize,
}

impl Limit {
    /// Creates a limit with the given count and offset.
    pub const fn new(count: usize, offset: usize) -> Self {
        Self { count, offset }
    }
}

/// A JOIN descriptor. Both key columns are always table-qualified in the
/// rendered output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Join {
    /// The table already present in the query.
    pub base_table: String,
    /// The join key on the base table.
    pub base_key: String,
    /// The table being joined.
    pub joined_table: String,
    /// The join key on the joined table.
    pub joined_key: String,
}

impl Join {
    /// Creates a join descriptor.
    pub fn new(
        base_table: impl Into<String>,
        base_key: impl Into<String>,
        joined_table: impl Into<String>,
        joined_key: impl Into<String>,
    ) -> Self {
        Self {
            base_table: base_table.into(),
            base_key: base_key.into(),
            joined_table: joined_table.into(),
            joined_key: joined_key.into(),
        }
    }
}

/// The action variant of a query.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    /// Fetch matching rows.
    Select,
    /// Fetch the count of matching rows.
    Count,
    /// Insert the write payload as one row.
    Insert,
    /// Update matching rows from the write payload.
    Update,
    /// Delete matching rows.
    Delete,
    /// Create a table from column and constraint descriptors.
    SchemaCreate {
        /// Column definitions, in declared order.
        fields: Vec<Field>,
        /// Foreign-key constraints, in declared order.
        foreign_keys: Vec<ForeignKey>,
    },
    /// Add and drop columns on an existing table in one statement.
    SchemaAlter {
        /// Columns to add, in declared order.
        add_fields: Vec<Field>,
        /// Column names to drop, in declared order.
        drop_fields: Vec<String>,
    },
    /// Drop the table if it exists.
    SchemaDrop,
}

/// An immutable snapshot of one query intent.
///
/// Produced by consuming a
/// [`QueryBuilder`](crate::query::builder::QueryBuilder) or a
/// [`SchemaBuilder`](crate::schema::SchemaBuilder); consumed by
/// [`SqlCompiler::compile`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Query {
    /// The target table.
    pub table: String,
    /// The action variant.
    pub action: Action,
    /// Top-level filters, combined with AND.
    pub filters: Vec<FilterItem>,
    /// JOIN clauses, in declared order.
    pub joins: Vec<Join>,
    /// ORDER BY entries, in declared order.
    pub sorts: Vec<Sort>,
    /// The active row window, if any.
    pub limit: Option<Limit>,
    /// The ordered write payload for insert/update.
    pub data: Vec<(String, Value)>,
}

impl Query {
    /// Creates an empty SELECT query for the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            action: Action::Select,
            filters: Vec::new(),
            joins: Vec::new(),
            sorts: Vec::new(),
            limit: None,
            data: Vec::new(),
        }
    }
}

// ── Dialects ───────────────────────────────────────────────────────────

/// The dialect-variable rendering hooks.
///
/// The default method bodies implement the generic rendering: backtick
/// identifier quoting, `?` placeholders, `LIMIT <offset>,<count>`, and the
/// canonical column-type mapping. Dialects override only the points where
/// they differ.
pub trait Dialect {
    /// Wraps an identifier in the dialect quote character.
    fn quote(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    /// Returns the parameter placeholder for the given 1-based index.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// Renders a LIMIT clause.
    fn limit_clause(&self, limit: Limit) -> String {
        format!("LIMIT {},{}", limit.offset, limit.count)
    }

    /// Maps a canonical data type to this dialect's column type.
    fn column_type(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Id(IdKind::Int) | DataType::Int => "INTEGER".to_string(),
            DataType::Id(IdKind::Uuid) => "UUID".to_string(),
            DataType::Id(IdKind::Custom(s)) | DataType::Custom(s) => s.clone(),
            DataType::String(None) => "STRING".to_string(),
            DataType::String(Some(len)) => format!("VARCHAR({len})"),
            DataType::Double => "DOUBLE".to_string(),
            DataType::Bool => "BOOL".to_string(),
            DataType::Bytes => "BLOB".to_string(),
            DataType::Date => "TIMESTAMP".to_string(),
        }
    }
}

/// The generic dialect: all default hooks, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {}

/// SQLite: `LIMIT <count> OFFSET <offset>` and storage-class column types.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn limit_clause(&self, limit: Limit) -> String {
        format!("LIMIT {} OFFSET {}", limit.count, limit.offset)
    }

    fn column_type(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Id(IdKind::Int) | DataType::Int | DataType::Bool => "INTEGER".to_string(),
            DataType::Id(IdKind::Uuid)
            | DataType::String(_)
            | DataType::Date => "TEXT".to_string(),
            DataType::Id(IdKind::Custom(s)) | DataType::Custom(s) => s.clone(),
            DataType::Double => "REAL".to_string(),
            DataType::Bytes => "BLOB".to_string(),
        }
    }
}

/// PostgreSQL: `"` quoting, `$n` placeholders, `LIMIT .. OFFSET ..`, and
/// native column types.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn quote(&self, ident: &str) -> String {
        format!("\"{ident}\"")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn limit_clause(&self, limit: Limit) -> String {
        format!("LIMIT {} OFFSET {}", limit.count, limit.offset)
    }

    fn column_type(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Id(IdKind::Int) => "SERIAL".to_string(),
            DataType::Id(IdKind::Uuid) => "UUID".to_string(),
            DataType::Id(IdKind::Custom(s)) | DataType::Custom(s) => s.clone(),
            DataType::Int => "INTEGER".to_string(),
            DataType::String(None) => "TEXT".to_string(),
            DataType::String(Some(len)) => format!("VARCHAR({len})"),
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Bool => "BOOLEAN".to_string(),
            DataType::Bytes => "BYTEA".to_string(),
            DataType::Date => "TIMESTAMP".to_string(),
        }
    }
}

// ── Compiler ───────────────────────────────────────────────────────────

/// Translates a [`Query`] into `(statement text, ordered values)`.
pub struct SqlCompiler<D: Dialect> {
    dialect: D,
}

impl SqlCompiler<GenericDialect> {
    /// Creates a compiler using the generic dialect.
    pub const fn generic() -> Self {
        Self {
            dialect: GenericDialect,
        }
    }
}

impl<D: Dialect> SqlCompiler<D> {
    /// Creates a compiler for the given dialect.
    pub const fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Compiles a query into statement text and its ordered value list.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidFilter`] when a filter pairs a none
    /// value with anything but equals/not-equals, and
    /// [`OrmError::EmptyPayload`] for an update with nothing to write.
    /// No statement text is produced on error.
    pub fn compile(&self, query: &Query) -> OrmResult<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let sql = match &query.action {
            Action::Select => self.render_select(query, false, &mut params)?,
            Action::Count => self.render_select(query, true, &mut params)?,
            Action::Insert => self.render_insert(query, &mut params),
            Action::Update => self.render_update(query, &mut params)?,
            Action::Delete => self.render_delete(query, &mut params)?,
            Action::SchemaCreate {
                fields,
                foreign_keys,
            } => self.render_schema_create(&query.table, fields, foreign_keys),
            Action::SchemaAlter {
                add_fields,
                drop_fields,
            } => self.render_schema_alter(&query.table, add_fields, drop_fields),
            Action::SchemaDrop => format!(
                "DROP TABLE IF EXISTS {}",
                self.dialect.quote(&query.table)
            ),
        };
        Ok((sql, params))
    }

    // ── Statement shapes ───────────────────────────────────────────────

    fn render_select(
        &self,
        query: &Query,
        count: bool,
        params: &mut Vec<Value>,
    ) -> OrmResult<String> {
        let table = self.dialect.quote(&query.table);
        let mut sql = if count {
            format!("SELECT COUNT(*) FROM {table}")
        } else {
            format!("SELECT {table}.* FROM {table}")
        };

        for join in &query.joins {
            sql.push_str(&format!(
                " JOIN {} ON {}.{} = {}.{}",
                self.dialect.quote(&join.joined_table),
                self.dialect.quote(&join.base_table),
                self.dialect.quote(&join.base_key),
                self.dialect.quote(&join.joined_table),
                self.dialect.quote(&join.joined_key),
            ));
        }

        self.render_where(query, &mut sql, params)?;

        if count {
            return Ok(sql);
        }

        if !query.sorts.is_empty() {
            let orders: Vec<String> = query
                .sorts
                .iter()
                .map(|s| {
                    // A "table.column" sort field carries its own qualifier.
                    let field = FieldRef::from(s.field.as_str());
                    format!(
                        "{}.{} {}",
                        self.dialect.quote(field.table.as_deref().unwrap_or(&query.table)),
                        self.dialect.quote(&field.name),
                        s.direction.sql_keyword()
                    )
                })
                .collect();
            sql.push_str(&format!(" ORDER BY {}", orders.join(", ")));
        }

        if let Some(limit) = query.limit {
            sql.push(' ');
            sql.push_str(&self.dialect.limit_clause(limit));
        }

        Ok(sql)
    }

    fn render_insert(&self, query: &Query, params: &mut Vec<Value>) -> String {
        let columns: Vec<String> = query
            .data
            .iter()
            .map(|(name, _)| self.dialect.quote(name))
            .collect();
        let placeholders: Vec<String> = query
            .data
            .iter()
            .map(|(_, value)| {
                params.push(value.clone());
                self.dialect.placeholder(params.len())
            })
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.dialect.quote(&query.table),
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    fn render_update(&self, query: &Query, params: &mut Vec<Value>) -> OrmResult<String> {
        if query.data.is_empty() {
            return Err(OrmError::EmptyPayload(query.table.clone()));
        }
        let assignments: Vec<String> = query
            .data
            .iter()
            .map(|(name, value)| {
                params.push(value.clone());
                format!(
                    "{} = {}",
                    self.dialect.quote(name),
                    self.dialect.placeholder(params.len())
                )
            })
            .collect();
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.dialect.quote(&query.table),
            assignments.join(", ")
        );
        self.render_where(query, &mut sql, params)?;
        Ok(sql)
    }

    fn render_delete(&self, query: &Query, params: &mut Vec<Value>) -> OrmResult<String> {
        let mut sql = format!("DELETE FROM {}", self.dialect.quote(&query.table));
        self.render_where(query, &mut sql, params)?;
        if let Some(limit) = query.limit {
            sql.push(' ');
            sql.push_str(&self.dialect.limit_clause(limit));
        }
        Ok(sql)
    }

    // ── WHERE clause ───────────────────────────────────────────────────

    fn render_where(
        &self,
        query: &Query,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> OrmResult<()> {
        if query.filters.is_empty() {
            return Ok(());
        }
        sql.push_str(" WHERE ");
        for (i, item) in query.filters.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            self.render_item(&query.table, item, sql, params)?;
        }
        Ok(())
    }

    fn render_item(
        &self,
        table: &str,
        item: &FilterItem,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> OrmResult<()> {
        match item {
            FilterItem::Single(filter) => self.render_filter(table, filter, sql, params),
            FilterItem::Group { relation, children } => {
                if children.is_empty() {
                    // Keep the compiler total: an empty AND is vacuously
                    // true, an empty OR is vacuously false.
                    sql.push_str(match relation {
                        Relation::And => "1=1",
                        Relation::Or => "1=0",
                    });
                    return Ok(());
                }
                sql.push('(');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        sql.push(' ');
                        sql.push_str(relation.sql_keyword());
                        sql.push(' ');
                    }
                    self.render_item(table, child, sql, params)?;
                }
                sql.push(')');
                Ok(())
            }
        }
    }

    fn render_filter(
        &self,
        table: &str,
        filter: &QueryFilter,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> OrmResult<()> {
        let column = format!(
            "{}.{}",
            self.dialect
                .quote(filter.field.table.as_deref().unwrap_or(table)),
            self.dialect.quote(&filter.field.name)
        );

        if matches!(filter.value, FilterValue::None) {
            return match filter.comparison {
                Comparison::Equals => {
                    sql.push_str(&format!("{column} IS NULL"));
                    Ok(())
                }
                Comparison::NotEquals => {
                    sql.push_str(&format!("{column} IS NOT NULL"));
                    Ok(())
                }
                _ => Err(OrmError::InvalidFilter(format!(
                    "none value requires equals or not-equals, got {:?}",
                    filter.comparison
                ))),
            };
        }

        let operator = self.operator(&filter.comparison);
        match &filter.value {
            FilterValue::Scalar(value) => {
                params.push(self.bind_value(&filter.comparison, value));
                let ph = self.dialect.placeholder(params.len());
                match filter.comparison {
                    // A scalar on a membership test is a one-element list.
                    Comparison::In | Comparison::NotIn => {
                        sql.push_str(&format!("{column} {operator} ({ph})"));
                    }
                    _ => sql.push_str(&format!("{column} {operator} {ph}")),
                }
            }
            FilterValue::Array(values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| {
                        params.push(v.clone());
                        self.dialect.placeholder(params.len())
                    })
                    .collect();
                sql.push_str(&format!(
                    "{column} {operator} ({})",
                    placeholders.join(", ")
                ));
            }
            FilterValue::Field(other) => {
                let rhs = format!(
                    "{}.{}",
                    self.dialect.quote(other.table.as_deref().unwrap_or(table)),
                    self.dialect.quote(&other.name)
                );
                sql.push_str(&format!("{column} {operator} {rhs}"));
            }
            FilterValue::Subquery(subquery) => {
                let count = matches!(subquery.action, Action::Count);
                let nested = self.render_select(subquery, count, params)?;
                sql.push_str(&format!("{column} {operator} ({nested})"));
            }
            FilterValue::None => unreachable!("handled above"),
        }
        Ok(())
    }

    /// Returns the rendered operator text for a comparison.
    ///
    /// Sequence comparisons render as LIKE; the wildcard transform happens
    /// on the bound value, never on the operator text.
    fn operator<'a>(&self, comparison: &'a Comparison) -> &'a str {
        match comparison {
            Comparison::Equals => "=",
            Comparison::NotEquals => "!=",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::In => "IN",
            Comparison::NotIn => "NOT IN",
            Comparison::HasPrefix | Comparison::HasSuffix | Comparison::Contains => "LIKE",
            Comparison::Custom(op) => op,
        }
    }

    /// Applies the wildcard transform for sequence comparisons.
    fn bind_value(&self, comparison: &Comparison, value: &Value) -> Value {
        let text = || match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match comparison {
            Comparison::HasPrefix => Value::String(format!("{}%", text())),
            Comparison::HasSuffix => Value::String(format!("%{}", text())),
            Comparison::Contains => Value::String(format!("%{}%", text())),
            _ => value.clone(),
        }
    }

    // ── DDL ────────────────────────────────────────────────────────────

    fn render_schema_create(
        &self,
        table: &str,
        fields: &[Field],
        foreign_keys: &[ForeignKey],
    ) -> String {
        let mut parts: Vec<String> = fields.iter().map(|f| self.column_def(f)).collect();
        parts.extend(foreign_keys.iter().map(|fk| self.foreign_key_def(fk)));
        format!(
            "CREATE TABLE {} ({})",
            self.dialect.quote(table),
            parts.join(", ")
        )
    }

    fn render_schema_alter(
        &self,
        table: &str,
        add_fields: &[Field],
        drop_fields: &[String],
    ) -> String {
        let mut parts: Vec<String> = add_fields
            .iter()
            .map(|f| format!("ADD {}", self.column_def(f)))
            .collect();
        parts.extend(
            drop_fields
                .iter()
                .map(|name| format!("DROP {}", self.dialect.quote(name))),
        );
        format!(
            "ALTER TABLE {} {}",
            self.dialect.quote(table),
            parts.join(", ")
        )
    }

    /// Renders one column definition: type, key/null/unique clauses,
    /// default literal.
    fn column_def(&self, field: &Field) -> String {
        let mut sql = format!(
            "{} {}",
            self.dialect.quote(&field.name),
            self.dialect.column_type(&field.data_type)
        );
        if field.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !field.optional {
            sql.push_str(" NOT NULL");
        }
        if field.unique && !field.primary_key {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = &field.default {
            sql.push_str(&format!(" DEFAULT {}", Self::default_literal(default)));
        }
        sql
    }

    /// Renders a default literal: bare numeric, TRUE/FALSE, quoted string,
    /// or NULL.
    fn default_literal(value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            other => format!("'{}'", other.to_string().replace('\'', "''")),
        }
    }

    fn foreign_key_def(&self, fk: &ForeignKey) -> String {
        let constraint = fk
            .name
            .as_ref()
            .map_or_else(String::new, |name| {
                format!("CONSTRAINT {} ", self.dialect.quote(name))
            });
        format!(
            "{}FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
            constraint,
            self.dialect.quote(&fk.field),
            self.dialect.quote(&fk.references_table),
            self.dialect.quote(&fk.references_field),
            fk.on_delete.sql_keyword(),
            fk.on_update.sql_keyword(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ReferentialAction;
    use crate::query::filter::FieldRef;

    fn generic() -> SqlCompiler<GenericDialect> {
        SqlCompiler::generic()
    }

    fn pg() -> SqlCompiler<PostgresDialect> {
        SqlCompiler::new(PostgresDialect)
    }

    fn sqlite() -> SqlCompiler<SqliteDialect> {
        SqlCompiler::new(SqliteDialect)
    }

    fn single(field: &str, comparison: Comparison, value: impl Into<Value>) -> FilterItem {
        FilterItem::Single(QueryFilter::new(field, comparison, value))
    }

    // ── SELECT ───────────────────────────────────────────────────────

    #[test]
    fn test_bare_select() {
        let query = Query::new("users");
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(sql, "SELECT `users`.* FROM `users`");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_with_filter() {
        let mut query = Query::new("users");
        query
            .filters
            .push(single("name", Comparison::Equals, "Alice"));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `users`.* FROM `users` WHERE `users`.`name` = ?"
        );
        assert_eq!(params, vec![Value::String("Alice".into())]);
    }

    #[test]
    fn test_select_pg_placeholders() {
        let mut query = Query::new("users");
        query.filters.push(single("age", Comparison::GreaterThan, 21));
        query.filters.push(single("age", Comparison::LessThan, 65));
        let (sql, params) = pg().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT \"users\".* FROM \"users\" WHERE \"users\".\"age\" > $1 AND \"users\".\"age\" < $2"
        );
        assert_eq!(params, vec![Value::Int(21), Value::Int(65)]);
    }

    #[test]
    fn test_select_with_sort_and_limit() {
        let mut query = Query::new("users");
        query.sorts.push(Sort::ascending("name"));
        query.sorts.push(Sort::descending("created_at"));
        query.limit = Some(Limit::new(10, 20));
        let (sql, _) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `users`.* FROM `users` ORDER BY `users`.`name` ASC, `users`.`created_at` DESC LIMIT 20,10"
        );
    }

    #[test]
    fn test_sort_on_joined_table_column() {
        let mut query = Query::new("users");
        query.joins.push(Join::new("users", "id", "profiles", "user_id"));
        query.sorts.push(Sort::descending("profiles.rank"));
        query.sorts.push(Sort::ascending("name"));
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.ends_with(
            "ORDER BY `profiles`.`rank` DESC, `users`.`name` ASC"
        ));
    }

    #[test]
    fn test_sqlite_limit_syntax() {
        let mut query = Query::new("users");
        query.limit = Some(Limit::new(10, 20));
        let (sql, _) = sqlite().compile(&query).unwrap();
        assert_eq!(sql, "SELECT `users`.* FROM `users` LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_select_with_join() {
        let mut query = Query::new("compounds");
        query.joins.push(Join::new(
            "compounds",
            "id",
            "atom_compound",
            "compound_id",
        ));
        query.filters.push(FilterItem::Single(QueryFilter::new(
            FieldRef::qualified("atom_compound", "atom_id"),
            Comparison::Equals,
            1,
        )));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `compounds`.* FROM `compounds` JOIN `atom_compound` ON `compounds`.`id` = `atom_compound`.`compound_id` WHERE `atom_compound`.`atom_id` = ?"
        );
        assert_eq!(params, vec![Value::Int(1)]);
    }

    // ── COUNT ────────────────────────────────────────────────────────

    #[test]
    fn test_count_drops_sort_and_limit() {
        let mut query = Query::new("users");
        query.action = Action::Count;
        query.filters.push(single("active", Comparison::Equals, true));
        query.sorts.push(Sort::ascending("name"));
        query.limit = Some(Limit::new(10, 0));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM `users` WHERE `users`.`active` = ?"
        );
        assert_eq!(params, vec![Value::Bool(true)]);
    }

    // ── NULL comparisons ─────────────────────────────────────────────

    #[test]
    fn test_equals_none_is_null() {
        let mut query = Query::new("users");
        query.filters.push(single("bio", Comparison::Equals, Value::Null));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `users`.* FROM `users` WHERE `users`.`bio` IS NULL"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_not_equals_none_is_not_null() {
        let mut query = Query::new("users");
        query
            .filters
            .push(single("bio", Comparison::NotEquals, Value::Null));
        let (sql, params) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("`users`.`bio` IS NOT NULL"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_none_with_ordering_comparison_fails() {
        let mut query = Query::new("users");
        query
            .filters
            .push(single("age", Comparison::GreaterThan, Value::Null));
        let err = generic().compile(&query).unwrap_err();
        assert!(matches!(err, OrmError::InvalidFilter(_)));
    }

    // ── Sequence comparisons ─────────────────────────────────────────

    #[test]
    fn test_has_prefix_wraps_value_not_operator() {
        let mut query = Query::new("users");
        query
            .filters
            .push(single("name", Comparison::HasPrefix, "Al"));
        let (sql, params) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("`users`.`name` LIKE ?"));
        assert_eq!(params, vec![Value::String("Al%".into())]);
    }

    #[test]
    fn test_has_suffix_wraps_value() {
        let mut query = Query::new("users");
        query
            .filters
            .push(single("email", Comparison::HasSuffix, ".com"));
        let (_, params) = generic().compile(&query).unwrap();
        assert_eq!(params, vec![Value::String("%.com".into())]);
    }

    #[test]
    fn test_contains_wraps_value() {
        let mut query = Query::new("posts");
        query
            .filters
            .push(single("title", Comparison::Contains, "rust"));
        let (_, params) = generic().compile(&query).unwrap();
        assert_eq!(params, vec![Value::String("%rust%".into())]);
    }

    // ── Membership ───────────────────────────────────────────────────

    #[test]
    fn test_in_array() {
        let mut query = Query::new("users");
        query.filters.push(FilterItem::Single(QueryFilter::with_value(
            "id",
            Comparison::In,
            FilterValue::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        )));
        let (sql, params) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("`users`.`id` IN (?, ?, ?)"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_not_in_array() {
        let mut query = Query::new("users");
        query.filters.push(FilterItem::Single(QueryFilter::with_value(
            "id",
            Comparison::NotIn,
            FilterValue::Array(vec![Value::Int(4), Value::Int(5)]),
        )));
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("`users`.`id` NOT IN (?, ?)"));
    }

    #[test]
    fn test_in_scalar_is_one_element_list() {
        let mut query = Query::new("users");
        query.filters.push(single("id", Comparison::In, 7));
        let (sql, params) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("`users`.`id` IN (?)"));
        assert_eq!(params, vec![Value::Int(7)]);
    }

    // ── Column-to-column and subquery ────────────────────────────────

    #[test]
    fn test_field_to_field_binds_nothing() {
        let mut query = Query::new("orders");
        query.filters.push(FilterItem::Single(QueryFilter::field_to_field(
            "shipped_at",
            Comparison::GreaterOrEqual,
            "ordered_at",
        )));
        let (sql, params) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("`orders`.`shipped_at` >= `orders`.`ordered_at`"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_subquery_splices_params_in_order() {
        let mut inner = Query::new("banned");
        inner
            .filters
            .push(single("reason", Comparison::Equals, "spam"));
        let mut query = Query::new("users");
        query.filters.push(single("active", Comparison::Equals, true));
        query.filters.push(FilterItem::Single(QueryFilter::with_value(
            "id",
            Comparison::In,
            FilterValue::Subquery(Box::new(inner)),
        )));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `users`.* FROM `users` WHERE `users`.`active` = ? AND `users`.`id` IN (SELECT `banned`.* FROM `banned` WHERE `banned`.`reason` = ?)"
        );
        assert_eq!(
            params,
            vec![Value::Bool(true), Value::String("spam".into())]
        );
    }

    #[test]
    fn test_subquery_pg_numbering_continues() {
        let mut inner = Query::new("banned");
        inner
            .filters
            .push(single("reason", Comparison::Equals, "spam"));
        let mut query = Query::new("users");
        query.filters.push(single("active", Comparison::Equals, true));
        query.filters.push(FilterItem::Single(QueryFilter::with_value(
            "id",
            Comparison::In,
            FilterValue::Subquery(Box::new(inner)),
        )));
        let (sql, params) = pg().compile(&query).unwrap();
        assert!(sql.contains("$1"));
        assert!(sql.contains("$2"));
        assert_eq!(params.len(), 2);
    }

    // ── Grouping ─────────────────────────────────────────────────────

    #[test]
    fn test_nested_group_parenthesization_preserved() {
        // (a = 1 AND b = 2) OR c = 3 keeps its declared nesting.
        let mut query = Query::new("t");
        query.filters.push(FilterItem::Group {
            relation: Relation::Or,
            children: vec![
                FilterItem::Group {
                    relation: Relation::And,
                    children: vec![
                        single("a", Comparison::Equals, 1),
                        single("b", Comparison::Equals, 2),
                    ],
                },
                single("c", Comparison::Equals, 3),
            ],
        });
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "SELECT `t`.* FROM `t` WHERE ((`t`.`a` = ? AND `t`.`b` = ?) OR `t`.`c` = ?)"
        );
        assert_eq!(params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_placeholder_count_matches_value_count_deep_tree() {
        let mut query = Query::new("t");
        query.filters.push(FilterItem::Group {
            relation: Relation::Or,
            children: vec![
                FilterItem::Group {
                    relation: Relation::And,
                    children: vec![
                        single("a", Comparison::Equals, 1),
                        FilterItem::Group {
                            relation: Relation::Or,
                            children: vec![
                                single("b", Comparison::Equals, 2),
                                single("c", Comparison::HasPrefix, "x"),
                            ],
                        },
                    ],
                },
                single("d", Comparison::Equals, 4),
            ],
        });
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(sql.matches('?').count(), params.len());
        // Depth-first order of the bound values.
        assert_eq!(
            params,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::String("x%".into()),
                Value::Int(4)
            ]
        );
    }

    #[test]
    fn test_empty_and_group_is_true() {
        let mut query = Query::new("t");
        query.filters.push(FilterItem::Group {
            relation: Relation::And,
            children: vec![],
        });
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("WHERE 1=1"));
    }

    #[test]
    fn test_empty_or_group_is_false() {
        let mut query = Query::new("t");
        query.filters.push(FilterItem::Group {
            relation: Relation::Or,
            children: vec![],
        });
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.ends_with("WHERE 1=0"));
    }

    // ── INSERT / UPDATE / DELETE ─────────────────────────────────────

    #[test]
    fn test_insert() {
        let mut query = Query::new("users");
        query.action = Action::Insert;
        query.data.push(("name".into(), Value::String("Alice".into())));
        query.data.push(("age".into(), Value::Int(30)));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `users` (`name`, `age`) VALUES (?, ?)"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_insert_empty_payload() {
        let mut query = Query::new("users");
        query.action = Action::Insert;
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(sql, "INSERT INTO `users` () VALUES ()");
        assert!(params.is_empty());
    }

    #[test]
    fn test_update_with_filter() {
        let mut query = Query::new("users");
        query.action = Action::Update;
        query.data.push(("name".into(), Value::String("Bob".into())));
        query.filters.push(single("id", Comparison::Equals, 1));
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "UPDATE `users` SET `name` = ? WHERE `users`.`id` = ?"
        );
        assert_eq!(
            params,
            vec![Value::String("Bob".into()), Value::Int(1)]
        );
    }

    #[test]
    fn test_update_pg_numbering_spans_set_and_where() {
        let mut query = Query::new("users");
        query.action = Action::Update;
        query.data.push(("name".into(), Value::String("Bob".into())));
        query.data.push(("age".into(), Value::Int(31)));
        query.filters.push(single("id", Comparison::Equals, 1));
        let (sql, params) = pg().compile(&query).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"users\" SET \"name\" = $1, \"age\" = $2 WHERE \"users\".\"id\" = $3"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_update_empty_payload_fails() {
        let mut query = Query::new("users");
        query.action = Action::Update;
        query.filters.push(single("id", Comparison::Equals, 1));
        let err = generic().compile(&query).unwrap_err();
        assert!(matches!(err, OrmError::EmptyPayload(_)));
    }

    #[test]
    fn test_delete_with_filter_and_limit() {
        let mut query = Query::new("sessions");
        query.action = Action::Delete;
        query.filters.push(single("expired", Comparison::Equals, true));
        query.limit = Some(Limit::new(100, 0));
        let (sql, _) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "DELETE FROM `sessions` WHERE `sessions`.`expired` = ? LIMIT 0,100"
        );
    }

    #[test]
    fn test_bare_delete() {
        let mut query = Query::new("sessions");
        query.action = Action::Delete;
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(sql, "DELETE FROM `sessions`");
        assert!(params.is_empty());
    }

    // ── DDL ──────────────────────────────────────────────────────────

    #[test]
    fn test_schema_create() {
        let mut query = Query::new("x");
        query.action = Action::SchemaCreate {
            fields: vec![Field::id(), Field::string("name")],
            foreign_keys: vec![],
        };
        let (sql, params) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `x` (`id` INTEGER PRIMARY KEY, `name` STRING NOT NULL)"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_schema_create_flags_and_default() {
        let mut query = Query::new("users");
        query.action = Action::SchemaCreate {
            fields: vec![
                Field::id(),
                Field::string("email").unique(),
                Field::string("bio").optional(),
                Field::bool("active").default_value(true),
                Field::int("score").default_value(0),
                Field::string("status").default_value("draft"),
            ],
            foreign_keys: vec![],
        };
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.contains("`email` STRING NOT NULL UNIQUE"));
        assert!(sql.contains("`bio` STRING,"));
        assert!(sql.contains("`active` BOOL NOT NULL DEFAULT TRUE"));
        assert!(sql.contains("`score` INTEGER NOT NULL DEFAULT 0"));
        assert!(sql.contains("`status` STRING NOT NULL DEFAULT 'draft'"));
    }

    #[test]
    fn test_schema_create_escapes_default_string() {
        let mut query = Query::new("t");
        query.action = Action::SchemaCreate {
            fields: vec![Field::string("quote").default_value("it's")],
            foreign_keys: vec![],
        };
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.contains("DEFAULT 'it''s'"));
    }

    #[test]
    fn test_schema_create_with_foreign_key() {
        let mut query = Query::new("posts");
        query.action = Action::SchemaCreate {
            fields: vec![Field::id(), Field::int("user_id")],
            foreign_keys: vec![ForeignKey::new("user_id", "users", "id")
                .on_delete(ReferentialAction::Cascade)],
        };
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.contains(
            "FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE CASCADE ON UPDATE NO ACTION"
        ));
    }

    #[test]
    fn test_schema_create_named_foreign_key() {
        let mut query = Query::new("posts");
        query.action = Action::SchemaCreate {
            fields: vec![Field::int("user_id")],
            foreign_keys: vec![ForeignKey::new("user_id", "users", "id").named("fk_posts_user")],
        };
        let (sql, _) = generic().compile(&query).unwrap();
        assert!(sql.contains("CONSTRAINT `fk_posts_user` FOREIGN KEY"));
    }

    #[test]
    fn test_schema_alter_combined_clause() {
        let mut query = Query::new("users");
        query.action = Action::SchemaAlter {
            add_fields: vec![Field::string("nickname").optional()],
            drop_fields: vec!["legacy_flag".into()],
        };
        let (sql, _) = generic().compile(&query).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `users` ADD `nickname` STRING, DROP `legacy_flag`"
        );
    }

    #[test]
    fn test_schema_drop() {
        let mut query = Query::new("users");
        query.action = Action::SchemaDrop;
        let (sql, _) = generic().compile(&query).unwrap();
        assert_eq!(sql, "DROP TABLE IF EXISTS `users`");
    }

    #[test]
    fn test_dialect_column_types() {
        let g = GenericDialect;
        assert_eq!(g.column_type(&DataType::Id(IdKind::Int)), "INTEGER");
        assert_eq!(g.column_type(&DataType::String(None)), "STRING");
        assert_eq!(g.column_type(&DataType::String(Some(64))), "VARCHAR(64)");
        assert_eq!(g.column_type(&DataType::Double), "DOUBLE");
        assert_eq!(g.column_type(&DataType::Bool), "BOOL");
        assert_eq!(g.column_type(&DataType::Bytes), "BLOB");
        assert_eq!(g.column_type(&DataType::Date), "TIMESTAMP");
        assert_eq!(g.column_type(&DataType::Custom("POINT".into())), "POINT");

        let s = SqliteDialect;
        assert_eq!(s.column_type(&DataType::Bool), "INTEGER");
        assert_eq!(s.column_type(&DataType::String(Some(64))), "TEXT");
        assert_eq!(s.column_type(&DataType::Double), "REAL");

        let p = PostgresDialect;
        assert_eq!(p.column_type(&DataType::Id(IdKind::Int)), "SERIAL");
        assert_eq!(p.column_type(&DataType::Bytes), "BYTEA");
        assert_eq!(p.column_type(&DataType::Double), "DOUBLE PRECISION");
    }

    // ── Determinism ──────────────────────────────────────────────────

    #[test]
    fn test_compile_is_deterministic() {
        let mut query = Query::new("users");
        query.filters.push(FilterItem::Group {
            relation: Relation::Or,
            children: vec![
                single("a", Comparison::Equals, 1),
                single("b", Comparison::Contains, "x"),
            ],
        });
        query.joins.push(Join::new("users", "id", "profiles", "user_id"));
        query.sorts.push(Sort::ascending("a"));
        query.limit = Some(Limit::new(5, 10));

        let first = generic().compile(&query).unwrap();
        let second = generic().compile(&query).unwrap();
        assert_eq!(first, second);
    }
}
