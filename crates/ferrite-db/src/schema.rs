//! Schema construction: table create, alter, and drop.
//!
//! [`SchemaBuilder`] accumulates column and constraint descriptors through
//! chained owned-`self` calls and yields a [`Query`] carrying one of the
//! schema action variants. Rendering is the compiler's job; this module
//! only shapes the model.

use crate::entity::Entity;
use crate::fields::{DataType, Field, ForeignKey};
use crate::query::compiler::{Action, Query};

/// Behavior toggles for schema construction.
#[derive(Debug, Clone, Copy)]
pub struct SchemaConfig {
    /// When set, [`SchemaBuilder::foreign_id`] adds a foreign-key
    /// constraint alongside the reference column. When clear, only the
    /// column is added.
    pub auto_foreign_keys: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            auto_foreign_keys: true,
        }
    }
}

#[derive(Debug, Clone)]
enum SchemaKind {
    Create {
        fields: Vec<Field>,
        foreign_keys: Vec<ForeignKey>,
    },
    Alter {
        add_fields: Vec<Field>,
        drop_fields: Vec<String>,
    },
    Drop,
}

/// Builds a schema query for one table.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    table: String,
    config: SchemaConfig,
    kind: SchemaKind,
}

impl SchemaBuilder {
    /// Starts a CREATE TABLE builder.
    pub fn create(table: impl Into<String>) -> Self {
        Self::create_with(table, SchemaConfig::default())
    }

    /// Starts a CREATE TABLE builder with explicit behavior toggles.
    pub fn create_with(table: impl Into<String>, config: SchemaConfig) -> Self {
        Self {
            table: table.into(),
            config,
            kind: SchemaKind::Create {
                fields: Vec::new(),
                foreign_keys: Vec::new(),
            },
        }
    }

    /// Starts an ALTER TABLE builder.
    pub fn alter(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            config: SchemaConfig::default(),
            kind: SchemaKind::Alter {
                add_fields: Vec::new(),
                drop_fields: Vec::new(),
            },
        }
    }

    /// Starts a DROP TABLE builder.
    pub fn drop(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            config: SchemaConfig::default(),
            kind: SchemaKind::Drop,
        }
    }

    /// Appends a column descriptor. On an ALTER builder the column is
    /// added; on a DROP builder the call is ignored.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        match &mut self.kind {
            SchemaKind::Create { fields, .. } => fields.push(field),
            SchemaKind::Alter { add_fields, .. } => add_fields.push(field),
            SchemaKind::Drop => {}
        }
        self
    }

    // Column shortcuts, mirroring the Field constructors.

    /// Appends the conventional integer primary-key column.
    #[must_use]
    pub fn id(self) -> Self {
        self.field(Field::id())
    }

    /// Appends an integer column.
    #[must_use]
    pub fn int(self, name: impl Into<String>) -> Self {
        self.field(Field::int(name))
    }

    /// Appends an unbounded string column.
    #[must_use]
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(Field::string(name))
    }

    /// Appends a double-precision column.
    #[must_use]
    pub fn double(self, name: impl Into<String>) -> Self {
        self.field(Field::double(name))
    }

    /// Appends a boolean column.
    #[must_use]
    pub fn bool_field(self, name: impl Into<String>) -> Self {
        self.field(Field::bool(name))
    }

    /// Appends a binary column.
    #[must_use]
    pub fn bytes(self, name: impl Into<String>) -> Self {
        self.field(Field::bytes(name))
    }

    /// Appends a date/time column.
    #[must_use]
    pub fn date(self, name: impl Into<String>) -> Self {
        self.field(Field::date(name))
    }

    /// Appends a column with a dialect-specific type, rendered verbatim.
    #[must_use]
    pub fn custom(self, name: impl Into<String>, column_type: impl Into<String>) -> Self {
        self.field(Field::new(name, DataType::Custom(column_type.into())))
    }

    /// Appends a foreign-key constraint. Only meaningful on a CREATE
    /// builder.
    #[must_use]
    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        if let SchemaKind::Create { foreign_keys, .. } = &mut self.kind {
            foreign_keys.push(foreign_key);
        }
        self
    }

    /// Appends the conventional reference column for `E`, plus the
    /// matching foreign-key constraint when
    /// [`SchemaConfig::auto_foreign_keys`] is set.
    #[must_use]
    pub fn foreign_id<E: Entity>(self) -> Self {
        let column = E::foreign_id_key();
        let auto = self.config.auto_foreign_keys;
        let mut builder = self.field(Field::int(&column));
        if auto {
            builder = builder.foreign_key(ForeignKey::new(column, E::table(), E::id_key()));
        }
        builder
    }

    /// Declares `E` as the parent of this table. Sugar for
    /// [`SchemaBuilder::foreign_id`].
    #[must_use]
    pub fn parent<E: Entity>(self) -> Self {
        self.foreign_id::<E>()
    }

    /// Marks a column for removal. Only meaningful on an ALTER builder.
    #[must_use]
    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        if let SchemaKind::Alter { drop_fields, .. } = &mut self.kind {
            drop_fields.push(name.into());
        }
        self
    }

    /// Yields the schema query.
    #[must_use]
    pub fn build(self) -> Query {
        let mut query = Query::new(self.table);
        query.action = match self.kind {
            SchemaKind::Create {
                fields,
                foreign_keys,
            } => Action::SchemaCreate {
                fields,
                foreign_keys,
            },
            SchemaKind::Alter {
                add_fields,
                drop_fields,
            } => Action::SchemaAlter {
                add_fields,
                drop_fields,
            },
            SchemaKind::Drop => Action::SchemaDrop,
        };
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compiler::{GenericDialect, SqlCompiler};

    struct User;

    impl Entity for User {
        fn name() -> String {
            "user".to_string()
        }
    }

    #[test]
    fn test_create_builds_schema_create_action() {
        let query = SchemaBuilder::create("x").id().string("name").build();
        let (sql, params) = SqlCompiler::new(GenericDialect).compile(&query).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `x` (`id` INTEGER PRIMARY KEY, `name` STRING NOT NULL)"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_column_shortcuts_map_to_field_constructors() {
        let query = SchemaBuilder::create("samples")
            .id()
            .int("count")
            .double("ratio")
            .bool_field("active")
            .bytes("payload")
            .date("taken_at")
            .custom("location", "POINT")
            .build();
        let (sql, _) = SqlCompiler::new(GenericDialect).compile(&query).unwrap();
        assert!(sql.contains("`count` INTEGER NOT NULL"));
        assert!(sql.contains("`ratio` DOUBLE NOT NULL"));
        assert!(sql.contains("`active` BOOL NOT NULL"));
        assert!(sql.contains("`payload` BLOB NOT NULL"));
        assert!(sql.contains("`taken_at` TIMESTAMP NOT NULL"));
        assert!(sql.contains("`location` POINT NOT NULL"));
    }

    #[test]
    fn test_foreign_id_adds_column_and_constraint() {
        let query = SchemaBuilder::create("posts").id().foreign_id::<User>().build();
        let (sql, _) = SqlCompiler::new(GenericDialect).compile(&query).unwrap();
        assert!(sql.contains("`user_id` INTEGER NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (`user_id`) REFERENCES `users` (`id`)"));
    }

    #[test]
    fn test_parent_is_foreign_id_sugar() {
        let explicit = SchemaBuilder::create("posts").foreign_id::<User>().build();
        let sugar = SchemaBuilder::create("posts").parent::<User>().build();
        assert_eq!(explicit, sugar);
    }

    #[test]
    fn test_foreign_id_without_auto_foreign_keys() {
        let config = SchemaConfig {
            auto_foreign_keys: false,
        };
        let query = SchemaBuilder::create_with("posts", config)
            .foreign_id::<User>()
            .build();
        let (sql, _) = SqlCompiler::new(GenericDialect).compile(&query).unwrap();
        assert!(sql.contains("`user_id` INTEGER NOT NULL"));
        assert!(!sql.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_alter_accumulates_adds_and_drops() {
        let query = SchemaBuilder::alter("users")
            .field(Field::string("nickname").optional())
            .drop_column("legacy_flag")
            .build();
        let (sql, _) = SqlCompiler::new(GenericDialect).compile(&query).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `users` ADD `nickname` STRING, DROP `legacy_flag`"
        );
    }

    #[test]
    fn test_drop_builder() {
        let query = SchemaBuilder::drop("users").build();
        let (sql, _) = SqlCompiler::new(GenericDialect).compile(&query).unwrap();
        assert_eq!(sql, "DROP TABLE IF EXISTS `users`");
    }
}
