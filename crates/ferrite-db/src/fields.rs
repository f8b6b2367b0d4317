//! Column and foreign-key descriptors for DDL generation.
//!
//! A [`Field`] captures everything the compiler needs to render one column
//! definition: its canonical data type plus the optional/unique/default/
//! primary-key flags. A [`ForeignKey`] describes one referential
//! constraint. Both are plain data; the schema builder produces them and
//! the compiler renders them.

use crate::value::Value;

/// The identifier type of an `id` column.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IdKind {
    /// Auto-incrementing integer identifier.
    Int,
    /// UUID identifier.
    Uuid,
    /// A dialect-specific identifier type, rendered verbatim.
    Custom(String),
}

/// The canonical data type of a column.
///
/// Each variant maps to a dialect column type at compile time; see the
/// dialect's `column_type` hook for the concrete spellings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DataType {
    /// An identifier column.
    Id(IdKind),
    /// A 64-bit signed integer.
    Int,
    /// A string, optionally length-limited.
    String(Option<usize>),
    /// A double-precision float.
    Double,
    /// A boolean.
    Bool,
    /// Raw binary data.
    Bytes,
    /// A date/time instant.
    Date,
    /// A dialect-specific column type, rendered verbatim.
    Custom(String),
}

/// Referential action applied on update or delete of a referenced row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReferentialAction {
    /// Take no action.
    NoAction,
    /// Prevent the operation if referencing rows exist.
    Restrict,
    /// Propagate the operation to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default value.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL keyword sequence for this action.
    pub const fn sql_keyword(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Complete definition of one column.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Field {
    /// The column name.
    pub name: String,
    /// The canonical data type.
    pub data_type: DataType,
    /// Whether NULL is allowed.
    pub optional: bool,
    /// Whether a UNIQUE constraint is applied.
    pub unique: bool,
    /// Default literal for the column.
    pub default: Option<Value>,
    /// Whether this column is the primary key.
    pub primary_key: bool,
}

impl Field {
    /// Creates a new field with the given name and type.
    ///
    /// All flags default off: non-optional, non-unique, no default, not a
    /// primary key.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            optional: false,
            unique: false,
            default: None,
            primary_key: false,
        }
    }

    /// Shortcut for an integer `id` primary-key field.
    pub fn id() -> Self {
        Self::new("id", DataType::Id(IdKind::Int)).primary_key()
    }

    /// Shortcut for an integer field.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Int)
    }

    /// Shortcut for an unbounded string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, DataType::String(None))
    }

    /// Shortcut for a length-limited string field.
    pub fn string_with_length(name: impl Into<String>, length: usize) -> Self {
        Self::new(name, DataType::String(Some(length)))
    }

    /// Shortcut for a double field.
    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Double)
    }

    /// Shortcut for a boolean field.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Bool)
    }

    /// Shortcut for a binary field.
    pub fn bytes(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Bytes)
    }

    /// Shortcut for a date/time field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Date)
    }

    /// Allows NULL values for this field.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Adds a UNIQUE constraint to this field.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default literal for this field.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// One foreign-key constraint between two tables.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKey {
    /// The owning column on the table being defined.
    pub field: String,
    /// The referenced column on the target table.
    pub references_field: String,
    /// The referenced table.
    pub references_table: String,
    /// Optional explicit constraint name.
    pub name: Option<String>,
    /// Action on update of the referenced row.
    pub on_update: ReferentialAction,
    /// Action on delete of the referenced row.
    pub on_delete: ReferentialAction,
}

impl ForeignKey {
    /// Creates a foreign key with `NO ACTION` semantics on both events.
    pub fn new(
        field: impl Into<String>,
        references_table: impl Into<String>,
        references_field: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            references_field: references_field.into(),
            references_table: references_table.into(),
            name: None,
            on_update: ReferentialAction::NoAction,
            on_delete: ReferentialAction::NoAction,
        }
    }

    /// Sets an explicit constraint name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub const fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }
}
