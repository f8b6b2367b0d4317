//! The filter expression tree.
//!
//! A WHERE clause is an ordered, finite tree of [`FilterItem`]s: leaves are
//! single field/comparison/value predicates, interior nodes are groups
//! tagged with one [`Relation`] that applies uniformly to all direct
//! children. Nodes own their children by value, so cycles are impossible
//! by construction and the declared nesting is preserved verbatim through
//! compilation.
//!
//! # Examples
//!
//! ```
//! use ferrite_db::query::filter::{Comparison, FilterGroup, QueryFilter, Relation};
//!
//! // (age > 21 AND age < 65) as one group node
//! let group = FilterGroup::new(Relation::And)
//!     .filter("age", Comparison::GreaterThan, 21)
//!     .filter("age", Comparison::LessThan, 65)
//!     .into_item();
//!
//! // operator sugar for an ad hoc two-leaf group
//! let either = QueryFilter::new("name", Comparison::Equals, "Alice")
//!     | QueryFilter::new("name", Comparison::Equals, "Bob");
//! ```

use crate::value::Value;
use std::ops;

/// The relation applied between all direct children of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Relation {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
}

impl Relation {
    /// Returns the SQL keyword for this relation.
    pub const fn sql_keyword(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A reference to a column, optionally qualified with a table.
///
/// Unqualified references resolve to the query's own table when compiled.
/// A `"table.column"` string converts into a qualified reference.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldRef {
    /// The qualifying table, if any.
    pub table: Option<String>,
    /// The column name.
    pub name: String,
}

impl FieldRef {
    /// Creates an unqualified field reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Creates a table-qualified field reference.
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

impl From<&str> for FieldRef {
    fn from(s: &str) -> Self {
        s.split_once('.').map_or_else(
            || Self::new(s),
            |(table, name)| Self::qualified(table, name),
        )
    }
}

impl From<String> for FieldRef {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// A comparison operator in a single predicate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Comparison {
    /// `=`, or `IS NULL` when the value is none.
    Equals,
    /// `!=`, or `IS NOT NULL` when the value is none.
    NotEquals,
    /// `>`.
    GreaterThan,
    /// `<`.
    LessThan,
    /// `>=`.
    GreaterOrEqual,
    /// `<=`.
    LessOrEqual,
    /// `IN (...)`.
    In,
    /// `NOT IN (...)`.
    NotIn,
    /// `LIKE 'value%'`.
    HasPrefix,
    /// `LIKE '%value'`.
    HasSuffix,
    /// `LIKE '%value%'`.
    Contains,
    /// A dialect-specific operator rendered verbatim.
    Custom(String),
}

/// The right-hand side of a single predicate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FilterValue {
    /// A bound scalar, delivered through the parameter channel.
    Scalar(Value),
    /// A bound list of scalars (for IN / NOT IN).
    Array(Vec<Value>),
    /// Another column; compiles to a column-to-column comparison with no
    /// bound parameter.
    Field(FieldRef),
    /// A nested query; compiles to a parenthesized subselect whose
    /// parameters splice into the outer parameter list in order.
    Subquery(Box<crate::query::compiler::Query>),
    /// No value. Only meaningful with equals/not-equals, where it forces
    /// NULL-comparison syntax.
    None,
}

impl From<Value> for FilterValue {
    fn from(v: Value) -> Self {
        // A null scalar and an absent value mean the same thing to the
        // compiler; normalize here so IS NULL has one representation.
        if v.is_null() {
            Self::None
        } else {
            Self::Scalar(v)
        }
    }
}

impl From<Vec<Value>> for FilterValue {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

/// A single field/comparison/value predicate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QueryFilter {
    /// The column being compared.
    pub field: FieldRef,
    /// The comparison operator.
    pub comparison: Comparison,
    /// The right-hand side.
    pub value: FilterValue,
}

impl QueryFilter {
    /// Creates a predicate against a bound scalar value.
    pub fn new(field: impl Into<FieldRef>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: FilterValue::from(value.into()),
        }
    }

    /// Creates a predicate with an explicit [`FilterValue`].
    pub fn with_value(
        field: impl Into<FieldRef>,
        comparison: Comparison,
        value: FilterValue,
    ) -> Self {
        Self {
            field: field.into(),
            comparison,
            value,
        }
    }

    /// Creates a column-to-column predicate.
    pub fn field_to_field(
        field: impl Into<FieldRef>,
        comparison: Comparison,
        other: impl Into<FieldRef>,
    ) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: FilterValue::Field(other.into()),
        }
    }
}

// Leaf-level sugar: combining two bare predicates yields an ad hoc group.
// Top-level composition of a filter list is always AND; OR between more
// than two predicates goes through explicit group construction.

impl ops::BitAnd for QueryFilter {
    type Output = FilterItem;

    fn bitand(self, rhs: Self) -> Self::Output {
        FilterItem::Group {
            relation: Relation::And,
            children: vec![FilterItem::Single(self), FilterItem::Single(rhs)],
        }
    }
}

impl ops::BitOr for QueryFilter {
    type Output = FilterItem;

    fn bitor(self, rhs: Self) -> Self::Output {
        FilterItem::Group {
            relation: Relation::Or,
            children: vec![FilterItem::Single(self), FilterItem::Single(rhs)],
        }
    }
}

/// One node of the filter tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FilterItem {
    /// A leaf predicate.
    Single(QueryFilter),
    /// A parenthesized group of children combined by one relation.
    Group {
        /// The relation between all direct children.
        relation: Relation,
        /// The children, in declaration order.
        children: Vec<FilterItem>,
    },
}

impl From<QueryFilter> for FilterItem {
    fn from(filter: QueryFilter) -> Self {
        Self::Single(filter)
    }
}

/// An isolated accumulator for building one filter group.
///
/// Group construction spawns one of these with an empty filter list, so
/// nested composition never aliases the parent's sibling filters; the
/// final list folds back into the parent as a single group node.
#[derive(Debug, Clone)]
pub struct FilterGroup {
    relation: Relation,
    children: Vec<FilterItem>,
}

impl FilterGroup {
    /// Creates an empty group accumulator with the given relation.
    pub const fn new(relation: Relation) -> Self {
        Self {
            relation,
            children: Vec::new(),
        }
    }

    /// Appends a predicate against a bound scalar value.
    #[must_use]
    pub fn filter(
        mut self,
        field: impl Into<FieldRef>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.children
            .push(FilterItem::Single(QueryFilter::new(field, comparison, value)));
        self
    }

    /// Appends a column-to-column predicate.
    #[must_use]
    pub fn filter_field(
        mut self,
        field: impl Into<FieldRef>,
        comparison: Comparison,
        other: impl Into<FieldRef>,
    ) -> Self {
        self.children.push(FilterItem::Single(QueryFilter::field_to_field(
            field, comparison, other,
        )));
        self
    }

    /// Appends a prebuilt filter item.
    #[must_use]
    pub fn add(mut self, item: impl Into<FilterItem>) -> Self {
        self.children.push(item.into());
        self
    }

    /// Builds a nested group through a child accumulator and appends it.
    #[must_use]
    pub fn group(mut self, relation: Relation, build: impl FnOnce(Self) -> Self) -> Self {
        let child = build(Self::new(relation));
        self.children.push(child.into_item());
        self
    }

    /// Folds this accumulator into a single group node.
    pub fn into_item(self) -> FilterItem {
        FilterItem::Group {
            relation: self.relation,
            children: self.children,
        }
    }
}

impl From<FilterGroup> for FilterItem {
    fn from(group: FilterGroup) -> Self {
        group.into_item()
    }
}
