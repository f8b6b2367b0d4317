//! Fluent query construction.
//!
//! [`QueryBuilder`] accumulates filters, joins, sorts, a row window, and a
//! write payload through chained owned-`self` calls, then yields an
//! immutable [`Query`] via [`QueryBuilder::build`]. Every accumulator is
//! additive and order-preserving; calling the same method twice appends,
//! except [`limit`](QueryBuilder::limit), where the last call wins.

use crate::query::compiler::{Action, Join, Limit, Query, Sort, SortDirection};
use crate::query::filter::{
    Comparison, FieldRef, FilterGroup, FilterItem, QueryFilter, Relation,
};
use crate::value::Value;

/// Builds a [`Query`] one clause at a time.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Starts a SELECT builder for the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            query: Query::new(table),
        }
    }

    /// Replaces the action variant.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.query.action = action;
        self
    }

    /// Switches the builder to a COUNT query.
    #[must_use]
    pub fn count(self) -> Self {
        self.action(Action::Count)
    }

    /// Appends a scalar filter at the top level (ANDed with its siblings).
    #[must_use]
    pub fn filter(
        mut self,
        field: impl Into<FieldRef>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        self.query
            .filters
            .push(FilterItem::Single(QueryFilter::new(field, comparison, value)));
        self
    }

    /// Appends a column-to-column filter at the top level.
    #[must_use]
    pub fn filter_field(
        mut self,
        field: impl Into<FieldRef>,
        comparison: Comparison,
        other: impl Into<FieldRef>,
    ) -> Self {
        self.query.filters.push(FilterItem::Single(
            QueryFilter::field_to_field(field, comparison, other),
        ));
        self
    }

    /// Appends an already-built filter item at the top level.
    #[must_use]
    pub fn add_filter(mut self, item: impl Into<FilterItem>) -> Self {
        self.query.filters.push(item.into());
        self
    }

    /// Opens an isolated child group, populated by the closure, and
    /// appends it at the top level. Filters added inside the closure never
    /// leak into the parent scope.
    #[must_use]
    pub fn group(mut self, relation: Relation, f: impl FnOnce(FilterGroup) -> FilterGroup) -> Self {
        let group = f(FilterGroup::new(relation));
        self.query.filters.push(group.into_item());
        self
    }

    /// Appends a sort entry.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sorts.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Appends an ascending sort.
    #[must_use]
    pub fn sort_ascending(self, field: impl Into<String>) -> Self {
        self.sort(field, SortDirection::Ascending)
    }

    /// Appends a descending sort.
    #[must_use]
    pub fn sort_descending(self, field: impl Into<String>) -> Self {
        self.sort(field, SortDirection::Descending)
    }

    /// Sets the row window. The last call wins.
    #[must_use]
    pub fn limit(mut self, count: usize, offset: usize) -> Self {
        self.query.limit = Some(Limit::new(count, offset));
        self
    }

    /// Appends a JOIN clause.
    #[must_use]
    pub fn join(mut self, join: Join) -> Self {
        self.query.joins.push(join);
        self
    }

    /// Appends one column to the write payload, preserving call order.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.data.push((column.into(), value.into()));
        self
    }

    /// Yields the immutable query snapshot.
    #[must_use]
    pub fn build(self) -> Query {
        self.query
    }
}
