//! Naming conventions that bind record types to tables.
//!
//! An [`Entity`] is anything with a stable singular name; every other
//! identifier (table, id column, foreign-key column, pivot table) derives
//! from it by convention, with per-type overrides available on the trait.

use ferrite_core::{OrmError, OrmResult};

use crate::fields::IdKind;
use crate::query::compiler::{Join, Query};
use crate::query::filter::{Comparison, FieldRef, FilterItem, QueryFilter};
use crate::value::Value;

/// A record type with conventional table and key names.
pub trait Entity {
    /// The singular, snake_case name of the entity.
    fn name() -> String;

    /// The table name: the entity name pluralized with a trailing `s`.
    fn table() -> String {
        format!("{}s", Self::name())
    }

    /// The primary-key column name.
    fn id_key() -> String {
        "id".to_string()
    }

    /// The primary-key kind, used when generating schema for the entity.
    fn id_kind() -> IdKind {
        IdKind::Int
    }

    /// The column name other tables use to reference this entity.
    fn foreign_id_key() -> String {
        format!("{}_{}", Self::name(), Self::id_key())
    }
}

/// Returns the pivot-table name for a pair of entities.
///
/// The two names are ordered lexicographically before joining, so both
/// sides of a many-to-many relation agree on the same table.
pub fn pivot_table(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}_{b}")
    } else {
        format!("{b}_{a}")
    }
}

/// Builds the query that fetches the `Related` rows attached to one
/// `Owner` row through their pivot table.
///
/// # Errors
///
/// Returns [`OrmError::MissingIdentifier`] when the owner id is null; an
/// unsaved row has no identity to look up relations for.
pub fn related_query<Owner: Entity, Related: Entity>(
    owner_id: impl Into<Value>,
) -> OrmResult<Query> {
    let owner_id = owner_id.into();
    if owner_id.is_null() {
        return Err(OrmError::MissingIdentifier(format!(
            "{}.{}",
            Owner::table(),
            Owner::id_key()
        )));
    }

    let pivot = pivot_table(&Owner::name(), &Related::name());
    let mut query = Query::new(Related::table());
    query.joins.push(Join::new(
        Related::table(),
        Related::id_key(),
        pivot.clone(),
        Related::foreign_id_key(),
    ));
    query.filters.push(FilterItem::Single(QueryFilter::new(
        FieldRef::qualified(pivot, Owner::foreign_id_key()),
        Comparison::Equals,
        owner_id,
    )));
    Ok(query)
}
