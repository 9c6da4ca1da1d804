use std::collections::{BTreeMap, BTreeSet};

use super::model::Table;
use super::resolve::{Role, RoleBindings};

// ---------------------------------------------------------------------------
// FilterSpec – the complete set of active constraints
// ---------------------------------------------------------------------------

/// One filtering operation's constraints: a global free-text query plus,
/// per role, the set of accepted values. An empty query and empty sets
/// constrain nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub query: String,
    pub selected: BTreeMap<Role, BTreeSet<String>>,
}

impl FilterSpec {
    /// Whether no constraint is active at all.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.selected.values().all(BTreeSet::is_empty)
    }

    /// Add `value` to the role's accepted set, or remove it if present.
    pub fn toggle(&mut self, role: Role, value: &str) {
        let accepted = self.selected.entry(role).or_default();
        if !accepted.remove(value) {
            accepted.insert(value.to_string());
        }
    }

    /// Drop every accepted value for `role` (back to "no constraint").
    pub fn clear_role(&mut self, role: Role) {
        self.selected.remove(&role);
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Indices of rows satisfying the query and every active role constraint,
/// in source order. A row passes the free-text predicate when any cell's
/// string form, lower-cased, contains the lower-cased trimmed query; it
/// passes a role constraint when its value in the bound column is a member
/// of the accepted set. Missing cells match nothing. The source table is
/// never mutated; callers materialise an owned result via
/// [`Table::subset`] when they need one.
pub fn apply(table: &Table, bindings: &RoleBindings, spec: &FilterSpec) -> Vec<usize> {
    let query = spec.query.trim().to_lowercase();

    // Resolve active constraints to column indices up front. Roles without
    // a bound column or with nothing selected impose no constraint.
    let constraints: Vec<(usize, &BTreeSet<String>)> = spec
        .selected
        .iter()
        .filter(|(_, accepted)| !accepted.is_empty())
        .filter_map(|(role, accepted)| {
            let col = bindings.get(*role).and_then(|h| table.column_index(h))?;
            Some((col, accepted))
        })
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let text_hit = query.is_empty()
                || row.iter().any(|cell| {
                    cell.as_text()
                        .is_some_and(|t| t.to_lowercase().contains(&query))
                });
            text_hit
                && constraints.iter().all(|(col, accepted)| {
                    row[*col].as_text().is_some_and(|t| accepted.contains(&t))
                })
        })
        .map(|(i, _)| i)
        .collect()
}
