use std::collections::BTreeMap;

use super::model::Table;

// ---------------------------------------------------------------------------
// Role – a semantic filter dimension
// ---------------------------------------------------------------------------

/// A semantic filter dimension resolved against the table's headers.
/// Source CSVs spell these columns inconsistently, so each role carries
/// an ordered list of accepted header variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Region,
    Comuna,
    Ciudad,
    Tipo,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Region, Role::Comuna, Role::Ciudad, Role::Tipo];

    /// Accepted header spellings, canonical form first.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Role::Region => &["Región", "Region", "REGIÓN", "REGION", "region"],
            Role::Comuna => &["Comuna", "COMUNA", "comuna"],
            Role::Ciudad => &["Ciudad", "CIUDAD", "ciudad"],
            Role::Tipo => &["Tipo", "TIPO", "tipo"],
        }
    }

    /// Label shown on the filter widget.
    pub fn label(self) -> &'static str {
        match self {
            Role::Region => "Región",
            Role::Comuna => "Comuna",
            Role::Ciudad => "Ciudad",
            Role::Tipo => "Tipo",
        }
    }
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// First candidate that exactly matches an existing (trimmed) header, in
/// candidate order. Matching is deliberately case-sensitive: the caller
/// supplies all accepted variants explicitly.
pub fn resolve<'c>(table: &Table, candidates: &[&'c str]) -> Option<&'c str> {
    candidates
        .iter()
        .copied()
        .find(|name| table.column_index(name).is_some())
}

/// First header containing `needle` case-insensitively. Looser fallback
/// for roles whose spelling varies beyond the candidate list.
pub fn resolve_containing<'t>(table: &'t Table, needle: &str) -> Option<&'t str> {
    let needle = needle.to_lowercase();
    table
        .headers
        .iter()
        .map(String::as_str)
        .find(|h| h.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// RoleBindings – resolved role → header mapping for one table
// ---------------------------------------------------------------------------

/// Which concrete header, if any, each role resolved to. An unbound role
/// is a normal state: its filter widget is simply omitted.
#[derive(Debug, Clone, Default)]
pub struct RoleBindings {
    bound: BTreeMap<Role, String>,
}

impl RoleBindings {
    /// Resolve every role against the table. `Tipo` additionally falls
    /// back to a case-insensitive contains-scan when no exact candidate
    /// is present.
    pub fn bind(table: &Table) -> Self {
        let mut bound = BTreeMap::new();
        for role in Role::ALL {
            let hit = resolve(table, role.candidates())
                .map(str::to_string)
                .or_else(|| match role {
                    Role::Tipo => resolve_containing(table, "tipo").map(str::to_string),
                    _ => None,
                });
            if let Some(header) = hit {
                bound.insert(role, header);
            }
        }
        RoleBindings { bound }
    }

    /// Header bound to `role`, if any.
    pub fn get(&self, role: Role) -> Option<&str> {
        self.bound.get(&role).map(String::as_str)
    }

    /// Bound roles in declaration order.
    pub fn bound_roles(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|h| (role, h)))
    }
}
