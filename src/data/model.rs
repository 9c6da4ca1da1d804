use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::resolve::{Role, RoleBindings};

// ---------------------------------------------------------------------------
// CellValue – a single parsed cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as parsed from the CSV. Search and filtering
/// operate on the string form; `Missing` has no string form and never
/// matches a predicate. Stored in `BTreeSet` downstream so `CellValue`
/// must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Missing => Ok(()),
        }
    }
}

impl CellValue {
    /// String form used by the search and membership predicates.
    /// `None` for `Missing`: an absent cell matches nothing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the rectangular parsed CSV
// ---------------------------------------------------------------------------

/// Ordered headers plus rows of cells. Invariants: headers are unique
/// after trimming; every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Position of an exact (already-trimmed) header name.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Order-preserving row projection. Used by the exporter and anywhere
    /// an owned filtered result is needed.
    pub fn subset(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – one fetched table plus its derived indexes
// ---------------------------------------------------------------------------

/// A decoded table together with the read-only indexes built once per
/// fetch: resolved role bindings and, per bound role, the sorted set of
/// distinct non-missing values that drives the filter widgets.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub bindings: RoleBindings,
    pub role_values: BTreeMap<Role, BTreeSet<String>>,
}

impl Dataset {
    /// Resolve role bindings and collect the per-role value sets.
    pub fn from_table(table: Table) -> Self {
        let bindings = RoleBindings::bind(&table);
        let mut role_values = BTreeMap::new();

        for role in Role::ALL {
            let Some(col) = bindings.get(role).and_then(|h| table.column_index(h)) else {
                continue;
            };
            let values: BTreeSet<String> = table
                .rows
                .iter()
                .filter_map(|row| row[col].as_text())
                .collect();
            role_values.insert(role, values);
        }

        Dataset {
            table,
            bindings,
            role_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            headers: vec!["Región".into(), "Comuna".into(), "Teléfono".into()],
            rows: vec![
                vec![
                    CellValue::Text("Metropolitana".into()),
                    CellValue::Text("Santiago".into()),
                    CellValue::Integer(22_334_455),
                ],
                vec![
                    CellValue::Text("Valparaíso".into()),
                    CellValue::Text("Viña del Mar".into()),
                    CellValue::Missing,
                ],
            ],
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(CellValue::Text("Santiago".into()).to_string(), "Santiago");
        assert_eq!(CellValue::Integer(42).to_string(), "42");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Missing.to_string(), "");
    }

    #[test]
    fn missing_has_no_text_form() {
        assert_eq!(CellValue::Missing.as_text(), None);
        assert_eq!(CellValue::Integer(7).as_text(), Some("7".to_string()));
    }

    #[test]
    fn column_index_is_exact() {
        let t = table();
        assert_eq!(t.column_index("Comuna"), Some(1));
        assert_eq!(t.column_index("comuna"), None);
    }

    #[test]
    fn subset_preserves_headers_and_order() {
        let t = table();
        let s = t.subset(&[1, 0]);
        assert_eq!(s.headers, t.headers);
        assert_eq!(s.rows[0], t.rows[1]);
        assert_eq!(s.rows[1], t.rows[0]);

        let empty = t.subset(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.headers, t.headers);
    }

    #[test]
    fn dataset_collects_role_values_without_missing() {
        let ds = Dataset::from_table(table());
        let regions = ds.role_values.get(&Role::Region).unwrap();
        assert_eq!(regions.len(), 2);
        assert!(regions.contains("Metropolitana"));
        assert!(regions.contains("Valparaíso"));
        // Teléfono is not a role column; Ciudad and Tipo are unbound.
        assert!(!ds.role_values.contains_key(&Role::Ciudad));
        assert!(!ds.role_values.contains_key(&Role::Tipo));
    }
}
