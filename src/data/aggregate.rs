use super::model::{CellValue, Table};

/// Label for the distinguished missing-value group.
pub const MISSING_LABEL: &str = "(sin dato)";

/// Value-frequency counts for one column over the given rows, descending
/// by count, ties kept in first-seen order. Missing cells form their own
/// group rather than being dropped. Unknown columns yield no groups.
pub fn count_by(table: &Table, indices: &[usize], column: &str) -> Vec<(String, usize)> {
    let Some(col) = table.column_index(column) else {
        return Vec::new();
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for &i in indices {
        let label = match &table.rows[i][col] {
            CellValue::Missing => MISSING_LABEL.to_string(),
            cell => cell.to_string(),
        };
        match counts.iter_mut().find(|(value, _)| *value == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
