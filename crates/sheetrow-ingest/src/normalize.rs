//! Grid normalization
//!
//! Turns one named range into a [`Table`]. Row 0 names the columns, row 1
//! tags their types, and rows from index 2 on are data. A data row whose first
//! cell is empty, or repeats the id of the row before it, continues the open
//! logical row instead of starting a new one: each of its cells (or the last
//! non-empty value seen in that column, when the cell is blank) is appended to
//! the logical row's value as one more item.

use crate::envelope::NamedRange;
use sheetrow_model::{CellValue, Column, FieldType, Row, Table};

/// Build a table from a named range
///
/// Returns `None` when the range lacks the header and type rows.
#[must_use]
pub fn normalize_range(range: &NamedRange, group: &str) -> Option<Table> {
    let grid = &range.grid;
    if grid.len() < 2 {
        tracing::debug!("range '{}' has no type row, skipping", range.name);
        return None;
    }

    let (names, types) = (&grid[0], &grid[1]);
    let mut table = Table::new(&range.name, group);
    table.schema = names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let tag = types
                .get(col)
                .cloned()
                .unwrap_or_else(|| FieldType::String.tag());
            Column::new(name.clone(), tag)
        })
        .collect();

    let columns: Vec<String> = table.schema.iter().map(|c| c.name.clone()).collect();
    let mut last_id = String::new();
    let mut last_values = vec![String::new(); columns.len()];

    for cells in &grid[2..] {
        let Some(id) = cells.first() else {
            continue;
        };

        if !id.is_empty() && *id != last_id {
            let mut row = Row::new(id.clone());
            for (col, name) in columns.iter().enumerate() {
                let value = cells.get(col).cloned().unwrap_or_default();
                last_values[col].clone_from(&value);
                row.values.insert(name.clone(), CellValue::Single(value));
            }
            table.rows.push(row);
            last_id.clone_from(id);
        } else if let Some(row) = table.rows.last_mut() {
            for (col, name) in columns.iter().enumerate() {
                if let Some(value) = cells.get(col).filter(|v| !v.is_empty()) {
                    last_values[col].clone_from(value);
                }
                row.values
                    .entry(name.clone())
                    .or_default()
                    .push(last_values[col].clone());
            }
        }
    }

    Some(table)
}
