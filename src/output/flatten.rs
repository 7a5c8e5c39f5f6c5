//! Flattening of nested result items into tabular rows.

use serde_json::{Map, Value};
use tracing::warn;

/// Separator between parent and child keys of nested objects.
pub const KEY_SEPARATOR: char = '.';

/// Flattens one item into `(column, cell)` pairs in key order.
///
/// Nested objects become dotted columns (`image.height`). Strings are written
/// as-is, numbers and booleans as their JSON text, `null` as an empty cell,
/// and arrays as compact JSON. An empty nested object yields no columns.
#[must_use]
pub fn flatten_item(item: &Map<String, Value>) -> Vec<(String, String)> {
    let mut row = Vec::new();
    flatten_into(None, item, &mut row);
    row
}

fn flatten_into(prefix: Option<&str>, map: &Map<String, Value>, row: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let column = match prefix {
            Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) => flatten_into(Some(&column), child, row),
            other => row.push((column, cell_text(other))),
        }
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Flattened items sharing one header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Ordered union of columns, in first-seen order.
    pub header: Vec<String>,
    /// One row per item, aligned with `header`; absent columns are empty.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Flattens `items` and aligns every row to the union of their columns.
    #[must_use]
    pub fn from_items(items: &[Map<String, Value>]) -> Self {
        let flattened: Vec<Vec<(String, String)>> = items.iter().map(flatten_item).collect();

        let mut header: Vec<String> = Vec::new();
        for row in &flattened {
            for (column, _) in row {
                if !header.contains(column) {
                    header.push(column.clone());
                }
            }
        }

        let rows = flattened
            .into_iter()
            .enumerate()
            .map(|(row_index, row)| {
                let mut cells = vec![String::new(); header.len()];
                let mut filled = vec![false; header.len()];
                for (column, value) in row {
                    let Some(index) = header.iter().position(|h| *h == column) else {
                        continue;
                    };
                    if filled[index] {
                        warn!(
                            row = row_index,
                            column = %column,
                            dropped = %cells[index],
                            "flattened key collides with an existing column; keeping the later value"
                        );
                    }
                    cells[index] = value;
                    filled[index] = true;
                }
                cells
            })
            .collect();

        Self { header, rows }
    }

    /// Returns `true` when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
