//! Starter grid for a new source sheet

use crate::envelope::{Grid, NamedRange};

/// Header, type and sample rows a new sheet starts with
#[must_use]
pub fn template_grid() -> Grid {
    [
        ["ID", "Name", "Type", "Description"],
        ["string", "string", "enum", "string"],
        ["ITEM_001", "Sample Item", "Weapon", "Add description here..."],
    ]
    .iter()
    .map(|row| row.iter().map(ToString::to_string).collect())
    .collect()
}

/// The template grid as a named range
#[must_use]
pub fn template_range(name: impl Into<String>) -> NamedRange {
    NamedRange {
        name: name.into(),
        grid: template_grid(),
    }
}
