//! Type mapping from tables to Rust row types
//!
//! Every column maps to exactly one field. Field types follow the column's
//! [`FieldType`]; unknown tags were already folded into `String` by the model.

use sheetrow_model::{naming, FieldType, Table};
use std::collections::HashSet;

/// Path prefix generated code uses for runtime items
pub const RUNTIME: &str = "::sheetrow_runtime";

/// Suffix appended to a module name that is reserved in the generated crate
pub const MODULE_SUFFIX: &str = "_row";

/// Module names a row type cannot take: crate-root files and the runtime crate
const RESERVED_MODULES: &[&str] = &[
    "lib",
    "main",
    "build",
    "sheetrow_runtime",
    "std",
    "core",
    "alloc",
];

/// One generated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Column name as authored; the key `set_data` reads
    pub column: String,
    /// Type tag as authored
    pub tag: String,
    /// Rust field identifier
    pub field: String,
    /// Semantic type
    pub field_type: FieldType,
}

impl FieldMapping {
    /// Rust type of the field
    #[must_use]
    pub fn rust_type(&self) -> String {
        rust_type(&self.field_type)
    }

    /// Runtime parser function the field is read with
    #[must_use]
    pub fn parser(&self) -> &'static str {
        if self.field_type.is_list() {
            "parse_list"
        } else {
            "parse"
        }
    }

    /// Whether the parser can fail and its result needs `?`
    #[inline]
    #[must_use]
    pub fn is_fallible(&self) -> bool {
        !self.field_type.is_list()
    }
}

/// One generated row type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping {
    /// Source table name
    pub table: String,
    /// Rust type identifier
    pub type_name: String,
    /// Rust module holding the type
    pub module: String,
    /// Fields in schema order
    pub fields: Vec<FieldMapping>,
}

impl TableMapping {
    /// Map a table's schema
    ///
    /// Field identifiers that collide after sanitizing get a numeric suffix
    /// (`name`, `name_2`, ...), in schema order.
    #[must_use]
    pub fn of(table: &Table) -> Self {
        let type_name = naming::type_name(&table.name);
        let mut taken = HashSet::new();
        let fields = table
            .schema
            .iter()
            .map(|column| {
                let base = naming::field_name(&column.name);
                let mut field = base.clone();
                let mut suffix = 2;
                while !taken.insert(field.clone()) {
                    field = format!("{base}_{suffix}");
                    suffix += 1;
                }
                FieldMapping {
                    column: column.name.clone(),
                    tag: column.type_tag.clone(),
                    field,
                    field_type: column.field_type(),
                }
            })
            .collect();

        Self {
            table: table.name.clone(),
            module: module_name(&type_name),
            type_name,
            fields,
        }
    }
}

/// Module for a row type, suffixed when the plain name is reserved
///
/// `Lib` maps to `lib_row` so that it never lands on the crate root.
#[must_use]
pub fn module_name(type_name: &str) -> String {
    let mut module = naming::module_name(type_name);
    if RESERVED_MODULES.contains(&module.as_str()) {
        module.push_str(MODULE_SUFFIX);
    }
    module
}

/// Rust type for a semantic type
#[must_use]
pub fn rust_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::String => "String".to_string(),
        FieldType::Int => "i32".to_string(),
        FieldType::Float => "f32".to_string(),
        FieldType::Bool => "bool".to_string(),
        FieldType::Vector2 => format!("{RUNTIME}::Vector2"),
        FieldType::Vector3 => format!("{RUNTIME}::Vector3"),
        FieldType::Color => format!("{RUNTIME}::Color"),
        FieldType::List(element) => format!("Vec<{}>", rust_type(element)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use sheetrow_model::Column;

    fn table(columns: &[(&str, &str)]) -> Table {
        let mut table = Table::new("Enemy Stats", "Default");
        table.schema = columns.iter().map(|(n, t)| Column::new(*n, *t)).collect();
        table
    }

    #[test]
    fn maps_every_tag() {
        let cases = [
            ("string", "String"),
            ("INT", "i32"),
            ("Float", "f32"),
            ("bool", "bool"),
            ("vector2", "::sheetrow_runtime::Vector2"),
            ("vector3", "::sheetrow_runtime::Vector3"),
            ("color", "::sheetrow_runtime::Color"),
            ("list_int", "Vec<i32>"),
            ("list_color", "Vec<::sheetrow_runtime::Color>"),
            ("list_mystery", "Vec<String>"),
            ("fooType", "String"),
            ("", "String"),
        ];
        for (tag, expected) in cases {
            assert_eq!(rust_type(&FieldType::from_tag(tag)), expected, "tag {tag:?}");
        }
    }

    #[test]
    fn table_names() {
        let mapping = TableMapping::of(&table(&[]));
        assert_eq!(mapping.type_name, "EnemyStats");
        assert_eq!(mapping.module, "enemy_stats");
        assert!(mapping.fields.is_empty());
    }

    #[test]
    fn reserved_modules_are_suffixed() {
        assert_eq!(module_name("Lib"), "lib_row");
        assert_eq!(module_name("Main"), "main_row");
        assert_eq!(module_name("SheetrowRuntime"), "sheetrow_runtime_row");
        assert_eq!(module_name("Library"), "library");
    }

    #[test]
    fn fields_are_deduplicated() {
        let mapping = TableMapping::of(&table(&[
            ("Name", "string"),
            ("name", "string"),
            ("NAME", "int"),
        ]));
        let fields: Vec<&str> = mapping.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "name_2", "name_3"]);
        assert_eq!(mapping.fields[2].column, "NAME");
        assert_eq!(mapping.fields[2].rust_type(), "i32");
    }

    #[test]
    fn list_fields_use_list_parser() {
        let mapping = TableMapping::of(&table(&[("drops", "list_string"), ("hp", "int")]));
        assert_eq!(mapping.fields[0].parser(), "parse_list");
        assert!(!mapping.fields[0].is_fallible());
        assert_eq!(mapping.fields[1].parser(), "parse");
        assert!(mapping.fields[1].is_fallible());
    }

    proptest! {
        #[test]
        fn field_identifiers_are_unique(names in proptest::collection::vec("[A-Za-z _]{0,8}", 0..12)) {
            let columns: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "string")).collect();
            let mapping = TableMapping::of(&table(&columns));
            let unique: HashSet<&str> = mapping.fields.iter().map(|f| f.field.as_str()).collect();
            prop_assert_eq!(unique.len(), names.len());
        }
    }
}
