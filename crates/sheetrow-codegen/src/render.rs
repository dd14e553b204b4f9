//! Source text rendering
//!
//! Generated sources carry only `//` comments and outer attributes so that a
//! build script can `include!` them. Runtime items are always referenced by
//! full path; generated files contain no `use` lines.

use crate::mapper::{TableMapping, RUNTIME};
use crate::options::GenerateOptions;

const HEADER: &str = "// Generated by sheetrow. Do not edit.\n";
const INDENT: &str = "    ";

/// Row type source for one table
#[must_use]
pub fn render_row(mapping: &TableMapping) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// Generated by sheetrow from table {:?}. Do not edit.\n\n",
        mapping.table
    ));

    out.push_str(&format!("/// Row of table `{}`\n", doc_text(&mapping.table)));
    out.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
    if mapping.fields.is_empty() {
        out.push_str(&format!("pub struct {} {{}}\n\n", mapping.type_name));
    } else {
        out.push_str(&format!("pub struct {} {{\n", mapping.type_name));
        for field in &mapping.fields {
            out.push_str(&format!(
                "    /// `{}` ({})\n    pub {}: {},\n",
                doc_text(&field.column),
                doc_text(&field.tag),
                field.field,
                field.rust_type()
            ));
        }
        out.push_str("}\n\n");
    }

    out.push_str(&format!(
        "impl {RUNTIME}::DataRow for {} {{\n",
        mapping.type_name
    ));
    out.push_str("    fn set_data(\n");
    out.push_str("        &mut self,\n");
    out.push_str(&format!("        raw: &{RUNTIME}::RowValues,\n"));
    out.push_str(&format!(
        "    ) -> ::core::result::Result<(), {RUNTIME}::FieldParseError> {{\n"
    ));
    if mapping.fields.is_empty() {
        out.push_str("        let _ = raw;\n");
    }
    for field in &mapping.fields {
        out.push_str(&format!(
            "        if let Some(value) = raw.get({:?}) {{\n",
            field.column
        ));
        out.push_str(&format!(
            "            self.{} = {RUNTIME}::cell::{}({:?}, value){};\n",
            field.field,
            field.parser(),
            field.column,
            if field.is_fallible() { "?" } else { "" }
        ));
        out.push_str("        }\n");
    }
    out.push_str("        Ok(())\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

/// Crate root declaring one module per row type plus the registry functions
#[must_use]
pub fn render_registry(mappings: &[TableMapping]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for mapping in mappings {
        out.push_str(&format!("pub mod {};\n", mapping.module));
    }
    out.push('\n');
    out.push_str(&render_reexports(mappings));
    out.push('\n');
    out.push_str(&render_bindings(mappings));
    out
}

/// Single include-able file with every row type in an inline module
#[must_use]
pub fn render_inline(mappings: &[TableMapping]) -> String {
    let mut out = String::from(HEADER);
    for mapping in mappings {
        out.push('\n');
        out.push_str(&format!("pub mod {} {{\n", mapping.module));
        for line in render_row(mapping).lines() {
            if !line.is_empty() {
                out.push_str(INDENT);
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push_str("}\n");
    }
    out.push('\n');
    out.push_str(&render_reexports(mappings));
    out.push('\n');
    out.push_str(&render_bindings(mappings));
    out
}

/// Package metadata for the generated crate
#[must_use]
pub fn render_manifest(options: &GenerateOptions) -> String {
    format!(
        "[package]\n\
         name = {:?}\n\
         version = \"0.1.0\"\n\
         edition = \"2021\"\n\
         publish = false\n\
         \n\
         [dependencies]\n\
         sheetrow-runtime = {}\n",
        options.crate_name(),
        options.runtime_dependency
    )
}

fn render_reexports(mappings: &[TableMapping]) -> String {
    mappings
        .iter()
        .map(|m| format!("pub use {}::{};\n", m.module, m.type_name))
        .collect()
}

fn render_bindings(mappings: &[TableMapping]) -> String {
    let mut out = String::new();
    out.push_str("/// Bind every generated row type to its source table\n");
    out.push_str(&format!(
        "pub fn register(registry: &mut {RUNTIME}::RowTypeRegistry) {{\n"
    ));
    for mapping in mappings {
        out.push_str(&format!(
            "    registry.register::<{}>({:?});\n",
            mapping.type_name, mapping.table
        ));
    }
    out.push_str("}\n\n");

    out.push_str("/// Registry holding every generated binding\n");
    out.push_str("#[must_use]\n");
    out.push_str(&format!(
        "pub fn registry() -> {RUNTIME}::RowTypeRegistry {{\n"
    ));
    out.push_str(&format!(
        "    let mut registry = {RUNTIME}::RowTypeRegistry::new();\n"
    ));
    out.push_str("    register(&mut registry);\n");
    out.push_str("    registry\n");
    out.push_str("}\n\n");

    out.push_str("/// Cache over `documents`, pre-warmed for every generated table\n");
    out.push_str(&format!(
        "pub fn init<I>(documents: I) -> ({RUNTIME}::MaterializationCache, {RUNTIME}::PrewarmReport)\n"
    ));
    out.push_str("where\n");
    out.push_str(&format!(
        "    I: ::core::iter::IntoIterator<Item = {RUNTIME}::Document>,\n"
    ));
    out.push_str("{\n");
    out.push_str(&format!(
        "    let mut cache = {RUNTIME}::MaterializationCache::new(registry());\n"
    ));
    out.push_str("    let report = cache.init(documents);\n");
    out.push_str("    (cache, report)\n");
    out.push_str("}\n");
    out
}

/// Text safe to place inside a one-line doc comment
fn doc_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
