//! Ingest-to-disk generation tests

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheetrow_codegen::{
    emit, CodeGenerator, DirectorySink, GenerateOptions, SkipReason, SourceUnit, UnitKind,
    MANIFEST_PATH, REGISTRY_PATH,
};
use sheetrow_ingest::Ingestor;
use sheetrow_model::{Column, Document, Table};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const PAYLOAD: &str = r#"{
  "valueRanges": [
    {
      "range": "'Enemies'!A1:D4",
      "values": [
        ["id", "hp", "speed", "notes"],
        ["string", "int", "float", "fooType"],
        ["E1", "50", "1.5", "slow"],
        ["E2", "80", "2", "fast"]
      ]
    },
    {
      "range": "Items!A1:C3",
      "values": [
        ["ID", "price", "tags"],
        ["string", "int", "list_string"],
        ["P1", "10", "heal"],
        ["", "", "potion"]
      ]
    }
  ]
}"#;

fn generator() -> CodeGenerator {
    CodeGenerator::new(GenerateOptions::new().with_namespace("Balance"))
}

#[test]
fn generates_one_unit_per_table_plus_registry_and_manifest() {
    let document = Ingestor::default().ingest(PAYLOAD).unwrap();
    let units = generator().generate(&document).unwrap();

    let paths: Vec<PathBuf> = units.iter().map(|u| u.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("src/enemies.rs"),
            PathBuf::from("src/items.rs"),
            PathBuf::from("src/lib.rs"),
            PathBuf::from("Cargo.toml"),
        ]
    );

    let enemies = &units[0].contents;
    assert!(enemies.contains("pub speed: f32,"));
    assert!(enemies.contains("pub notes: String,"));
    let items = &units[1].contents;
    assert!(items.contains("pub tags: Vec<String>,"));
    assert!(items.contains("::sheetrow_runtime::cell::parse_list(\"tags\", value);"));
}

#[test]
fn regeneration_is_idempotent_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let document = Ingestor::default().ingest(PAYLOAD).unwrap();
    let mut sink = DirectorySink::new(dir.path());

    let first = emit(&generator().generate(&document).unwrap(), &mut sink).unwrap();
    assert_eq!(first.written.len(), 4);
    let snapshot = fs::read_to_string(dir.path().join("src/enemies.rs")).unwrap();

    fs::write(dir.path().join("Cargo.toml"), "# customized\n").unwrap();
    let second = emit(&generator().generate(&document).unwrap(), &mut sink).unwrap();

    assert_eq!(second.written.len(), 3);
    assert_eq!(
        second.skipped,
        vec![(PathBuf::from("Cargo.toml"), SkipReason::AlreadyExists)]
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/enemies.rs")).unwrap(),
        snapshot
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(),
        "# customized\n"
    );
}

#[test]
fn manifest_names_the_namespace() {
    let document = Ingestor::default().ingest(PAYLOAD).unwrap();
    let units = generator().generate(&document).unwrap();
    let manifest = &units.last().unwrap().contents;
    assert!(manifest.contains("name = \"balance\""));
    assert!(manifest.contains("sheetrow-runtime = \"0.1\""));
}

fn document(names: &[&str]) -> Document {
    let mut document = Document::new();
    for name in names {
        let mut table = Table::new(*name, "Default");
        table.schema.push(Column::new("id", "string"));
        document.push_table(table);
    }
    document
}

/// Crate layout problems: duplicate paths, row units on crate-root files,
/// and `pub mod` lines naming a root file or the runtime crate
fn layout_errors(units: &[SourceUnit]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for unit in units {
        if !seen.insert(&unit.path) {
            errors.push(format!("duplicate path {}", unit.path.display()));
        }
        if matches!(unit.kind, UnitKind::Row { .. })
            && ["src/lib.rs", "src/main.rs", "build.rs", REGISTRY_PATH, MANIFEST_PATH]
                .iter()
                .any(|reserved| unit.path == Path::new(reserved))
        {
            errors.push(format!("row unit at {}", unit.path.display()));
        }
    }
    if let Some(registry) = units.iter().find(|u| u.kind == UnitKind::Registry) {
        for module in ["lib", "main", "build", "sheetrow_runtime"] {
            if registry.contents.contains(&format!("pub mod {module};")) {
                errors.push(format!("registry declares module {module}"));
            }
        }
    }
    errors
}

#[test]
fn reserved_table_names_keep_the_crate_layout() {
    let units = generator()
        .generate(&document(&["Lib", "Main", "Sheetrow Runtime", "Build"]))
        .unwrap();
    assert_eq!(layout_errors(&units), Vec::<String>::new());

    let paths: Vec<PathBuf> = units.iter().map(|u| u.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("src/lib_row.rs"),
            PathBuf::from("src/main_row.rs"),
            PathBuf::from("src/sheetrow_runtime_row.rs"),
            PathBuf::from("src/build_row.rs"),
            PathBuf::from("src/lib.rs"),
            PathBuf::from("Cargo.toml"),
        ]
    );
    let registry = &units[4].contents;
    assert!(registry.contains("pub mod lib_row;\n"));
    assert!(registry.contains("pub use lib_row::Lib;\n"));
    assert!(registry.contains("pub use sheetrow_runtime_row::SheetrowRuntime;\n"));
    assert!(registry.contains("&mut ::sheetrow_runtime::RowTypeRegistry"));
}

#[test]
fn reserved_table_names_write_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    let units = generator().generate(&document(&["Lib", "Main"])).unwrap();
    emit(&units, &mut sink).unwrap();

    let lib = fs::read_to_string(dir.path().join("src/lib.rs")).unwrap();
    assert!(lib.contains("pub fn registry()"));
    assert!(!dir.path().join("src/main.rs").exists());
    assert!(fs::read_to_string(dir.path().join("src/lib_row.rs"))
        .unwrap()
        .contains("pub struct Lib {"));
}

proptest! {
    #[test]
    fn generated_layout_is_sound(names in proptest::collection::vec("[A-Za-z][A-Za-z _]{0,10}", 1..6)) {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        if let Ok(units) = generator().generate(&document(&refs)) {
            prop_assert_eq!(layout_errors(&units), Vec::<String>::new());
        }
    }
}
