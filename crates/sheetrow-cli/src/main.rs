//! `sheetrow`: ingest sheet payloads, generate row types, inspect documents

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sheetrow_codegen::{emit, CodeGenerator, DirectorySink, GenerateOptions};
use sheetrow_ingest::{template_grid, IngestConfig, Ingestor};
use sheetrow_model::{CellValue, Document};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Path argument meaning stdin or stdout
const STDIO: &str = "-";

fn cli() -> Command {
    Command::new("sheetrow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sheet payloads to typed Rust row types")
        .subcommand_required(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("ingest")
                .about("Normalize a payload into a document")
                .arg(payload_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("group")
                        .long("group")
                        .help("Group label for ingested tables"),
                )
                .arg(
                    Arg::new("sheet")
                        .long("sheet")
                        .action(ArgAction::Append)
                        .help("Only ingest this sheet (repeatable)"),
                )
                .arg(
                    Arg::new("range-name")
                        .long("range-name")
                        .help("Table name for a single-grid payload"),
                ),
        )
        .subcommand(
            Command::new("sheets")
                .about("List the sheets a payload carries")
                .arg(payload_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a row-type crate from a document")
                .arg(document_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Output crate directory"),
                )
                .arg(
                    Arg::new("namespace")
                        .long("namespace")
                        .help("Output namespace, used as the crate name"),
                )
                .arg(
                    Arg::new("table")
                        .long("table")
                        .action(ArgAction::Append)
                        .help("Only generate this table (repeatable)"),
                )
                .arg(
                    Arg::new("runtime-path")
                        .long("runtime-path")
                        .conflicts_with("runtime-version")
                        .help("Depend on a local sheetrow-runtime checkout"),
                )
                .arg(
                    Arg::new("runtime-version")
                        .long("runtime-version")
                        .help("Depend on this sheetrow-runtime version"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Summarize a document, or preview one table")
                .arg(document_arg())
                .arg(
                    Arg::new("table")
                        .long("table")
                        .help("Table to preview"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .default_value("20")
                        .value_parser(value_parser!(usize))
                        .help("Rows to preview"),
                ),
        )
        .subcommand(
            Command::new("template")
                .about("Print a starter payload for a new sheet")
                .arg(output_arg()),
        )
}

fn payload_arg() -> Arg {
    Arg::new("payload")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Payload JSON file, or - for stdin")
}

fn document_arg() -> Arg {
    Arg::new("document")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Document JSON file written by `ingest`")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_parser(value_parser!(PathBuf))
        .help("Output file (default: stdout)")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("ingest", args)) => ingest(args),
        Some(("sheets", args)) => sheets(args),
        Some(("generate", args)) => generate(args),
        Some(("inspect", args)) => inspect(args),
        Some(("template", args)) => template(args),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

fn ingest(args: &ArgMatches) -> Result<()> {
    let mut config = IngestConfig::new();
    if let Some(group) = args.get_one::<String>("group") {
        config = config.with_default_group(group);
    }
    if let Some(name) = args.get_one::<String>("range-name") {
        config = config.with_single_range_name(name);
    }
    if let Some(sheets) = args.get_many::<String>("sheet") {
        config = config.with_sheet_filter(sheets.cloned());
    }

    let payload = read_input(required_path(args, "payload")?)?;
    let document = Ingestor::new(config)
        .ingest(&payload)
        .context("failed to ingest payload")?;
    let json = document.to_json().context("failed to serialize document")?;
    write_output(args.get_one::<PathBuf>("output"), &json)
}

fn sheets(args: &ArgMatches) -> Result<()> {
    let payload = read_input(required_path(args, "payload")?)?;
    let names = Ingestor::default()
        .available_sheets(&payload)
        .context("failed to read payload")?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn generate(args: &ArgMatches) -> Result<()> {
    let document = read_document(required_path(args, "document")?)?;
    let out = required_path(args, "out")?;

    let mut options = GenerateOptions::new();
    if let Some(namespace) = args.get_one::<String>("namespace") {
        options = options.with_namespace(namespace);
    }
    if let Some(tables) = args.get_many::<String>("table") {
        options = options.with_table_filter(tables.cloned());
    }
    if let Some(path) = args.get_one::<String>("runtime-path") {
        options = options.with_runtime_path(path);
    }
    if let Some(version) = args.get_one::<String>("runtime-version") {
        options = options.with_runtime_version(version);
    }

    let units = CodeGenerator::new(options)
        .generate(&document)
        .context("failed to generate row types")?;
    let report = emit(&units, &mut DirectorySink::new(out))
        .with_context(|| format!("failed to write into {}", out.display()))?;

    info!(
        "Wrote {} units into {} ({} skipped)",
        report.written.len(),
        out.display(),
        report.skipped.len()
    );
    for path in &report.written {
        println!("wrote   {}", path.display());
    }
    for (path, reason) in &report.skipped {
        println!("skipped {} ({reason:?})", path.display());
    }
    Ok(())
}

fn inspect(args: &ArgMatches) -> Result<()> {
    let document = read_document(required_path(args, "document")?)?;
    let limit = args.get_one::<usize>("limit").copied().unwrap_or(20);

    let Some(name) = args.get_one::<String>("table") else {
        if let Some(at) = document.last_modified {
            println!("Last modified: {}", IngestConfig::default().format_timestamp(at));
        }
        println!("Groups: {}", document.groups.join(", "));
        for table in &document.tables {
            println!(
                "{:<24} group={:<12} columns={:<3} rows={}",
                table.name,
                table.group,
                table.width(),
                table.rows.len()
            );
        }
        return Ok(());
    };

    let table = document
        .table(name)
        .with_context(|| format!("no table named '{name}'"))?;
    println!(
        "{}",
        table
            .schema
            .iter()
            .map(|c| format!("{} ({})", c.name, c.field_type()))
            .collect::<Vec<_>>()
            .join(" | ")
    );
    for row in table.rows.iter().take(limit) {
        let cells: Vec<String> = table
            .schema
            .iter()
            .map(|c| row.get(&c.name).map(CellValue::display).unwrap_or_default())
            .collect();
        println!("{}", cells.join(" | "));
    }
    if table.rows.len() > limit {
        println!("... {} more rows", table.rows.len() - limit);
    }
    Ok(())
}

fn template(args: &ArgMatches) -> Result<()> {
    let payload = serde_json::json!({ "values": template_grid() });
    let text = serde_json::to_string_pretty(&payload).context("failed to render template")?;
    write_output(args.get_one::<PathBuf>("output"), &text)
}

fn required_path<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
        .with_context(|| format!("missing argument '{id}'"))
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIO {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_document(path: &Path) -> Result<Document> {
    let text = read_input(path)?;
    Document::from_json(&text).with_context(|| format!("{} is not a document", path.display()))
}

fn write_output(path: Option<&PathBuf>, text: &str) -> Result<()> {
    match path {
        Some(path) if path.as_os_str() != STDIO => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        _ => {
            println!("{text}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let matches = cli()
            .try_get_matches_from([
                "sheetrow", "generate", "doc.json", "--out", "gen", "--table", "Items", "--table",
                "Loot",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        let tables: Vec<&String> = args.get_many::<String>("table").unwrap().collect();
        assert_eq!(tables, ["Items", "Loot"]);
    }

    #[test]
    fn runtime_sources_conflict() {
        let result = cli().try_get_matches_from([
            "sheetrow",
            "generate",
            "doc.json",
            "--out",
            "gen",
            "--runtime-path",
            "../rt",
            "--runtime-version",
            "0.2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn ingest_then_generate_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("payload.json");
        let document = dir.path().join("document.json");
        let out = dir.path().join("generated");
        fs::write(
            &payload,
            r#"{"values":[["id","hp"],["string","int"],["E1","50"]]}"#,
        )
        .unwrap();

        let args = cli()
            .try_get_matches_from([
                "sheetrow",
                "ingest",
                payload.to_str().unwrap(),
                "--range-name",
                "Enemies",
                "-o",
                document.to_str().unwrap(),
            ])
            .unwrap();
        ingest(args.subcommand_matches("ingest").unwrap()).unwrap();

        let args = cli()
            .try_get_matches_from([
                "sheetrow",
                "generate",
                document.to_str().unwrap(),
                "--out",
                out.to_str().unwrap(),
            ])
            .unwrap();
        generate(args.subcommand_matches("generate").unwrap()).unwrap();

        let source = fs::read_to_string(out.join("src/enemies.rs")).unwrap();
        assert!(source.contains("pub hp: i32,"));
        assert!(out.join("Cargo.toml").exists());
    }
}
