//! Runs the ingest and codegen pipeline over the fixture payload so tests
//! exercise row types the generator actually emitted.

use sheetrow_codegen::{CodeGenerator, GenerateOptions};
use sheetrow_ingest::Ingestor;
use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

const FIXTURE: &str = "fixtures/balance.json";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed={FIXTURE}");

    let payload = fs::read_to_string(FIXTURE)?;
    let document = Ingestor::default().ingest(&payload)?;
    let source = CodeGenerator::new(GenerateOptions::default()).generate_inline(&document)?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join("balance.rs");
    fs::write(out, source)?;
    Ok(())
}
