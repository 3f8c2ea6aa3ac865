use anyhow::{anyhow, Result};
use ordo_parser::parse_program;

use super::read_source;

pub fn dump_ast(path: &str) -> Result<()> {
    let source = read_source(path)?;
    let program = parse_program(&source).map_err(|e| anyhow!("{e}"))?;
    println!("{}", serde_json::to_string_pretty(&program)?);
    Ok(())
}
