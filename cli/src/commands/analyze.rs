use analysis::Analyzer;
use anyhow::{anyhow, Result};
use ordo_parser::parse_program;

use super::read_source;

pub fn analyze_file(path: &str, pretty: bool) -> Result<()> {
    let source = read_source(path)?;
    let program = parse_program(&source).map_err(|e| anyhow!("{e}"))?;
    let report = Analyzer::new().analyze(&program);

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
