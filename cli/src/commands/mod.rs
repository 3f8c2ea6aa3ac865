pub mod analyze;
pub mod ast;

use anyhow::{Context, Result};
use std::io::Read;

/// Read the input source: a file path, or stdin when the path is `-`.
pub fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
    }
}
