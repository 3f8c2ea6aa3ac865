use anyhow::Result;
use clap::Parser;

mod args;
mod commands;

use args::{Cli, Commands};
use commands::{analyze, ast};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze { path, pretty } => analyze::analyze_file(path, *pretty),
        Commands::Ast { path } => ast::dump_ast(path),
    }
}
