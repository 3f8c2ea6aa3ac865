use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ordo")]
#[command(about = "Static complexity analyzer for strict pseudocode", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a pseudocode file and print the complexity report as JSON
    Analyze {
        /// Path to the pseudocode file, or `-` for stdin
        path: String,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a pseudocode file and print the AST as JSON
    Ast {
        /// Path to the pseudocode file, or `-` for stdin
        path: String,
    },
}
