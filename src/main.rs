// File: src/main.rs
//
// Command-line entry point for go-flowuml.
// Parses the arguments, renders the requested function and prints the
// PlantUML document to stdout. Errors go to stderr with exit status 1.

use clap::Parser as ClapParser;
use go_flowuml::diagnostics::LogSink;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(
    name = "go-flowuml",
    about = "Render the control flow of a Go function as a PlantUML activity diagram",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None,
    arg_required_else_help = true
)]
struct Cli {
    /// Path to the .go file
    file: PathBuf,

    /// Function to render; use `Type.method` to pick a method
    function: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut sink = LogSink::new();
    match go_flowuml::analyze_file(&cli.file, &cli.function, &mut sink) {
        Ok(document) => {
            print!("{}", document);
            if sink.reported() > 0 {
                tracing::debug!(skipped = sink.reported(), "document rendered with skipped constructs");
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
