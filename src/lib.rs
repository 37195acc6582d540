// File: src/lib.rs
//
// Library interface for go-flowuml.
// Exposes the Go front end, the tree provider and the diagram translator
// for the command-line tool and for integration testing.

pub mod ast;
pub mod diagnostics;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod translator;

use diagnostics::DiagnosticSink;
use errors::FlowError;
use source::GoSource;
use std::path::Path;

/// Renders function `name` of the Go file at `path` as a PlantUML activity diagram.
///
/// Skipped constructs go to `sink`. Any error means no document was produced.
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    name: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<String, FlowError> {
    let source = GoSource::load(path)?;
    let body = source.function(name)?;
    Ok(translator::translate_function(name, body, sink))
}

/// Same as [`analyze_file`], for source text already in memory
pub fn analyze_source(text: &str, name: &str, sink: &mut dyn DiagnosticSink) -> Result<String, FlowError> {
    let source = GoSource::parse(text)?;
    let body = source.function(name)?;
    Ok(translator::translate_function(name, body, sink))
}
