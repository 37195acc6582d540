// File: src/source.rs
//
// Tree provider: loads a Go file, parses it, and hands out the body of a
// requested function as an ordered statement list.

use crate::ast::{FuncDecl, SourceFile, Stmt};
use crate::errors::{find_closest_match, FlowError};
use crate::parser::parse_source;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed Go source file
#[derive(Debug, Clone)]
pub struct GoSource {
    /// Where the text came from, if it was read from disk
    pub path: Option<PathBuf>,
    pub file: SourceFile,
}

impl GoSource {
    /// Reads and parses a file. Syntax errors point into the file by name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FlowError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file = parse_source(&text).map_err(|err| {
            err.with_source_from(&text).with_file(path.display().to_string())
        })?;
        tracing::debug!(path = %path.display(), functions = file.functions().count(), "parsed Go source");

        Ok(GoSource { path: Some(path.to_path_buf()), file })
    }

    /// Parses source text that did not come from a file
    pub fn parse(text: &str) -> Result<Self, FlowError> {
        let file = parse_source(text).map_err(|err| err.with_source_from(text))?;
        tracing::debug!(functions = file.functions().count(), "parsed Go source");
        Ok(GoSource { path: None, file })
    }

    /// Names of all declared functions, methods qualified as `Type.method`
    pub fn function_names(&self) -> Vec<String> {
        self.file.functions().map(FuncDecl::qualified_name).collect()
    }

    /// Finds the declaration named `name` and returns its body.
    ///
    /// A plain name matches functions and methods alike; `Type.method`
    /// only matches the method declared on `Type`.
    pub fn function(&self, name: &str) -> Result<&[Stmt], FlowError> {
        let matches: Vec<&FuncDecl> = self
            .file
            .functions()
            .filter(|func| match name.split_once('.') {
                Some((receiver, method)) => {
                    func.name == method && func.receiver.as_deref() == Some(receiver)
                }
                None => func.name == name,
            })
            .collect();

        match matches.as_slice() {
            [] => {
                let names = self.function_names();
                Err(FlowError::FunctionNotFound {
                    name: name.to_string(),
                    suggestion: find_closest_match(name, &names).map(str::to_string),
                })
            }
            [func] => func.body.as_deref().ok_or_else(|| FlowError::MissingBody {
                name: func.qualified_name(),
            }),
            _ => Err(FlowError::AmbiguousFunction {
                name: name.to_string(),
                candidates: matches.iter().map(|func| func.qualified_name()).collect(),
            }),
        }
    }
}
