// File: src/errors.rs
//
// Error handling and reporting for go-flowuml.
// Syntax errors carry source location information and pretty-print like a
// compiler diagnostic. FlowError is the failure type of the whole pipeline:
// whenever one is returned, no document was produced.

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Source location information for tracking where code appears in a file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub file: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, file: None }
    }

    pub fn with_file(line: usize, column: usize, file: String) -> Self {
        Self { line, column, file: Some(file) }
    }

    pub fn unknown() -> Self {
        Self { line: 0, column: 0, file: None }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// A lexical or grammatical error in Go source, with location information
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub location: SourceLocation,
    pub source_line: Option<String>,
    pub help: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            source_line: None,
            help: None,
        }
    }

    pub fn with_source(mut self, source_line: String) -> Self {
        self.source_line = Some(source_line);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_file(mut self, file: String) -> Self {
        self.location.file = Some(file);
        self
    }

    /// Attaches the offending line of `source`, if the location points into it.
    pub fn with_source_from(self, source: &str) -> Self {
        let line = self.location.line;
        match source.lines().nth(line.saturating_sub(1)) {
            Some(text) if line > 0 => self.with_source(text.to_string()),
            _ => self,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}: {}", "Syntax Error".red().bold(), self.message.bold())?;

        let location_str = format!("  --> {}", self.location);
        writeln!(f, "{}", location_str.bright_blue())?;

        if let Some(ref source) = self.source_line {
            let line_num = self.location.line;
            let col_num = self.location.column;

            writeln!(f, "   {}", "|".bright_blue())?;
            writeln!(
                f,
                "{} {} {}",
                format!("{:3}", line_num).bright_blue(),
                "|".bright_blue(),
                source
            )?;
            writeln!(
                f,
                "   {} {}{}",
                "|".bright_blue(),
                " ".repeat(col_num.saturating_sub(1)),
                "^".red().bold()
            )?;
            writeln!(f, "   {}", "|".bright_blue())?;
        }

        if let Some(ref help) = self.help {
            writeln!(
                f,
                "   {} {}",
                "=".bright_yellow(),
                format!("help: {}", help).bright_yellow()
            )?;
        }

        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Fatal failures of the tree provider. None of them yields a partial document.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("function `{name}` not found{}", suggestion_hint(.suggestion))]
    FunctionNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("function name `{name}` is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousFunction { name: String, candidates: Vec<String> },

    #[error("function `{name}` is declared without a body")]
    MissingBody { name: String },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{}`?)", name),
        None => String::new(),
    }
}

/// Computes the Levenshtein distance between two strings
/// Used for "Did you mean?" suggestions
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    // Two rolling rows are enough
    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, a) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b) in s2_chars.iter().enumerate() {
            let cost = if a == b { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}

/// Find the closest match from a list of candidates using Levenshtein distance
/// Returns None if no good match is found (distance > 3)
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);
        if distance <= 3 && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate.as_str());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("f1", "f1"), 0);
        assert_eq!(levenshtein_distance("handle", "handler"), 1);
    }

    #[test]
    fn test_find_closest_match_prefers_smallest_distance() {
        let candidates = vec!["process".to_string(), "proceed".to_string(), "main".to_string()];
        assert_eq!(find_closest_match("proces", &candidates), Some("process"));
        assert_eq!(find_closest_match("unrelated", &candidates), None);
    }

    #[test]
    fn test_syntax_error_picks_source_line() {
        let source = "package main\nfunc f() {\n\treturn )\n}\n";
        let err = SyntaxError::new("unexpected `)`", SourceLocation::new(3, 9)).with_source_from(source);
        assert_eq!(err.source_line.as_deref(), Some("\treturn )"));

        let err = SyntaxError::new("eof", SourceLocation::new(42, 1)).with_source_from(source);
        assert_eq!(err.source_line, None);
    }

    #[test]
    fn test_flow_error_messages() {
        let err = FlowError::FunctionNotFound {
            name: "fo".to_string(),
            suggestion: Some("foo".to_string()),
        };
        assert_eq!(err.to_string(), "function `fo` not found (did you mean `foo`?)");

        let err = FlowError::FunctionNotFound { name: "fo".to_string(), suggestion: None };
        assert_eq!(err.to_string(), "function `fo` not found");

        let err = FlowError::AmbiguousFunction {
            name: "Close".to_string(),
            candidates: vec!["File.Close".to_string(), "Conn.Close".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "function name `Close` is ambiguous, candidates: File.Close, Conn.Close"
        );
    }
}
