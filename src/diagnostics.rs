// File: src/diagnostics.rs
//
// Reporting of constructs the translator skips. A skipped construct never
// stops a translation; it renders as nothing and is handed to a sink chosen
// by the caller.

use crate::errors::SourceLocation;
use std::fmt;

/// The slot an unsupported node occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Statement,
    Expression,
    DeclSpec,
    Branch,
    Callee,
    SelectorBase,
    CompositeType,
    ExprStatement,
    /// Initializer or post statement of a `for` header
    LoopClause,
    SwitchInit,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Construct::Statement => "statement",
            Construct::Expression => "expression",
            Construct::DeclSpec => "declaration spec",
            Construct::Branch => "branch statement",
            Construct::Callee => "function expression",
            Construct::SelectorBase => "selector base",
            Construct::CompositeType => "composite literal type",
            Construct::ExprStatement => "expression statement",
            Construct::LoopClause => "loop clause",
            Construct::SwitchInit => "switch initializer",
        };
        f.write_str(text)
    }
}

/// One skipped construct
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub construct: Construct,
    /// Node kind name, such as `GoStmt` or `FuncLit`
    pub kind: String,
    /// Location of the statement the construct appeared in
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn new(construct: Construct, kind: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic { construct, kind: kind.into(), location }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported {}: {} at {}", self.construct, self.kind, self.location)
    }
}

/// Receiver of skipped-construct reports
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics, mostly for inspection in tests
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to `tracing` at warn level
#[derive(Debug, Default)]
pub struct LogSink {
    reported: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of diagnostics seen so far
    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported += 1;
        tracing::warn!(
            construct = %diagnostic.construct,
            kind = %diagnostic.kind,
            location = %diagnostic.location,
            "skipping unsupported construct"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(Construct::Statement, "GoStmt", SourceLocation::new(12, 2));
        assert_eq!(diagnostic.to_string(), "unsupported statement: GoStmt at 12:2");

        let diagnostic = Diagnostic::new(
            Construct::CompositeType,
            "MapType",
            SourceLocation::with_file(3, 5, "main.go".to_string()),
        );
        assert_eq!(
            diagnostic.to_string(),
            "unsupported composite literal type: MapType at main.go:3:5"
        );
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::new(Construct::Branch, "goto", SourceLocation::new(1, 1)));
        sink.report(Diagnostic::new(Construct::Expression, "FuncLit", SourceLocation::new(2, 1)));
        let kinds: Vec<&str> = sink.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, vec!["goto", "FuncLit"]);
    }

    #[test]
    fn test_log_sink_counts() {
        let mut sink = LogSink::new();
        sink.report(Diagnostic::new(Construct::Statement, "SelectStmt", SourceLocation::new(4, 1)));
        assert_eq!(sink.reported(), 1);
    }
}
