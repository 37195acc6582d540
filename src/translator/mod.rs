// File: src/translator/mod.rs
//
// Translation of a Go function body into a PlantUML activity diagram.
//
// The translator walks the statement list depth-first and appends one
// fragment per node to its own Document. Statement handling lives in
// statements.rs and expression rendering in expressions.rs; both are
// methods on Translator so they share the document and the sink.
//
// Constructs outside the supported subset render as nothing. Each one is
// handed to the DiagnosticSink and the walk carries on with the next node.

mod document;
mod expressions;
mod statements;

pub use document::Document;

use crate::ast::Stmt;
use crate::diagnostics::{Construct, Diagnostic, DiagnosticSink};
use crate::errors::SourceLocation;

/// State of one in-progress translation
pub struct Translator<'s> {
    doc: Document,
    sink: &'s mut dyn DiagnosticSink,
    /// Location of the statement being translated, attached to diagnostics
    location: SourceLocation,
}

impl<'s> Translator<'s> {
    /// Starts a translation; the document header is written immediately
    pub fn new(entry_label: &str, sink: &'s mut dyn DiagnosticSink) -> Self {
        tracing::debug!(function = entry_label, "translating function");
        Translator {
            doc: Document::begin(entry_label),
            sink,
            location: SourceLocation::unknown(),
        }
    }

    /// Translates statements in order, recursing into nested blocks
    pub fn translate_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.translate_stmt(stmt);
        }
    }

    /// Closes the document and returns its text
    pub fn finish(self) -> String {
        self.doc.finish()
    }

    fn report(&mut self, construct: Construct, kind: &str) {
        self.sink.report(Diagnostic::new(construct, kind, self.location.clone()));
    }
}

/// Renders `body` as a complete activity diagram labeled `entry_label`
pub fn translate_function(entry_label: &str, body: &[Stmt], sink: &mut dyn DiagnosticSink) -> String {
    let mut translator = Translator::new(entry_label, sink);
    translator.translate_block(body);
    translator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GoSource;

    /// Translates the body of `f` and returns the lines between the entry action and `@enduml`
    fn fragments(body: &str) -> (Vec<String>, Vec<Diagnostic>) {
        let text = format!("package p\n\nfunc f() {{\n{}\n}}\n", body);
        let source = GoSource::parse(&text).expect("parse failed");
        let stmts = source.function("f").expect("function f");
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let doc = translate_function("f", stmts, &mut diagnostics);
        let lines: Vec<String> = doc.lines().map(str::to_string).collect();
        assert_eq!(lines[..3], ["@startuml", "start", ":f;"]);
        assert_eq!(lines.last().map(String::as_str), Some("@enduml"));
        (lines[3..lines.len() - 1].to_vec(), diagnostics)
    }

    fn lines(body: &str) -> Vec<String> {
        let (lines, diagnostics) = fragments(body);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
        lines
    }

    #[test]
    fn test_assignment_forms() {
        assert_eq!(
            lines("a, b := f2(1)\nx += 2\ny = <-ch\np = *ptr"),
            vec![":a, b := f2(1);", ":x += 2;", ":y = <-ch;", ":p = *ptr;"]
        );
    }

    #[test]
    fn test_declarations_pair_names_with_values() {
        assert_eq!(
            lines("var c int\nvar a, b = 1, 2\nvar x, y int = 7\nconst k = \"v\""),
            vec![":c int;", ":a = 1;", ":b = 2;", ":x int = 7;", ":y int = 7;", ":k = \"v\";"]
        );
    }

    #[test]
    fn test_type_declaration_is_reported() {
        let (lines, diagnostics) = fragments("type alias = int\nx++");
        assert_eq!(lines, vec![":x++;"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].construct, Construct::DeclSpec);
        assert_eq!(diagnostics[0].kind, "TypeSpec");
        assert_eq!(diagnostics[0].location, SourceLocation::new(4, 1));
    }

    #[test]
    fn test_return_forms() {
        assert_eq!(
            lines("return\nreturn a, b"),
            vec![":return ;", "end", ":return a, b;", "end"]
        );
    }

    #[test]
    fn test_if_initializer_is_a_pre_line() {
        assert_eq!(
            lines("if err := run(); err != nil {\n\treturn err\n}"),
            vec![":err := run();", "if (err != nil) then (yes)", ":return err;", "end", "endif"]
        );
    }

    #[test]
    fn test_else_if_initializer_follows_else() {
        assert_eq!(
            lines("if a {\n} else if v := g(); v {\n\tdone()\n}"),
            vec![
                "if (a) then (yes)",
                "else",
                ":v := g();",
                "if (v) then (yes)",
                ":done();",
                "endif",
                "endif",
            ]
        );
    }

    #[test]
    fn test_switch_initializer_is_skipped() {
        let (lines, diagnostics) = fragments("switch x := next(); x {\ncase 1, 2:\n\tone()\n}");
        assert_eq!(
            lines,
            vec!["switch (x)", "case (1)", "case (2)", ":one();", "case ()", "endswitch"]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].construct, Construct::SwitchInit);
        assert_eq!(diagnostics[0].kind, "AssignStmt");
        assert_eq!(diagnostics[0].location, SourceLocation::new(4, 1));
    }

    #[test]
    fn test_switch_with_default_has_no_sentinel() {
        assert_eq!(
            lines("switch {\ndefault:\n}"),
            vec!["switch ()", "case (default)", "endswitch"]
        );
    }

    #[test]
    fn test_loop_headers() {
        assert_eq!(
            lines("for ; i < 10; {\n}\nfor x {\n}\nfor i = 0; ; i += 2 {\n}\nfor k := range m {\n}"),
            vec![
                "while (for ; i < 10; )",
                "endwhile",
                "while (for ; x; )",
                "endwhile",
                "while (for i = 0; ; i += 2)",
                "endwhile",
                "while (range m)",
                "endwhile",
            ]
        );
    }

    #[test]
    fn test_branches() {
        assert_eq!(
            lines("for {\n\tcontinue\n\tbreak\n}"),
            vec!["while (for)", ":continue;", "stop", ":break;", "break", "endwhile"]
        );
    }

    #[test]
    fn test_goto_is_reported() {
        let (lines, diagnostics) = fragments("goto done\ndone:\n\treturn");
        assert!(lines.is_empty());
        let kinds: Vec<(Construct, &str)> =
            diagnostics.iter().map(|d| (d.construct, d.kind.as_str())).collect();
        assert_eq!(kinds, vec![(Construct::Branch, "goto"), (Construct::Statement, "LabeledStmt")]);
    }

    #[test]
    fn test_defer_and_expression_statements() {
        assert_eq!(
            lines("defer mu.Unlock()\nlog.Printf(\"%v\", args...)\nobj.field\nnewReader().Read(buf)"),
            vec![
                ":defer mu.Unlock();",
                ":log.Printf(\"%v\", args);",
                "obj.field",
                ":newReader().Read(buf);",
            ]
        );
    }

    #[test]
    fn test_unsupported_statements_are_skipped() {
        let (lines, diagnostics) =
            fragments("a()\ngo worker()\nch <- 1\nselect {}\n{\n\tb()\n}\nc()");
        assert_eq!(lines, vec![":a();", ":c();"]);
        let kinds: Vec<&str> = diagnostics.iter().map(|d| d.kind.as_str()).collect();
        assert_eq!(kinds, vec!["GoStmt", "SendStmt", "SelectStmt", "BlockStmt"]);
        assert!(diagnostics.iter().all(|d| d.construct == Construct::Statement));
    }

    #[test]
    fn test_unsupported_expression_statement() {
        let (lines, diagnostics) = fragments("x\n<-done");
        assert!(lines.is_empty());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.construct == Construct::ExprStatement));
        assert_eq!(diagnostics[1].kind, "UnaryExpr");
    }

    #[test]
    fn test_selector_statement_with_unsupported_base_writes_no_line() {
        let (lines, diagnostics) = fragments("obj[0].field\ndone()");
        assert_eq!(lines, vec![":done();"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].construct, Construct::SelectorBase);
        assert_eq!(diagnostics[0].kind, "IndexExpr");
    }

    #[test]
    fn test_unsupported_loop_clause() {
        let (lines, diagnostics) = fragments("for ch <- 1; ; {\n}");
        assert_eq!(lines, vec!["while (for ; ; )", "endwhile"]);
        assert_eq!(diagnostics[0].construct, Construct::LoopClause);
        assert_eq!(diagnostics[0].kind, "SendStmt");
    }
}
