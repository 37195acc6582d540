// File: src/translator/expressions.rs
//
// Inline rendering of expressions. Nothing here ends a line; the statement
// that owns the expression supplies its own terminator.

use super::Translator;
use crate::ast::{CallExpr, Expr};
use crate::diagnostics::Construct;

impl<'s> Translator<'s> {
    pub(super) fn render_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::BasicLit { value, .. } => self.doc.push(value),
            Expr::Ident(name) => self.doc.push(name),
            Expr::Selector { base, member } => {
                self.render_selector(base, member);
            }
            Expr::Binary { left, op, right } => {
                self.render_expr(left);
                self.doc.push(" ");
                self.doc.push(op.symbol());
                self.doc.push(" ");
                self.render_expr(right);
            }
            Expr::Unary { op, operand } => {
                self.doc.push(op.symbol());
                self.render_expr(operand);
            }
            Expr::Call(call) => self.render_call(call),
            Expr::ArrayType { elem, .. } => self.render_array_type(elem),
            Expr::TypeAssert { expr, ty } => {
                self.render_expr(expr);
                self.doc.push(".(");
                match ty {
                    Some(ty) => self.render_expr(ty),
                    None => self.doc.push("type"),
                }
                self.doc.push(")");
            }
            Expr::CompositeLit { ty, .. } => self.render_composite_lit(ty.as_deref()),
            Expr::Star(operand) => {
                self.doc.push("*");
                self.render_expr(operand);
            }
            other => self.report(Construct::Expression, other.name()),
        }
    }

    /// Comma separated, as in argument and result lists
    pub(super) fn render_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.doc.push(", ");
            }
            self.render_expr(expr);
        }
    }

    /// Returns false when the base was reported and nothing was written
    pub(super) fn render_selector(&mut self, base: &Expr, member: &str) -> bool {
        match base {
            Expr::Ident(_) | Expr::Selector { .. } | Expr::Call(_) => {
                self.render_expr(base);
                self.doc.push(".");
                self.doc.push(member);
                true
            }
            other => {
                self.report(Construct::SelectorBase, other.name());
                false
            }
        }
    }

    pub(super) fn render_call(&mut self, call: &CallExpr) {
        match call.callee.as_ref() {
            callee @ (Expr::Ident(_) | Expr::Selector { .. }) => {
                self.render_expr(callee);
                self.doc.push("(");
                self.render_list(&call.args);
                self.doc.push(")");
            }
            other => self.report(Construct::Callee, other.name()),
        }
    }

    /// Element type only; a fixed length is not shown
    fn render_array_type(&mut self, elem: &Expr) {
        self.doc.push("[]");
        self.render_expr(elem);
    }

    /// `T{}` with the elements left out; array literals show just their type
    fn render_composite_lit(&mut self, ty: Option<&Expr>) {
        match ty {
            Some(ty @ (Expr::Ident(_) | Expr::Selector { .. })) => {
                self.render_expr(ty);
                self.doc.push("{}");
            }
            Some(Expr::ArrayType { elem, .. }) => self.render_array_type(elem),
            Some(other) => self.report(Construct::CompositeType, other.name()),
            None => self.report(Construct::CompositeType, "elided"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, UnaryOp};
    use crate::diagnostics::Diagnostic;
    use crate::lexer::LiteralKind;

    fn render(expr: &Expr) -> (String, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut translator = Translator::new("e", &mut diagnostics);
        translator.render_expr(expr);
        let doc = translator.finish();
        let inline = doc
            .strip_prefix("@startuml\nstart\n:e;\n")
            .and_then(|rest| rest.strip_suffix("@enduml\n"))
            .unwrap_or_default()
            .to_string();
        (inline, diagnostics)
    }

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::ident(name))
    }

    fn string(value: &str) -> Expr {
        Expr::BasicLit { kind: LiteralKind::String, value: value.to_string() }
    }

    fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call(CallExpr { callee: Box::new(callee), args, spread: false })
    }

    #[test]
    fn test_literal_is_verbatim() {
        assert_eq!(render(&string(r#""if %d\n""#)).0, r#""if %d\n""#);
    }

    #[test]
    fn test_binary_and_unary() {
        let expr = Expr::Binary {
            left: Box::new(Expr::Unary { op: UnaryOp::Not, operand: ident("ok") }),
            op: BinaryOp::LogAnd,
            right: Box::new(Expr::Unary { op: UnaryOp::Addr, operand: ident("v") }),
        };
        assert_eq!(render(&expr).0, "!ok && &v");
    }

    #[test]
    fn test_selector_on_call_result() {
        let inner = call(Expr::Selector { base: ident("os"), member: "Stdout".into() }, vec![]);
        let expr = Expr::Selector { base: Box::new(inner), member: "Name".into() };
        assert_eq!(render(&expr).0, "os.Stdout().Name");
    }

    #[test]
    fn test_selector_on_index_is_reported() {
        let base = Expr::Index { expr: ident("xs"), indices: vec![Expr::ident("i")] };
        let (text, diagnostics) = render(&Expr::Selector { base: Box::new(base), member: "id".into() });
        assert_eq!(text, "");
        assert_eq!(diagnostics[0].construct, Construct::SelectorBase);
        assert_eq!(diagnostics[0].kind, "IndexExpr");
    }

    #[test]
    fn test_call_with_function_literal_callee_is_reported() {
        let (text, diagnostics) = render(&call(Expr::FuncLit { body: vec![] }, vec![string("\"x\"")]));
        assert_eq!(text, "");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].construct, Construct::Callee);
    }

    #[test]
    fn test_type_assertions() {
        let typed = Expr::TypeAssert { expr: ident("v"), ty: Some(Box::new(Expr::Star(ident("T")))) };
        assert_eq!(render(&typed).0, "v.(*T)");
        let guard = Expr::TypeAssert { expr: ident("v"), ty: None };
        assert_eq!(render(&guard).0, "v.(type)");
    }

    #[test]
    fn test_composite_literals() {
        let named = Expr::CompositeLit {
            ty: Some(Box::new(Expr::Selector { base: ident("http"), member: "Client".into() })),
            elements: vec![string("\"a\"")],
        };
        assert_eq!(render(&named).0, "http.Client{}");

        let array = Expr::CompositeLit {
            ty: Some(Box::new(Expr::ArrayType { len: None, elem: ident("int") })),
            elements: vec![],
        };
        assert_eq!(render(&array).0, "[]int");

        let map = Expr::CompositeLit {
            ty: Some(Box::new(Expr::MapType { key: ident("string"), value: ident("int") })),
            elements: vec![],
        };
        let (text, diagnostics) = render(&map);
        assert_eq!(text, "");
        assert_eq!(diagnostics[0].kind, "MapType");
    }

    #[test]
    fn test_unsupported_inner_expression_leaves_siblings() {
        let expr = call(Expr::ident("f"), vec![Expr::ident("a"), Expr::Paren(ident("b")), Expr::ident("c")]);
        let (text, diagnostics) = render(&expr);
        assert_eq!(text, "f(a, , c)");
        assert_eq!(diagnostics[0].construct, Construct::Expression);
        assert_eq!(diagnostics[0].kind, "ParenExpr");
    }
}
