// File: src/translator/statements.rs
//
// Statement dispatch. Every supported statement appends whole lines;
// control structures open a block, recurse into their bodies, and close it.

use super::Translator;
use crate::ast::{
    BranchKind, ElseBranch, Expr, ForStmt, GenDecl, IfStmt, Spec, Stmt, StmtKind, SwitchStmt,
};
use crate::diagnostics::Construct;

impl<'s> Translator<'s> {
    pub(super) fn translate_stmt(&mut self, stmt: &Stmt) {
        let outer = std::mem::replace(&mut self.location, stmt.location.clone());

        match &stmt.kind {
            StmtKind::If(if_stmt) => {
                if let Some(init) = &if_stmt.init {
                    self.translate_stmt(init);
                }
                self.translate_if(if_stmt);
            }
            StmtKind::Assign { targets, op, values } => {
                self.doc.push(":");
                self.render_list(targets);
                self.doc.push(" ");
                self.doc.push(op.symbol());
                self.doc.push(" ");
                self.render_list(values);
                self.doc.line(";");
            }
            StmtKind::Decl(decl) => self.translate_decl(decl),
            StmtKind::Return(results) => {
                self.doc.push(":return ");
                self.render_list(results);
                self.doc.line(";");
                self.doc.line("end");
            }
            StmtKind::Range(range) => {
                self.doc.push("while (range ");
                self.render_expr(&range.iterable);
                self.doc.line(")");
                self.translate_block(&range.body);
                self.doc.line("endwhile");
            }
            StmtKind::Switch(switch) => self.translate_switch(switch),
            StmtKind::For(for_stmt) => self.translate_for(for_stmt),
            StmtKind::Branch { kind: BranchKind::Continue, .. } => {
                self.doc.line(":continue;");
                self.doc.line("stop");
            }
            StmtKind::Branch { kind: BranchKind::Break, .. } => {
                self.doc.line(":break;");
                self.doc.line("break");
            }
            StmtKind::Branch { kind, .. } => self.report(Construct::Branch, kind.keyword()),
            StmtKind::IncDec { target, op } => {
                self.doc.push(":");
                self.render_expr(target);
                self.doc.push(op.symbol());
                self.doc.line(";");
            }
            StmtKind::Defer(call) => {
                self.doc.push(":defer ");
                self.render_call(call);
                self.doc.line(";");
            }
            StmtKind::Expr(expr) => self.translate_expr_stmt(expr),
            other => self.report(Construct::Statement, other.name()),
        }

        self.location = outer;
    }

    fn translate_if(&mut self, if_stmt: &IfStmt) {
        self.doc.push("if (");
        self.render_expr(&if_stmt.cond);
        self.doc.line(") then (yes)");
        self.translate_block(&if_stmt.body);

        match &if_stmt.else_branch {
            Some(ElseBranch::If(nested)) => {
                self.doc.line("else");
                if let Some(init) = &nested.init {
                    self.translate_stmt(init);
                }
                self.translate_if(nested);
            }
            Some(ElseBranch::Block(body)) => {
                self.doc.line("else");
                self.translate_block(body);
            }
            None => {}
        }

        self.doc.line("endif");
    }

    /// One action per declared name; name i takes value i, or the first value when short
    fn translate_decl(&mut self, decl: &GenDecl) {
        for spec in &decl.specs {
            let Spec::Value(value_spec) = spec else {
                self.report(Construct::DeclSpec, spec.name());
                continue;
            };
            for (i, name) in value_spec.names.iter().enumerate() {
                self.doc.push(":");
                self.doc.push(name);
                if let Some(ty) = &value_spec.ty {
                    self.doc.push(" ");
                    self.render_expr(ty);
                }
                if let Some(value) = value_spec.values.get(i).or(value_spec.values.first()) {
                    self.doc.push(" = ");
                    self.render_expr(value);
                }
                self.doc.line(";");
            }
        }
    }

    fn translate_switch(&mut self, switch: &SwitchStmt) {
        if let Some(init) = &switch.init {
            self.report(Construct::SwitchInit, init.kind.name());
        }

        self.doc.push("switch (");
        if let Some(tag) = &switch.tag {
            self.render_expr(tag);
        }
        self.doc.line(")");

        let mut found_default = false;
        for clause in &switch.clauses {
            if clause.values.is_empty() {
                found_default = true;
                self.doc.line("case (default)");
            }
            for value in &clause.values {
                self.doc.push("case (");
                self.render_expr(value);
                self.doc.line(")");
            }
            self.translate_block(&clause.body);
        }
        if !found_default {
            self.doc.line("case ()");
        }

        self.doc.line("endswitch");
    }

    fn translate_for(&mut self, for_stmt: &ForStmt) {
        let ForStmt { init, cond, post, body } = for_stmt;
        if init.is_none() && cond.is_none() && post.is_none() {
            self.doc.line("while (for)");
        } else {
            self.doc.push("while (for ");
            if let Some(init) = init {
                self.render_clause(init);
            }
            self.doc.push("; ");
            if let Some(cond) = cond {
                self.render_expr(cond);
            }
            self.doc.push("; ");
            if let Some(post) = post {
                self.render_clause(post);
            }
            self.doc.line(")");
        }

        self.translate_block(body);
        self.doc.line("endwhile");
    }

    /// Inline form of a `for` initializer or post statement
    fn render_clause(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign { targets, op, values } => {
                self.render_list(targets);
                self.doc.push(" ");
                self.doc.push(op.symbol());
                self.doc.push(" ");
                self.render_list(values);
            }
            StmtKind::IncDec { target, op } => {
                self.render_expr(target);
                self.doc.push(op.symbol());
            }
            StmtKind::Expr(expr) => self.render_expr(expr),
            other => self.report(Construct::LoopClause, other.name()),
        }
    }

    fn translate_expr_stmt(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(call) => {
                self.doc.push(":");
                self.render_call(call);
                self.doc.line(";");
            }
            // A bare field access is shown as is, outside an action
            Expr::Selector { base, member } => {
                if self.render_selector(base, member) {
                    self.doc.line("");
                }
            }
            other => self.report(Construct::ExprStatement, other.name()),
        }
    }
}
