// File: src/parser.rs
//
// Recursive descent parser for Go source files.
// Transforms a sequence of tokens into an Abstract Syntax Tree (AST).
//
// The parser implements a traditional recursive descent strategy with
// precedence climbing for binary expressions. It covers:
// - Package clause, imports, and top-level func/var/const/type declarations
// - Every Go statement form, including labeled, select and type switch
// - Expressions: selectors, calls, index/slice, type assertions, composite
//   and function literals, and types in expression position
//
// Function signatures and struct/interface bodies are skipped structurally:
// the diagram only needs what happens inside function bodies.
//
// The parser uses a single-token lookahead (two where Go needs it) and
// advances through the token stream as it builds the AST.

use crate::ast::{
    AssignOp, BinaryOp, BranchKind, CallExpr, CaseClause, ChanDir, CommClause, Decl, DeclKind,
    ElseBranch, Expr, ForStmt, FuncDecl, GenDecl, IfStmt, IncDecOp, RangeStmt, SourceFile, Spec,
    Stmt, StmtKind, SwitchStmt, TypeSpec, TypeSwitchStmt, UnaryOp, ValueSpec,
};
use crate::errors::{SourceLocation, SyntaxError};
use crate::lexer::{tokenize, Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

static EOF: TokenKind = TokenKind::Eof;

/// Shape of a `for` header once parsed
enum ForHeader {
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        iterable: Expr,
    },
    Clauses {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
    },
}

/// Parser maintains position in token stream and provides methods to parse statements and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Negative inside `if`/`for`/`switch` headers, where `Name {` opens the body
    /// instead of a composite literal; positive inside brackets.
    expr_level: i32,
}

/// Tokenizes and parses a complete Go source file
pub fn parse_source(source: &str) -> ParseResult<SourceFile> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_file()
}

impl Parser {
    /// Creates a new parser from a vector of tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0, expr_level: 0 }
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| &t.kind)
            .unwrap_or(&EOF)
    }

    /// Consume and return the current token, then advance to the next
    fn advance(&mut self) -> TokenKind {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn location(&self) -> SourceLocation {
        match self.tokens.get(self.pos).or(self.tokens.last()) {
            Some(token) => token.location(),
            None => SourceLocation::new(1, 1),
        }
    }

    fn is_punct(&self, c: char) -> bool {
        matches!(self.peek(), TokenKind::Punctuation(p) if *p == c)
    }

    fn is_operator(&self, op: &str) -> bool {
        matches!(self.peek(), TokenKind::Operator(o) if o == op)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), TokenKind::Keyword(k) if k == keyword)
    }

    fn error(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            format!("expected {}, found {}", expected, self.peek().describe()),
            self.location(),
        )
    }

    fn expect_punct(&mut self, c: char) -> ParseResult<()> {
        if self.is_punct(c) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("`{}`", c)))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if self.is_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("`{}`", keyword)))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("identifier")),
        }
    }

    /// A statement or declaration ends with `;`, which may be omitted before a closing `)` or `}`
    fn expect_terminator(&mut self) -> ParseResult<()> {
        match self.peek() {
            TokenKind::Punctuation(';') => {
                self.advance();
                Ok(())
            }
            TokenKind::Punctuation(')') | TokenKind::Punctuation('}') | TokenKind::Eof => Ok(()),
            _ => Err(self.error("newline or `;`")),
        }
    }

    /// Skips a bracketed region, honoring nesting of the same bracket kind
    fn skip_balanced(&mut self, open: char, close: char) -> ParseResult<()> {
        let start = self.location();
        self.expect_punct(open)?;
        let mut depth = 1;
        loop {
            match self.advance() {
                TokenKind::Punctuation(c) if c == open => depth += 1,
                TokenKind::Punctuation(c) if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                TokenKind::Eof => {
                    return Err(SyntaxError::new(format!("unclosed `{}`", open), start));
                }
                _ => {}
            }
        }
    }

    // --- DECLARATIONS ---

    /// Parse the entire token stream into a source file
    pub fn parse_file(&mut self) -> ParseResult<SourceFile> {
        if !self.is_keyword("package") {
            return Err(self
                .error("`package`")
                .with_help("a Go source file starts with a `package <name>` clause"));
        }
        self.advance();
        let package = self.expect_identifier()?;
        self.expect_terminator()?;

        let mut imports = Vec::new();
        while self.is_keyword("import") {
            self.advance();
            if self.is_punct('(') {
                self.advance();
                while !self.is_punct(')') {
                    imports.push(self.parse_import_spec()?);
                    self.expect_terminator()?;
                }
                self.expect_punct(')')?;
            } else {
                imports.push(self.parse_import_spec()?);
            }
            self.expect_terminator()?;
        }

        let mut decls = Vec::new();
        loop {
            match self.peek() {
                TokenKind::Eof => break,
                TokenKind::Punctuation(';') => {
                    self.advance();
                    continue;
                }
                TokenKind::Keyword(k) if k == "func" => decls.push(Decl::Func(self.parse_func_decl()?)),
                TokenKind::Keyword(k) if matches!(k.as_str(), "var" | "const" | "type") => {
                    decls.push(Decl::Gen(self.parse_gen_decl()?))
                }
                TokenKind::Keyword(k) if k == "import" => {
                    return Err(self
                        .error("declaration")
                        .with_help("imports must appear before other declarations"));
                }
                _ => return Err(self.error("declaration")),
            }
            self.expect_terminator()?;
        }

        Ok(SourceFile { package, imports, decls })
    }

    fn parse_import_spec(&mut self) -> ParseResult<String> {
        // Optional local name: `f "fmt"`, `. "fmt"`, `_ "embed"`
        if matches!(self.peek(), TokenKind::Identifier(_) | TokenKind::Punctuation('.')) {
            self.advance();
        }
        match self.peek() {
            TokenKind::Literal(_, path) => {
                let path = path.trim_matches(|c| c == '"' || c == '`').to_string();
                self.advance();
                Ok(path)
            }
            _ => Err(self.error("import path")),
        }
    }

    fn parse_func_decl(&mut self) -> ParseResult<FuncDecl> {
        let location = self.location();
        self.expect_keyword("func")?;
        let receiver = if self.is_punct('(') {
            self.parse_receiver()?
        } else {
            None
        };
        let name = self.expect_identifier()?;
        if self.is_punct('[') {
            self.skip_balanced('[', ']')?; // type parameters
        }
        self.skip_signature()?;
        let body = if self.is_punct('{') {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(FuncDecl { name, receiver, body, location })
    }

    /// Returns the receiver's base type name: `T` for `(t *T)` and `(l List[E])`
    fn parse_receiver(&mut self) -> ParseResult<Option<String>> {
        let start = self.location();
        self.expect_punct('(')?;
        let mut base = None;
        let mut depth = 1;
        let mut brackets = 0;
        loop {
            match self.advance() {
                TokenKind::Punctuation('(') => depth += 1,
                TokenKind::Punctuation(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(base);
                    }
                }
                TokenKind::Punctuation('[') => brackets += 1,
                TokenKind::Punctuation(']') => brackets -= 1,
                TokenKind::Identifier(name) if depth == 1 && brackets == 0 => base = Some(name),
                TokenKind::Eof => return Err(SyntaxError::new("unclosed receiver", start)),
                _ => {}
            }
        }
    }

    /// Skips parameters and results; a following `{` is left for the body
    fn skip_signature(&mut self) -> ParseResult<()> {
        self.skip_balanced('(', ')')?;
        if self.is_punct('(') {
            self.skip_balanced('(', ')')?;
        } else if self.starts_type() {
            self.parse_type()?;
        }
        Ok(())
    }

    fn starts_type(&self) -> bool {
        match self.peek() {
            TokenKind::Identifier(_) | TokenKind::Punctuation('[') => true,
            TokenKind::Operator(op) => op == "*" || op == "<-",
            TokenKind::Keyword(k) => {
                matches!(k.as_str(), "map" | "chan" | "func" | "struct" | "interface")
            }
            _ => false,
        }
    }

    fn parse_gen_decl(&mut self) -> ParseResult<GenDecl> {
        let kind = match self.peek() {
            TokenKind::Keyword(k) if k == "var" => DeclKind::Var,
            TokenKind::Keyword(k) if k == "const" => DeclKind::Const,
            TokenKind::Keyword(k) if k == "type" => DeclKind::Type,
            _ => return Err(self.error("declaration keyword")),
        };
        self.advance();

        let mut specs = Vec::new();
        if self.is_punct('(') {
            self.advance();
            while !self.is_punct(')') {
                specs.push(self.parse_spec(kind)?);
                self.expect_terminator()?;
            }
            self.expect_punct(')')?;
        } else {
            specs.push(self.parse_spec(kind)?);
        }
        Ok(GenDecl { kind, specs })
    }

    fn parse_spec(&mut self, kind: DeclKind) -> ParseResult<Spec> {
        if kind == DeclKind::Type {
            let name = self.expect_identifier()?;
            // `type S[T any] ...` has type parameters; `type A [N]int` is an array
            let has_type_params = self.is_punct('[')
                && matches!(self.peek_at(1), TokenKind::Identifier(_))
                && !matches!(self.peek_at(2), TokenKind::Punctuation(']'));
            if has_type_params {
                self.skip_balanced('[', ']')?;
            }
            let alias = self.is_operator("=");
            if alias {
                self.advance();
            }
            let ty = self.parse_type()?;
            return Ok(Spec::Type(TypeSpec { name, alias, ty }));
        }

        let mut names = vec![self.expect_identifier()?];
        while self.is_punct(',') {
            self.advance();
            names.push(self.expect_identifier()?);
        }
        let ty = if !self.is_operator("=") && !self.is_punct(';') && !self.is_punct(')') {
            Some(self.parse_type()?)
        } else {
            None
        };
        let values = if self.is_operator("=") {
            self.advance();
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        Ok(Spec::Value(ValueSpec { names, ty, values }))
    }

    // --- STATEMENTS ---

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect_punct('{')?;
        let saved = self.expr_level;
        self.expr_level = 0;
        let stmts = self.parse_stmt_list();
        self.expr_level = saved;
        let stmts = stmts?;
        self.expect_punct('}')?;
        Ok(stmts)
    }

    /// Statements up to the closing `}` or the next `case`/`default`
    fn parse_stmt_list(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                TokenKind::Punctuation('}') | TokenKind::Eof => break,
                TokenKind::Keyword(k) if k == "case" || k == "default" => break,
                TokenKind::Punctuation(';') => {
                    self.advance();
                }
                _ => {
                    stmts.push(self.parse_stmt()?);
                    self.expect_terminator()?;
                }
            }
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let location = self.location();
        let kind = match self.peek() {
            TokenKind::Keyword(k) if matches!(k.as_str(), "var" | "const" | "type") => {
                StmtKind::Decl(self.parse_gen_decl()?)
            }
            TokenKind::Keyword(k) if k == "if" => StmtKind::If(self.parse_if()?),
            TokenKind::Keyword(k) if k == "for" => self.parse_for()?,
            TokenKind::Keyword(k) if k == "switch" => self.parse_switch()?,
            TokenKind::Keyword(k) if k == "select" => self.parse_select()?,
            TokenKind::Keyword(k) if k == "return" => {
                self.advance();
                let results = if self.is_punct(';') || self.is_punct('}') {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                StmtKind::Return(results)
            }
            TokenKind::Keyword(k)
                if matches!(k.as_str(), "break" | "continue" | "goto" | "fallthrough") =>
            {
                let kind = match self.advance() {
                    TokenKind::Keyword(k) if k == "break" => BranchKind::Break,
                    TokenKind::Keyword(k) if k == "continue" => BranchKind::Continue,
                    TokenKind::Keyword(k) if k == "goto" => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = match self.peek() {
                    TokenKind::Identifier(name) if kind != BranchKind::Fallthrough => {
                        let name = name.clone();
                        self.advance();
                        Some(name)
                    }
                    _ => None,
                };
                StmtKind::Branch { kind, label }
            }
            TokenKind::Keyword(k) if k == "defer" => {
                self.advance();
                StmtKind::Defer(self.parse_call_operand("defer")?)
            }
            TokenKind::Keyword(k) if k == "go" => {
                self.advance();
                StmtKind::Go(self.parse_call_operand("go")?)
            }
            TokenKind::Punctuation('{') => StmtKind::Block(self.parse_block()?),
            TokenKind::Identifier(_) if matches!(self.peek_at(1), TokenKind::Punctuation(':')) => {
                let label = self.expect_identifier()?;
                self.advance(); // :
                let stmt = if self.is_punct('}') {
                    Stmt::new(StmtKind::Empty, self.location())
                } else {
                    self.parse_stmt()?
                };
                StmtKind::Labeled { label, stmt: Box::new(stmt) }
            }
            _ => self.parse_simple_stmt()?,
        };
        Ok(Stmt::new(kind, location))
    }

    fn parse_call_operand(&mut self, keyword: &str) -> ParseResult<CallExpr> {
        let location = self.location();
        match self.parse_expr()? {
            Expr::Call(call) => Ok(call),
            _ => Err(SyntaxError::new(
                format!("expression in {} must be function call", keyword),
                location,
            )
            .with_help(format!("wrap the statement in a function literal: `{} func() {{ ... }}()`", keyword))),
        }
    }

    /// Expression, send, inc/dec or assignment statement
    fn parse_simple_stmt(&mut self) -> ParseResult<StmtKind> {
        let lhs = self.parse_expr_list()?;
        self.finish_simple_stmt(lhs)
    }

    fn finish_simple_stmt(&mut self, mut lhs: Vec<Expr>) -> ParseResult<StmtKind> {
        let op = match self.peek() {
            TokenKind::Operator(op) => op.clone(),
            _ => String::new(),
        };

        if let Some(assign) = AssignOp::from_symbol(&op) {
            self.advance();
            let values = self.parse_expr_list()?;
            return Ok(StmtKind::Assign { targets: lhs, op: assign, values });
        }

        if lhs.len() > 1 {
            return Err(self.error("`:=` or `=`"));
        }
        let Some(first) = lhs.pop() else {
            return Err(self.error("expression"));
        };

        match op.as_str() {
            "<-" => {
                self.advance();
                let value = self.parse_expr()?;
                Ok(StmtKind::Send { channel: first, value })
            }
            "++" | "--" => {
                self.advance();
                let op = if op == "++" { IncDecOp::Inc } else { IncDecOp::Dec };
                Ok(StmtKind::IncDec { target: first, op })
            }
            _ => Ok(StmtKind::Expr(first)),
        }
    }

    fn parse_if(&mut self) -> ParseResult<IfStmt> {
        self.expect_keyword("if")?;
        let saved = self.expr_level;
        self.expr_level = -1;
        let header = self.parse_if_header();
        self.expr_level = saved;
        let (init, cond) = header?;

        let body = self.parse_block()?;
        let else_branch = if self.is_keyword("else") {
            self.advance();
            if self.is_keyword("if") {
                Some(ElseBranch::If(Box::new(self.parse_if()?)))
            } else if self.is_punct('{') {
                Some(ElseBranch::Block(self.parse_block()?))
            } else {
                return Err(self.error("`if` or `{` after `else`"));
            }
        } else {
            None
        };

        Ok(IfStmt { init, cond, body, else_branch })
    }

    fn parse_if_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Expr)> {
        if self.is_punct('{') {
            return Err(SyntaxError::new("missing condition in if statement", self.location()));
        }
        let location = self.location();
        let first = if self.is_punct(';') {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };

        if self.is_punct(';') {
            self.advance();
            let init = first.map(|kind| Box::new(Stmt::new(kind, location)));
            if self.is_punct('{') {
                return Err(SyntaxError::new("missing condition in if statement", self.location()));
            }
            let cond = self.parse_expr()?;
            return Ok((init, cond));
        }

        match first {
            Some(StmtKind::Expr(cond)) => Ok((None, cond)),
            _ => Err(SyntaxError::new("expected boolean expression as if condition", location)
                .with_help("separate an initializer from the condition with `;`")),
        }
    }

    fn parse_for(&mut self) -> ParseResult<StmtKind> {
        self.expect_keyword("for")?;
        let saved = self.expr_level;
        self.expr_level = -1;
        let header = self.parse_for_header();
        self.expr_level = saved;
        let header = header?;

        let body = self.parse_block()?;
        Ok(match header {
            ForHeader::Range { key, value, define, iterable } => {
                StmtKind::Range(RangeStmt { key, value, define, iterable, body })
            }
            ForHeader::Clauses { init, cond, post } => StmtKind::For(ForStmt { init, cond, post, body }),
        })
    }

    fn parse_for_header(&mut self) -> ParseResult<ForHeader> {
        if self.is_punct('{') {
            return Ok(ForHeader::Clauses { init: None, cond: None, post: None });
        }
        if self.is_keyword("range") {
            self.advance();
            let iterable = self.parse_expr()?;
            return Ok(ForHeader::Range { key: None, value: None, define: false, iterable });
        }

        let location = self.location();
        let mut first = None;
        if !self.is_punct(';') {
            let mut lhs = self.parse_expr_list()?;
            let assigns = self.is_operator(":=") || self.is_operator("=");
            if assigns && matches!(self.peek_at(1), TokenKind::Keyword(k) if k == "range") {
                let define = self.is_operator(":=");
                self.advance();
                self.advance();
                let iterable = self.parse_expr()?;
                if lhs.len() > 2 {
                    return Err(SyntaxError::new("range clause permits at most two iteration variables", location));
                }
                let value = if lhs.len() == 2 { lhs.pop() } else { None };
                let key = lhs.pop();
                return Ok(ForHeader::Range { key, value, define, iterable });
            }
            first = Some(self.finish_simple_stmt(lhs)?);
        }

        if !self.is_punct(';') {
            return match first {
                Some(StmtKind::Expr(cond)) => Ok(ForHeader::Clauses { init: None, cond: Some(cond), post: None }),
                _ => Err(SyntaxError::new("expected for loop condition", location)),
            };
        }

        self.advance();
        let init = first.map(|kind| Box::new(Stmt::new(kind, location)));
        let cond = if self.is_punct(';') {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_punct(';')?;
        let post = if self.is_punct('{') {
            None
        } else {
            let location = self.location();
            Some(Box::new(Stmt::new(self.parse_simple_stmt()?, location)))
        };
        Ok(ForHeader::Clauses { init, cond, post })
    }

    fn parse_switch(&mut self) -> ParseResult<StmtKind> {
        self.expect_keyword("switch")?;
        let saved = self.expr_level;
        self.expr_level = -1;
        let header = self.parse_switch_header();
        self.expr_level = saved;
        let (init, tag) = header?;

        self.expect_punct('{')?;
        let mut clauses = Vec::new();
        while self.is_keyword("case") || self.is_keyword("default") {
            clauses.push(self.parse_case_clause()?);
        }
        self.expect_punct('}')?;

        match tag {
            Some(stmt) if is_type_guard(&stmt) => Ok(StmtKind::TypeSwitch(TypeSwitchStmt {
                init,
                assign: Box::new(stmt),
                clauses,
            })),
            Some(Stmt { kind: StmtKind::Expr(tag), .. }) => {
                Ok(StmtKind::Switch(SwitchStmt { init, tag: Some(tag), clauses }))
            }
            Some(stmt) => Err(SyntaxError::new("switch expression must be an expression", stmt.location)),
            None => Ok(StmtKind::Switch(SwitchStmt { init, tag: None, clauses })),
        }
    }

    fn parse_switch_header(&mut self) -> ParseResult<(Option<Box<Stmt>>, Option<Stmt>)> {
        let mut init = None;
        let mut tag = None;
        if self.is_punct('{') {
            return Ok((init, tag));
        }
        if !self.is_punct(';') {
            let location = self.location();
            tag = Some(Stmt::new(self.parse_simple_stmt()?, location));
        }
        if self.is_punct(';') {
            self.advance();
            init = tag.take().map(Box::new);
            if !self.is_punct('{') {
                let location = self.location();
                tag = Some(Stmt::new(self.parse_simple_stmt()?, location));
            }
        }
        Ok((init, tag))
    }

    fn parse_case_clause(&mut self) -> ParseResult<CaseClause> {
        let values = if self.is_keyword("case") {
            self.advance();
            self.parse_expr_list()?
        } else {
            self.expect_keyword("default")?;
            Vec::new()
        };
        self.expect_punct(':')?;
        let body = self.parse_stmt_list()?;
        Ok(CaseClause { values, body })
    }

    fn parse_select(&mut self) -> ParseResult<StmtKind> {
        self.expect_keyword("select")?;
        self.expect_punct('{')?;
        let mut clauses = Vec::new();
        while self.is_keyword("case") || self.is_keyword("default") {
            let comm = if self.is_keyword("case") {
                self.advance();
                let location = self.location();
                Some(Box::new(Stmt::new(self.parse_simple_stmt()?, location)))
            } else {
                self.advance();
                None
            };
            self.expect_punct(':')?;
            let body = self.parse_stmt_list()?;
            clauses.push(CommClause { comm, body });
        }
        self.expect_punct('}')?;
        Ok(StmtKind::Select(clauses))
    }

    // --- EXPRESSIONS ---

    fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.is_punct(',') {
            self.advance();
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(1)
    }

    fn parse_binary_expr(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary_expr()?;
        loop {
            let op = match self.peek() {
                TokenKind::Operator(symbol) => match BinaryOp::from_symbol(symbol) {
                    Some(op) if op.precedence() >= min_precedence => op,
                    _ => break,
                },
                _ => break,
            };
            self.advance();
            let right = self.parse_binary_expr(op.precedence() + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        let op = match self.peek() {
            TokenKind::Operator(op) if op == "*" => {
                self.advance();
                return Ok(Expr::Star(Box::new(self.parse_unary_expr()?)));
            }
            TokenKind::Operator(op) => UnaryOp::from_symbol(op),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_primary_expr();
        };

        self.advance();
        let operand = self.parse_unary_expr()?;
        // `<-chan T` is a receive-only channel type, not a receive
        if let (UnaryOp::Recv, Expr::ChanType { dir: ChanDir::Both, elem }) = (op, &operand) {
            return Ok(Expr::ChanType { dir: ChanDir::Recv, elem: elem.clone() });
        }
        Ok(Expr::Unary { op, operand: Box::new(operand) })
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            match self.peek() {
                TokenKind::Punctuation('.') => {
                    self.advance();
                    match self.peek() {
                        TokenKind::Identifier(member) => {
                            let member = member.clone();
                            self.advance();
                            expr = Expr::Selector { base: Box::new(expr), member };
                        }
                        TokenKind::Punctuation('(') => {
                            self.advance();
                            let ty = if self.is_keyword("type") {
                                self.advance();
                                None
                            } else {
                                Some(Box::new(self.parse_type()?))
                            };
                            self.expect_punct(')')?;
                            expr = Expr::TypeAssert { expr: Box::new(expr), ty };
                        }
                        _ => return Err(self.error("selector or type assertion")),
                    }
                }
                TokenKind::Punctuation('[') => expr = self.parse_index_or_slice(expr)?,
                TokenKind::Punctuation('(') => expr = Expr::Call(self.parse_call(expr)?),
                TokenKind::Punctuation('{') if self.is_literal_type(&expr) => {
                    expr = self.parse_composite_lit(Some(expr))?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Whether `expr {` starts a composite literal here
    fn is_literal_type(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Ident(_) | Expr::Selector { .. } | Expr::Index { .. } => self.expr_level >= 0,
            Expr::ArrayType { .. } | Expr::MapType { .. } | Expr::StructType => true,
            _ => false,
        }
    }

    fn parse_operand(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            TokenKind::Literal(kind, value) => {
                let expr = Expr::BasicLit { kind: *kind, value: value.clone() };
                self.advance();
                Ok(expr)
            }
            TokenKind::Identifier(name) => {
                let expr = Expr::Ident(name.clone());
                self.advance();
                Ok(expr)
            }
            TokenKind::Punctuation('(') => {
                self.advance();
                self.expr_level += 1;
                let inner = self.parse_expr();
                self.expr_level -= 1;
                let inner = inner?;
                self.expect_punct(')')?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Keyword(k) if k == "func" => {
                self.advance();
                self.skip_signature()?;
                if self.is_punct('{') {
                    Ok(Expr::FuncLit { body: self.parse_block()? })
                } else {
                    Ok(Expr::FuncType)
                }
            }
            TokenKind::Punctuation('[') => self.parse_type(),
            TokenKind::Keyword(k) if matches!(k.as_str(), "map" | "chan" | "struct" | "interface") => {
                self.parse_type()
            }
            _ => Err(self.error("expression")),
        }
    }

    fn parse_call(&mut self, callee: Expr) -> ParseResult<CallExpr> {
        self.expect_punct('(')?;
        self.expr_level += 1;
        let args = self.parse_call_args();
        self.expr_level -= 1;
        let (args, spread) = args?;
        self.expect_punct(')')?;
        Ok(CallExpr { callee: Box::new(callee), args, spread })
    }

    fn parse_call_args(&mut self) -> ParseResult<(Vec<Expr>, bool)> {
        let mut args = Vec::new();
        let mut spread = false;
        while !self.is_punct(')') {
            args.push(self.parse_expr()?);
            if self.is_operator("...") {
                self.advance();
                spread = true;
            }
            if self.is_punct(',') {
                self.advance();
            } else {
                break;
            }
        }
        Ok((args, spread))
    }

    fn parse_index_or_slice(&mut self, expr: Expr) -> ParseResult<Expr> {
        self.expect_punct('[')?;
        self.expr_level += 1;
        let result = self.parse_index_body(expr);
        self.expr_level -= 1;
        let result = result?;
        self.expect_punct(']')?;
        Ok(result)
    }

    fn parse_index_body(&mut self, expr: Expr) -> ParseResult<Expr> {
        if self.is_punct(']') {
            return Err(self.error("index expression"));
        }
        let first = if self.is_punct(':') {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if self.is_punct(':') {
            let mut parts: [Option<Box<Expr>>; 3] = [first.map(Box::new), None, None];
            let mut colons = 0;
            while self.is_punct(':') && colons < 2 {
                self.advance();
                colons += 1;
                if !self.is_punct(':') && !self.is_punct(']') {
                    parts[colons] = Some(Box::new(self.parse_expr()?));
                }
            }
            let [low, high, max] = parts;
            return Ok(Expr::Slice { expr: Box::new(expr), low, high, max });
        }

        let mut indices: Vec<Expr> = first.into_iter().collect();
        while self.is_punct(',') {
            self.advance();
            if self.is_punct(']') {
                break;
            }
            indices.push(self.parse_expr()?);
        }
        Ok(Expr::Index { expr: Box::new(expr), indices })
    }

    fn parse_composite_lit(&mut self, ty: Option<Expr>) -> ParseResult<Expr> {
        self.expect_punct('{')?;
        self.expr_level += 1;
        let elements = self.parse_elements();
        self.expr_level -= 1;
        let elements = elements?;
        self.expect_punct('}')?;
        Ok(Expr::CompositeLit { ty: ty.map(Box::new), elements })
    }

    fn parse_elements(&mut self) -> ParseResult<Vec<Expr>> {
        let mut elements = Vec::new();
        while !self.is_punct('}') {
            let element = self.parse_element()?;
            let element = if self.is_punct(':') {
                self.advance();
                let value = self.parse_element()?;
                Expr::KeyValue { key: Box::new(element), value: Box::new(value) }
            } else {
                element
            };
            elements.push(element);
            if self.is_punct(',') {
                self.advance();
            } else {
                break;
            }
        }
        Ok(elements)
    }

    fn parse_element(&mut self) -> ParseResult<Expr> {
        if self.is_punct('{') {
            self.parse_composite_lit(None)
        } else {
            self.parse_expr()
        }
    }

    // --- TYPES ---

    fn parse_type(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            TokenKind::Identifier(name) => {
                let mut ty = Expr::Ident(name.clone());
                self.advance();
                if self.is_punct('.') && matches!(self.peek_at(1), TokenKind::Identifier(_)) {
                    self.advance();
                    let member = self.expect_identifier()?;
                    ty = Expr::Selector { base: Box::new(ty), member };
                }
                if self.is_punct('[') && !matches!(self.peek_at(1), TokenKind::Punctuation(']')) {
                    self.advance();
                    let mut indices = vec![self.parse_type()?];
                    while self.is_punct(',') {
                        self.advance();
                        indices.push(self.parse_type()?);
                    }
                    self.expect_punct(']')?;
                    ty = Expr::Index { expr: Box::new(ty), indices };
                }
                Ok(ty)
            }
            TokenKind::Operator(op) if op == "*" => {
                self.advance();
                Ok(Expr::Star(Box::new(self.parse_type()?)))
            }
            TokenKind::Operator(op) if op == "<-" => {
                self.advance();
                self.expect_keyword("chan")?;
                Ok(Expr::ChanType { dir: ChanDir::Recv, elem: Box::new(self.parse_type()?) })
            }
            TokenKind::Punctuation('[') => {
                self.advance();
                let len = if self.is_punct(']') {
                    None
                } else if self.is_operator("...") {
                    self.advance();
                    Some(Box::new(Expr::Ellipsis))
                } else {
                    self.expr_level += 1;
                    let len = self.parse_expr();
                    self.expr_level -= 1;
                    Some(Box::new(len?))
                };
                self.expect_punct(']')?;
                let elem = self.parse_type()?;
                Ok(Expr::ArrayType { len, elem: Box::new(elem) })
            }
            TokenKind::Punctuation('(') => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect_punct(')')?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Keyword(k) if k == "map" => {
                self.advance();
                self.expect_punct('[')?;
                let key = self.parse_type()?;
                self.expect_punct(']')?;
                let value = self.parse_type()?;
                Ok(Expr::MapType { key: Box::new(key), value: Box::new(value) })
            }
            TokenKind::Keyword(k) if k == "chan" => {
                self.advance();
                let dir = if self.is_operator("<-") {
                    self.advance();
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(Expr::ChanType { dir, elem: Box::new(self.parse_type()?) })
            }
            TokenKind::Keyword(k) if k == "func" => {
                self.advance();
                self.skip_signature()?;
                Ok(Expr::FuncType)
            }
            TokenKind::Keyword(k) if k == "struct" => {
                self.advance();
                self.skip_balanced('{', '}')?;
                Ok(Expr::StructType)
            }
            TokenKind::Keyword(k) if k == "interface" => {
                self.advance();
                self.skip_balanced('{', '}')?;
                Ok(Expr::InterfaceType)
            }
            _ => Err(self.error("type")),
        }
    }
}

/// `x := y.(type)` or `y.(type)`
fn is_type_guard(stmt: &Stmt) -> bool {
    let guard = |e: &Expr| matches!(e, Expr::TypeAssert { ty: None, .. });
    match &stmt.kind {
        StmtKind::Expr(e) => guard(e),
        StmtKind::Assign { op: AssignOp::Define, values, .. } => values.len() == 1 && guard(&values[0]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LiteralKind;

    fn parse_body(body: &str) -> Vec<Stmt> {
        let source = format!("package main\n\nfunc f() {{\n{}\n}}\n", body);
        let file = parse_source(&source).expect("parse failed");
        let body = file
            .functions()
            .next()
            .and_then(|f| f.body.clone())
            .expect("function body");
        body
    }

    fn kinds(body: &str) -> Vec<StmtKind> {
        parse_body(body).into_iter().map(|s| s.kind).collect()
    }

    fn ident(name: &str) -> Expr {
        Expr::ident(name)
    }

    fn int(value: &str) -> Expr {
        Expr::BasicLit { kind: LiteralKind::Int, value: value.to_string() }
    }

    #[test]
    fn test_parse_file_header_and_declarations() {
        let source = "package example\n\nimport (\n\t\"fmt\"\n\tstr \"strings\"\n)\nimport \"os\"\n\ntype t4 struct {\n\tm1 string\n}\n\nvar global = 1\n\nfunc (t *t4) Method() error { return nil }\n\nfunc external(x int) int\n";
        let file = parse_source(source).expect("parse failed");
        assert_eq!(file.package, "example");
        assert_eq!(file.imports, vec!["fmt", "strings", "os"]);
        assert_eq!(file.decls.len(), 4);

        let functions: Vec<&FuncDecl> = file.functions().collect();
        assert_eq!(functions[0].qualified_name(), "t4.Method");
        assert!(functions[0].body.is_some());
        assert_eq!(functions[1].name, "external");
        assert!(functions[1].body.is_none());
    }

    #[test]
    fn test_parse_signatures_are_skipped() {
        let source = "package p\nfunc f5(arg int) (bool odd, even bool, err error) {}\nfunc g[T any](xs []T) func() struct{ a int } { return nil }\nfunc h() map[string][]int { return nil }\n";
        let file = parse_source(source).expect("parse failed");
        let names: Vec<String> = file.functions().map(|f| f.name.clone()).collect();
        assert_eq!(names, vec!["f5", "g", "h"]);
    }

    #[test]
    fn test_parse_assignment_and_call() {
        assert_eq!(
            kinds("s := strconv.Itoa(arg)"),
            vec![StmtKind::Assign {
                targets: vec![ident("s")],
                op: AssignOp::Define,
                values: vec![Expr::Call(CallExpr {
                    callee: Box::new(Expr::Selector {
                        base: Box::new(ident("strconv")),
                        member: "Itoa".to_string(),
                    }),
                    args: vec![ident("arg")],
                    spread: false,
                })],
            }]
        );
    }

    #[test]
    fn test_parse_binary_precedence() {
        let stmts = kinds("x = a + b*c == d || e");
        let StmtKind::Assign { values, .. } = &stmts[0] else {
            panic!("expected assignment");
        };
        let Expr::Binary { op, left, .. } = &values[0] else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::LogOr);
        let Expr::Binary { op, left, .. } = left.as_ref() else {
            panic!("expected comparison");
        };
        assert_eq!(*op, BinaryOp::Eq);
        let Expr::Binary { op, right, .. } = left.as_ref() else {
            panic!("expected addition");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(right.as_ref(), Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_parse_if_with_init_and_else_if_chain() {
        let stmts = kinds("if err := f(); err != nil {\n\treturn err\n} else if ok {\n} else {\n\tx++\n}");
        let StmtKind::If(stmt) = &stmts[0] else {
            panic!("expected if statement");
        };
        assert!(matches!(
            stmt.init.as_deref(),
            Some(Stmt { kind: StmtKind::Assign { op: AssignOp::Define, .. }, .. })
        ));
        assert!(matches!(stmt.cond, Expr::Binary { op: BinaryOp::Ne, .. }));
        let Some(ElseBranch::If(nested)) = &stmt.else_branch else {
            panic!("expected else if");
        };
        assert_eq!(nested.cond, ident("ok"));
        assert!(matches!(&nested.else_branch, Some(ElseBranch::Block(body)) if body.len() == 1));
    }

    #[test]
    fn test_composite_literal_not_taken_in_header() {
        let stmts = kinds("if x == y {\n}\nfor _, v := range []int{1, 2} {\n}\nif v := (T{}); v.ok {\n}");
        assert!(matches!(&stmts[0], StmtKind::If(s) if s.body.is_empty()));
        let StmtKind::Range(range) = &stmts[1] else {
            panic!("expected range loop");
        };
        assert!(range.define);
        assert_eq!(range.key, Some(ident("_")));
        assert_eq!(range.value, Some(ident("v")));
        assert!(matches!(range.iterable, Expr::CompositeLit { ref elements, .. } if elements.len() == 2));
        assert!(matches!(&stmts[2], StmtKind::If(s) if s.init.is_some()));
    }

    #[test]
    fn test_parse_for_forms() {
        let stmts = kinds("for i := 0; i < 10; i++ {\n}\nfor {\n}\nfor x < 3 {\n}\nfor ; ; {\n}\nfor range ch {\n}");
        let StmtKind::For(three_part) = &stmts[0] else {
            panic!("expected for loop");
        };
        assert!(three_part.init.is_some() && three_part.cond.is_some() && three_part.post.is_some());
        assert!(matches!(
            three_part.post.as_deref(),
            Some(Stmt { kind: StmtKind::IncDec { op: IncDecOp::Inc, .. }, .. })
        ));
        assert!(matches!(&stmts[1], StmtKind::For(f) if f.init.is_none() && f.cond.is_none() && f.post.is_none()));
        assert!(matches!(&stmts[2], StmtKind::For(f) if f.cond.is_some() && f.init.is_none()));
        assert!(matches!(&stmts[3], StmtKind::For(f) if f.cond.is_none()));
        assert!(matches!(&stmts[4], StmtKind::Range(r) if r.key.is_none() && r.iterable == ident("ch")));
    }

    #[test]
    fn test_parse_switch_forms() {
        let stmts = kinds(
            "switch arg % 2 {\ncase 1, 3:\n\todd = true\ndefault:\n}\nswitch {\ncase a == 10:\n}\nswitch v := x.(type) {\ncase int:\n}",
        );
        let StmtKind::Switch(tagged) = &stmts[0] else {
            panic!("expected switch");
        };
        assert!(matches!(tagged.tag, Some(Expr::Binary { op: BinaryOp::Rem, .. })));
        assert_eq!(tagged.clauses[0].values, vec![int("1"), int("3")]);
        assert!(tagged.clauses[1].values.is_empty());

        assert!(matches!(&stmts[1], StmtKind::Switch(s) if s.tag.is_none() && s.clauses.len() == 1));
        assert!(matches!(&stmts[2], StmtKind::TypeSwitch(s) if s.clauses.len() == 1));
    }

    #[test]
    fn test_parse_branches_labels_and_misc() {
        let stmts = kinds(
            "outer:\nfor {\n\tbreak outer\n}\ncontinue\ngo worker(ch)\ndefer mu.Unlock()\nch <- 1\nvar c int\n{\n}",
        );
        assert!(matches!(&stmts[0], StmtKind::Labeled { label, .. } if label == "outer"));
        assert_eq!(stmts[1], StmtKind::Branch { kind: BranchKind::Continue, label: None });
        assert!(matches!(&stmts[2], StmtKind::Go(_)));
        assert!(matches!(&stmts[3], StmtKind::Defer(call) if call.args.is_empty()));
        assert!(matches!(&stmts[4], StmtKind::Send { .. }));
        assert!(matches!(&stmts[5], StmtKind::Decl(GenDecl { kind: DeclKind::Var, .. })));
        assert_eq!(stmts[6], StmtKind::Block(vec![]));
    }

    #[test]
    fn test_parse_expression_forms() {
        let stmts = kinds(
            "v := &t4{m1: \"\", m2: 0}\nn := x.(*T)\nb := s[1:len(s)]\nm := map[string][]int{\"a\": {1}}\nf := func() error { return nil }\nargs = append(args, rest...)",
        );
        let value = |i: usize| match &stmts[i] {
            StmtKind::Assign { values, .. } => values[0].clone(),
            other => panic!("expected assignment, got {:?}", other),
        };
        assert!(matches!(value(0), Expr::Unary { op: UnaryOp::Addr, .. }));
        assert!(matches!(value(1), Expr::TypeAssert { ty: Some(_), .. }));
        assert!(matches!(value(2), Expr::Slice { low: Some(_), high: Some(_), max: None, .. }));
        assert!(matches!(value(3), Expr::CompositeLit { ty: Some(_), .. }));
        assert!(matches!(value(4), Expr::FuncLit { .. }));
        assert!(matches!(value(5), Expr::Call(CallExpr { spread: true, .. })));
    }

    #[test]
    fn test_statement_locations() {
        let stmts = parse_body("a := 1\n\tb := 2");
        assert_eq!(stmts[0].location, SourceLocation::new(4, 1));
        assert_eq!(stmts[1].location, SourceLocation::new(5, 2));
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_source("func f() {}").unwrap_err();
        assert_eq!(err.message, "expected `package`, found keyword `func`");
        assert!(err.help.is_some());
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse_source("package p\nfunc f() {\n\tx := \n}\n").unwrap_err();
        assert_eq!(err.message, "expected expression, found `}`");
        assert_eq!(err.location, SourceLocation::new(4, 1));
    }

    #[test]
    fn test_defer_requires_call() {
        let err = parse_source("package p\nfunc f() {\n\tdefer x\n}\n").unwrap_err();
        assert_eq!(err.message, "expression in defer must be function call");
    }
}
