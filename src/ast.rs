// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the Go source handled by go-flowuml.
// Defines the structure of a parsed Go file.
//
// Statements carry the location of their first token so that skipped
// constructs can be reported precisely. Expressions are plain trees; they
// are only ever read, never rewritten.

use crate::errors::SourceLocation;
use crate::lexer::LiteralKind;

/// A parsed Go file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: String,
    pub imports: Vec<String>,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func) => Some(func),
            Decl::Gen(_) => None,
        })
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Base type name of the receiver for methods: `T` for `func (t *T) m()`
    pub receiver: Option<String>,
    /// `None` for declarations without a body (implemented outside Go)
    pub body: Option<Vec<Stmt>>,
    pub location: SourceLocation,
}

impl FuncDecl {
    /// `T.m` for methods, the bare name for plain functions
    pub fn qualified_name(&self) -> String {
        match &self.receiver {
            Some(receiver) => format!("{}.{}", receiver, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Type,
    Var,
}

/// `var`, `const` or `type` declaration, possibly grouped
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub kind: DeclKind,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn name(&self) -> &'static str {
        match self {
            Spec::Value(_) => "ValueSpec",
            Spec::Type(_) => "TypeSpec",
        }
    }
}

/// `a, b int = 1, 2`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<String>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

/// `t4 struct { ... }` or `Alias = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub alias: bool,
    pub ty: Expr,
}

/// A statement together with where it starts in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: SourceLocation,
}

impl Stmt {
    pub fn new(kind: StmtKind, location: SourceLocation) -> Self {
        Stmt { kind, location }
    }
}

/// Represents a statement in Go - an action, a declaration or control flow
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    If(IfStmt),
    /// Assignment or short variable declaration: `a, b := f()`
    Assign {
        targets: Vec<Expr>,
        op: AssignOp,
        values: Vec<Expr>,
    },
    Decl(GenDecl),
    Return(Vec<Expr>),
    Range(RangeStmt),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    For(ForStmt),
    Branch {
        kind: BranchKind,
        label: Option<String>,
    },
    IncDec {
        target: Expr,
        op: IncDecOp,
    },
    Defer(CallExpr),
    Go(CallExpr),
    Expr(Expr),
    Send {
        channel: Expr,
        value: Expr,
    },
    Select(Vec<CommClause>),
    Labeled {
        label: String,
        stmt: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Empty,
}

impl StmtKind {
    /// Node kind name used when reporting a construct
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::If(_) => "IfStmt",
            StmtKind::Assign { .. } => "AssignStmt",
            StmtKind::Decl(_) => "DeclStmt",
            StmtKind::Return(_) => "ReturnStmt",
            StmtKind::Range(_) => "RangeStmt",
            StmtKind::Switch(_) => "SwitchStmt",
            StmtKind::TypeSwitch(_) => "TypeSwitchStmt",
            StmtKind::For(_) => "ForStmt",
            StmtKind::Branch { .. } => "BranchStmt",
            StmtKind::IncDec { .. } => "IncDecStmt",
            StmtKind::Defer(_) => "DeferStmt",
            StmtKind::Go(_) => "GoStmt",
            StmtKind::Expr(_) => "ExprStmt",
            StmtKind::Send { .. } => "SendStmt",
            StmtKind::Select(_) => "SelectStmt",
            StmtKind::Labeled { .. } => "LabeledStmt",
            StmtKind::Block(_) => "BlockStmt",
            StmtKind::Empty => "EmptyStmt",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Vec<Stmt>),
}

/// Three-part, condition-only or infinite `for`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

/// `for key, value := range iterable`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    /// `:=` rather than `=`
    pub define: bool,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// `x := y.(type)` or `y.(type)`
    pub assign: Box<Stmt>,
    pub clauses: Vec<CaseClause>,
}

/// `case a, b:` or, with no values, `default:`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub values: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// `case v := <-ch:` inside `select`; `comm` is `None` for `default:`
#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

impl IncDecOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            IncDecOp::Inc => "++",
            IncDecOp::Dec => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<AssignOp> {
        let op = match symbol {
            "=" => AssignOp::Assign,
            ":=" => AssignOp::Define,
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Quo,
            "%=" => AssignOp::Rem,
            "&=" => AssignOp::And,
            "|=" => AssignOp::Or,
            "^=" => AssignOp::Xor,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            "&^=" => AssignOp::AndNot,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Quo => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }
}

/// A call: `callee(args...)`, with `spread` set for a trailing `...`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub spread: bool,
}

/// Represents an expression in Go - a value, or a type in expression position
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal with its verbatim source text
    BasicLit { kind: LiteralKind, value: String },
    Ident(String),
    Selector { base: Box<Expr>, member: String },
    Binary { left: Box<Expr>, op: BinaryOp, right: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Call(CallExpr),
    /// `[]T`, `[N]T` or `[...]T`; `len` is `None` for slices
    ArrayType { len: Option<Box<Expr>>, elem: Box<Expr> },
    /// `x.(T)`; `ty` is `None` for the `x.(type)` switch guard
    TypeAssert { expr: Box<Expr>, ty: Option<Box<Expr>> },
    /// `T{...}`; `ty` is `None` for elided inner literals like `{1, 2}`
    CompositeLit { ty: Option<Box<Expr>>, elements: Vec<Expr> },
    /// Pointer dereference or pointer type: `*p`, `*T`
    Star(Box<Expr>),
    Paren(Box<Expr>),
    /// Indexing or generic instantiation: `a[i]`, `List[int]`
    Index { expr: Box<Expr>, indices: Vec<Expr> },
    Slice {
        expr: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    KeyValue { key: Box<Expr>, value: Box<Expr> },
    FuncLit { body: Vec<Stmt> },
    MapType { key: Box<Expr>, value: Box<Expr> },
    ChanType { dir: ChanDir, elem: Box<Expr> },
    FuncType,
    StructType,
    InterfaceType,
    /// `...` as an array length
    Ellipsis,
}

impl Expr {
    pub fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    /// Node kind name used when reporting a construct
    pub fn name(&self) -> &'static str {
        match self {
            Expr::BasicLit { .. } => "BasicLit",
            Expr::Ident(_) => "Ident",
            Expr::Selector { .. } => "SelectorExpr",
            Expr::Binary { .. } => "BinaryExpr",
            Expr::Unary { .. } => "UnaryExpr",
            Expr::Call(_) => "CallExpr",
            Expr::ArrayType { .. } => "ArrayType",
            Expr::TypeAssert { .. } => "TypeAssertExpr",
            Expr::CompositeLit { .. } => "CompositeLit",
            Expr::Star(_) => "StarExpr",
            Expr::Paren(_) => "ParenExpr",
            Expr::Index { .. } => "IndexExpr",
            Expr::Slice { .. } => "SliceExpr",
            Expr::KeyValue { .. } => "KeyValueExpr",
            Expr::FuncLit { .. } => "FuncLit",
            Expr::MapType { .. } => "MapType",
            Expr::ChanType { .. } => "ChanType",
            Expr::FuncType => "FuncType",
            Expr::StructType => "StructType",
            Expr::InterfaceType => "InterfaceType",
            Expr::Ellipsis => "Ellipsis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    BitNot,
    Addr,
    Recv,
    Tilde,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<UnaryOp> {
        let op = match symbol {
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Pos,
            "!" => UnaryOp::Not,
            "^" => UnaryOp::BitNot,
            "&" => UnaryOp::Addr,
            "<-" => UnaryOp::Recv,
            "~" => UnaryOp::Tilde,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "^",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
            UnaryOp::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LogOr,
    LogAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        let op = match symbol {
            "||" => BinaryOp::LogOr,
            "&&" => BinaryOp::LogAnd,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "|" => BinaryOp::Or,
            "^" => BinaryOp::Xor,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Quo,
            "%" => BinaryOp::Rem,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            "&" => BinaryOp::And,
            "&^" => BinaryOp::AndNot,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical Go spelling of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::LogOr => "||",
            BinaryOp::LogAnd => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::AndNot => "&^",
        }
    }

    /// Go binding strength, 1 (`||`) to 5 (multiplicative)
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::LogOr => 1,
            BinaryOp::LogAnd => 2,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Mul
            | BinaryOp::Quo
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
        }
    }
}
