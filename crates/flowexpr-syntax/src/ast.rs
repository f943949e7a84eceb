//! Syntax tree of a restricted annotation expression.
//!
//! The tree keeps every node kind the parser recognizes, including the
//! operators the resolver later rejects, so a rejection can quote the
//! offending sub-expression in normalized source form (see the `Display`
//! implementations below).

use miette::SourceSpan;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    This,
    Super,
    /// A simple name. Parameter markers arrive here as `_param_N`.
    Name(String),
    /// `( expr )`
    Enclosed(Box<Expr>),
    /// `scope.name`
    FieldAccess {
        scope: Box<Expr>,
        name: String,
    },
    /// `array[index]`
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    /// `scope.name(arguments)` or `name(arguments)`
    MethodCall {
        scope: Option<Box<Expr>>,
        name: String,
        arguments: Vec<Expr>,
    },
    /// `Type.class`
    ClassLiteral(TypeName),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Char(char),
    String(String),
}

/// The textual type named by a class literal: a dotted name plus array dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub segments: Vec<String>,
    pub dimensions: usize,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// The dotted text of a name or a chain of field accesses over names,
    /// e.g. `java.util` for the scope of `java.util.List`.
    pub fn as_dotted_name(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Name(name) => Some(name.clone()),
            ExprKind::FieldAccess { scope, name } => {
                scope.as_dotted_name().map(|prefix| format!("{}.{}", prefix, name))
            }
            _ => None,
        }
    }
}

impl TypeName {
    /// Rebuilds the dotted part of the type as a name or field-access chain,
    /// ready to be resolved like any other expression.
    pub fn to_expr(&self) -> Option<Expr> {
        let mut segments = self.segments.iter();
        let first = segments.next()?;
        let mut expr = Expr::new(ExprKind::Name(first.clone()), self.span);
        for segment in segments {
            expr = Expr::new(
                ExprKind::FieldAccess {
                    scope: Box::new(expr),
                    name: segment.clone(),
                },
                self.span,
            );
        }
        Some(expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(literal) => write!(f, "{}", literal),
            ExprKind::This => write!(f, "this"),
            ExprKind::Super => write!(f, "super"),
            ExprKind::Name(name) => write!(f, "{}", name),
            ExprKind::Enclosed(inner) => write!(f, "({})", inner),
            ExprKind::FieldAccess { scope, name } => write!(f, "{}.{}", scope, name),
            ExprKind::ArrayAccess { array, index } => write!(f, "{}[{}]", array, index),
            ExprKind::MethodCall { scope, name, arguments } => {
                if let Some(scope) = scope {
                    write!(f, "{}.", scope)?;
                }
                write!(f, "{}(", name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            ExprKind::ClassLiteral(ty) => write!(f, "{}.class", ty),
            ExprKind::Unary { op: UnaryOp::Neg, operand } => write!(f, "-{}", operand),
            ExprKind::Unary { op: UnaryOp::Not, operand } => write!(f, "!{}", operand),
            ExprKind::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(value) => write!(f, "{}", value),
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Long(value) => write!(f, "{}L", value),
            Literal::Double(value) => write!(f, "{:?}", value),
            Literal::Char(value) => write!(f, "'{}'", value.escape_default()),
            Literal::String(value) => write!(f, "\"{}\"", value.escape_default()),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))?;
        for _ in 0..self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
