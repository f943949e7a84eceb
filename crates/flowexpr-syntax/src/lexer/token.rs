use logos::Logos;
use miette::SourceSpan;

/// A token spans from `start` to `end` within the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: SourceSpan,
}

/// All tokens of the restricted expression grammar.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Keywords
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("class")]
    Class,

    // Multi-character operators
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,

    // Single-character operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Punctuation
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    /// A positional parameter marker the preprocessor left alone, such as `#0`.
    #[regex(r"#[0-9]+")]
    ParamRef,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*[lL]")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]")]
    LongLiteral,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    IntLiteral,

    #[regex(r"[0-9][0-9_]*\.([0-9][0-9_]*)?([eE][+-]?[0-9]+)?[dDfF]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[dDfF]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[dDfF]?")]
    #[regex(r"[0-9][0-9_]*[dDfF]")]
    DoubleLiteral,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,

    #[regex(r"'([^'\\\n]|\\[btnfr0-7'\x22\\]|\\u[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F]|\\[0-7][0-7]?[0-7]?)'")]
    CharLiteral,

    // Whitespace (to be skipped)
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    Whitespace,

    // Catch-all for anything unexpected
    #[error]
    Error,
}

impl TokenKind {
    /// A short human-readable description used in parser diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::This => "`this`",
            TokenKind::Super => "`super`",
            TokenKind::Null => "`null`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Class => "`class`",
            TokenKind::AndAnd => "`&&`",
            TokenKind::OrOr => "`||`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::LtEq => "`<=`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Bang => "`!`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::ParamRef => "parameter reference",
            TokenKind::Ident => "identifier",
            TokenKind::LongLiteral => "long literal",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::DoubleLiteral => "floating-point literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Error => "unrecognized input",
        }
    }
}
